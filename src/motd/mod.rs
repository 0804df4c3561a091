//! # MOTD selection
//!
//! Everything needed to answer a status query once the config has been loaded:
//!
//! - [`Message`] and [`MotdEntry`] - the normalized message type and the two
//!   shapes a `motds` entry may take in the config document
//! - [`Pool`] - immutable collection with uniform random selection
//! - [`Icon`] - a decoded server-list icon
//! - [`MotdProvider`] / [`SimpleMotdProvider`] - one message plus one icon per response
//! - [`MotdService`] - the facade handed to the event layer, hot-swappable on reload
//!
//! Pools never change after construction. A reload builds a fresh provider and
//! replaces the old one in a single atomic store, so readers see one generation
//! or the other.

use std::fmt;

use serde_yaml::{Mapping, Value};

use crate::errors::ConfigError;

pub mod icon;
pub mod pool;
pub mod provider;
pub mod service;

pub use icon::Icon;
pub use pool::{IconPool, MessagePool, Pool};
pub use provider::{MotdProvider, MotdResponse, SimpleMotdProvider};
pub use service::MotdService;

/// A status message. May span two lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message(String);

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.0.lines()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<MotdEntry> for Message {
    fn from(entry: MotdEntry) -> Self {
        match entry {
            MotdEntry::Text(text) => Message(text.replace("\\n", "\n")),
            MotdEntry::Lines { line1, line2: None } => Message(line1),
            MotdEntry::Lines {
                line1,
                line2: Some(line2),
            } => Message(format!("{line1}\n{line2}")),
        }
    }
}

/// One entry of the `motds` list as written in the config document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotdEntry {
    /// Plain string; literal `\n` escapes become line breaks.
    Text(String),
    /// `{line1, line2}` record; a missing `line2` means a single line.
    Lines { line1: String, line2: Option<String> },
}

impl MotdEntry {
    /// Classify a raw `motds[index]` value.
    pub fn from_value(index: usize, value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::String(text) => Ok(MotdEntry::Text(text.clone())),
            Value::Mapping(map) => Self::from_record(index, map),
            other => Err(ConfigError::UnknownMotdType {
                index,
                type_name: value_type_name(other),
            }),
        }
    }

    fn from_record(index: usize, map: &Mapping) -> Result<Self, ConfigError> {
        let field = |key: &str| -> Result<Option<String>, ConfigError> {
            match map.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(value) => scalar_text(value).map(Some).ok_or(ConfigError::UnknownMotdType {
                    index,
                    type_name: value_type_name(value),
                }),
            }
        };
        Ok(MotdEntry::Lines {
            line1: field("line1")?.unwrap_or_default(),
            line2: field("line2")?,
        })
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Human-readable name of a YAML node kind, used in diagnostics.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}
