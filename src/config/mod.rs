//! # Configuration Management Module
//!
//! Loads the MOTD configuration from a data directory and turns it into the
//! pools a [`SimpleMotdProvider`] draws from.
//!
//! ## Layout
//!
//! ```text
//! <data_dir>/
//! ├── config.yml       ← versioned config document
//! ├── config.old.yml   ← previous 1.x document, after migration
//! └── favicons/        ← one image per icon
//! ```
//!
//! ## Configuration File Format
//!
//! ```yaml
//! version: 2
//! motds:
//!   - 'Hello\nWorld'          # literal \n starts the second line
//!   - line1: 'A'
//!     line2: 'B'              # optional
//! icons:
//!   skip_invalid: false
//! logging:
//!   level: info
//!   file: colormotd.log
//! ```
//!
//! A document without `version` is a 1.x config and is migrated on load, see
//! [`migration`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use colormotd::config::ConfigLoader;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new("plugins/ColorMOTD").load()?;
//!     println!("{} messages, {} icons", config.messages.len(), config.icons.len());
//!     Ok(())
//! }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::errors::ConfigError;
use crate::logutil::escape_log;
use crate::motd::icon::decoder_suffixes;
use crate::motd::{value_type_name, Icon, IconPool, Message, MessagePool, MotdEntry, SimpleMotdProvider};

pub mod migration;

pub const CONFIG_FILE: &str = "config.yml";
pub const LEGACY_BACKUP_FILE: &str = "config.old.yml";
pub const ICON_DIR: &str = "favicons";

/// Highest `version` this build understands.
pub const CONFIG_VERSION: u64 = 2;

/// Written whenever `config.yml` is missing or was migrated away.
pub const DEFAULT_CONFIG: &str = include_str!("default_config.yml");

/// Ambient settings carried alongside the `motds` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Any value counts; only its presence separates current from 1.x docs.
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub icons: IconSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSettings {
    /// Log and skip undecodable icons instead of failing the load.
    #[serde(default)]
    pub skip_invalid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Settings {
    /// `version` as a number, if it is one (`2`, `2.0`, `'2'`).
    pub fn version_number(&self) -> Option<f64> {
        match self.version.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn from_document(doc: &Value, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_value(doc.clone()).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read the settings of `<data_dir>/config.yml` without creating or
    /// migrating anything. `None` if the file is missing or unreadable.
    pub fn peek(data_dir: impl AsRef<Path>) -> Option<Self> {
        let content = fs::read_to_string(data_dir.as_ref().join(CONFIG_FILE)).ok()?;
        serde_yaml::from_str(&content).ok()
    }
}

/// Result of one load cycle.
#[derive(Debug)]
pub struct MotdConfig {
    pub messages: MessagePool,
    pub icons: IconPool,
    pub settings: Settings,
}

impl MotdConfig {
    pub fn into_provider(self, generation: u64) -> SimpleMotdProvider {
        SimpleMotdProvider::new(self.messages, self.icons).with_generation(generation)
    }
}

/// Reads, migrates and validates the config found in a data directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    data_dir: PathBuf,
    suffixes: Option<BTreeSet<String>>,
}

impl ConfigLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            suffixes: None,
        }
    }

    /// Replace the decoder-derived icon suffixes, e.g. `[".png", ".jpg"]`.
    pub fn with_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suffixes = Some(suffixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn legacy_backup_path(&self) -> PathBuf {
        self.data_dir.join(LEGACY_BACKUP_FILE)
    }

    pub fn icon_dir(&self) -> PathBuf {
        self.data_dir.join(ICON_DIR)
    }

    pub fn accepted_suffixes(&self) -> &BTreeSet<String> {
        self.suffixes.as_ref().unwrap_or_else(|| decoder_suffixes())
    }

    /// Write the packaged default unless a config already exists.
    /// Returns whether a file was written.
    pub fn ensure_default_config(&self) -> Result<bool, ConfigError> {
        let path = self.config_path();
        if path.exists() {
            return Ok(false);
        }
        fs::create_dir_all(&self.data_dir).map_err(|e| ConfigError::io(&self.data_dir, e))?;
        fs::write(&path, DEFAULT_CONFIG).map_err(|e| ConfigError::io(&path, e))?;
        info!("Wrote default config to {}", path.display());
        Ok(true)
    }

    /// Create the icon directory (with parents) if it is missing.
    pub fn ensure_icon_dir(&self) -> Result<PathBuf, ConfigError> {
        let dir = self.icon_dir();
        fs::create_dir_all(&dir).map_err(|e| ConfigError::io(&dir, e))?;
        Ok(dir)
    }

    fn read_document(&self) -> Result<Value, ConfigError> {
        let path = self.config_path();
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;
        if content.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Run a full load cycle. Any error aborts the whole load.
    pub fn load(&self) -> Result<MotdConfig, ConfigError> {
        self.ensure_default_config()?;
        let mut doc = self.read_document()?;

        if migration::is_legacy(&doc) {
            migration::move_legacy_config(&self.config_path(), &self.legacy_backup_path())?;
            self.ensure_default_config()?;
            doc = self.read_document()?;
        }

        let settings = Settings::from_document(&doc, &self.config_path())?;
        match settings.version_number() {
            Some(version) if version > CONFIG_VERSION as f64 => warn!(
                "Config version {} is newer than supported version {}; unknown keys are ignored",
                version, CONFIG_VERSION
            ),
            Some(_) => {}
            None => warn!(
                "Config version {:?} is not a number; reading it as version {}",
                settings.version, CONFIG_VERSION
            ),
        }

        let messages = parse_motds(&doc)?;
        let icons = self.load_icons(&settings.icons)?;
        info!(
            "Loaded {} messages and {} icons from {}",
            messages.len(),
            icons.len(),
            self.data_dir.display()
        );

        Ok(MotdConfig {
            messages,
            icons,
            settings,
        })
    }

    fn load_icons(&self, settings: &IconSettings) -> Result<IconPool, ConfigError> {
        let dir = self.ensure_icon_dir()?;
        let mut icons = Vec::new();

        for path in self.icon_candidates(&dir)? {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match Icon::load(&path) {
                Ok(icon) => {
                    if !icon.has_protocol_size() {
                        warn!(
                            "Icon {} is {}x{}; clients expect 64x64",
                            filename,
                            icon.width(),
                            icon.height()
                        );
                    }
                    debug!("Loaded icon {}", filename);
                    icons.push(icon);
                }
                Err(source) if settings.skip_invalid => {
                    warn!("Skipping icon {}: {}", filename, source);
                }
                Err(source) => return Err(ConfigError::IconLoad { filename, source }),
            }
        }

        Ok(IconPool::new(icons))
    }

    /// Files directly inside `dir` whose name ends with an accepted suffix,
    /// sorted by name.
    fn icon_candidates(&self, dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
        let suffixes = self.accepted_suffixes();
        let mut found = Vec::new();

        for entry in fs::read_dir(dir).map_err(|e| ConfigError::io(dir, e))? {
            let entry = entry.map_err(|e| ConfigError::io(dir, e))?;
            let path = entry.path();
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                debug!("Ignoring non UTF-8 file name in {}", dir.display());
                continue;
            };
            if !suffixes.iter().any(|suffix| name.ends_with(suffix.as_str())) || !path.is_file() {
                continue;
            }
            found.push(path);
        }

        found.sort();
        Ok(found)
    }
}

/// Normalize the `motds` list into a message pool, in document order.
pub fn parse_motds(doc: &Value) -> Result<MessagePool, ConfigError> {
    let entries = match doc.get("motds") {
        None | Some(Value::Null) => {
            warn!("Config has no 'motds' list; the host default MOTD will be used");
            return Ok(MessagePool::empty());
        }
        Some(Value::Sequence(entries)) => entries,
        Some(other) => {
            return Err(ConfigError::InvalidMotdList {
                type_name: value_type_name(other),
            })
        }
    };

    let messages = entries
        .iter()
        .enumerate()
        .map(|(index, value)| MotdEntry::from_value(index, value).map(Message::from))
        .collect::<Result<Vec<_>, _>>()?;

    for message in &messages {
        debug!("motd: {}", escape_log(message.as_str()));
    }
    Ok(MessagePool::new(messages))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(src: &str) -> Value {
        serde_yaml::from_str(src).unwrap()
    }

    #[test]
    fn default_config_is_current_and_valid() {
        let doc = yaml(DEFAULT_CONFIG);
        assert!(!migration::is_legacy(&doc));
        let settings = Settings::from_document(&doc, Path::new(CONFIG_FILE)).unwrap();
        assert_eq!(settings.version_number(), Some(CONFIG_VERSION as f64));
        assert!(!settings.icons.skip_invalid);
        assert_eq!(settings.logging, LoggingConfig::default());

        let pool = parse_motds(&doc).unwrap();
        assert_eq!(pool.len(), 2);
        assert!(pool.iter().all(|m| m.lines().count() == 2));
    }

    #[test]
    fn parses_mixed_entries_in_order() {
        let pool = parse_motds(&yaml(
            r#"
version: 2
motds:
  - 'Hello\nWorld'
  - {line1: A, line2: B}
  - {line1: Solo}
"#,
        ))
        .unwrap();
        let texts: Vec<&str> = pool.iter().map(Message::as_str).collect();
        assert_eq!(texts, vec!["Hello\nWorld", "A\nB", "Solo"]);
    }

    #[test]
    fn missing_motds_is_empty_pool() {
        assert!(parse_motds(&yaml("version: 2")).unwrap().is_empty());
        assert!(parse_motds(&yaml("version: 2\nmotds: ~")).unwrap().is_empty());
    }

    #[test]
    fn non_list_motds_is_rejected() {
        let err = parse_motds(&yaml("version: 2\nmotds: hello")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMotdList { type_name: "string" }));
    }

    #[test]
    fn unknown_entry_aborts_whole_list() {
        let err = parse_motds(&yaml("version: 2\nmotds: [ok, 12, also ok]")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownMotdType { index: 1, type_name: "number" }
        ));
    }

    #[test]
    fn settings_ignore_unknown_keys_and_default_missing_sections() {
        let doc = yaml("version: 2\nmotds: []\nsomething_else: true\nlogging: {file: motd.log}");
        let settings = Settings::from_document(&doc, Path::new(CONFIG_FILE)).unwrap();
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.file.as_deref(), Some("motd.log"));
        assert_eq!(settings.icons, IconSettings::default());
    }

    #[test]
    fn version_is_read_leniently() {
        for (src, expected) in [
            ("version: 2", Some(2.0)),
            ("version: 2.1", Some(2.1)),
            ("version: '2.0'", Some(2.0)),
            ("version: beta", None),
            ("version: ~", None),
        ] {
            let settings = Settings::from_document(&yaml(src), Path::new(CONFIG_FILE)).unwrap();
            assert!(settings.version.is_some() || src.ends_with('~'), "for {src}");
            assert_eq!(settings.version_number(), expected, "for {src}");
        }
    }
}
