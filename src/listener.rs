//! Boundary between the host's status-query event and [`MotdService`].
//!
//! The host owns the response object; this side only writes to it, and only
//! when a pool actually produced something. An empty pool leaves the host's
//! own default in place.

use std::sync::Arc;

use serde::Serialize;

use crate::motd::{Icon, MotdService};

/// Writable view of the host's status response.
pub trait StatusResponse {
    fn set_motd(&mut self, motd: &str);
    fn set_icon(&mut self, icon: &Icon);
}

/// Fills status responses from a shared [`MotdService`].
#[derive(Debug, Clone)]
pub struct ResponseListener {
    service: Arc<MotdService>,
}

impl ResponseListener {
    pub fn new(service: Arc<MotdService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<MotdService> {
        &self.service
    }

    /// Handle one inbound status query.
    pub fn on_status_query(&self, response: &mut dyn StatusResponse) {
        let motd = self.service.get_response();
        if let Some(message) = motd.message {
            response.set_motd(message.as_str());
        }
        if let Some(icon) = motd.icon {
            response.set_icon(&icon);
        }
    }
}

/// Plain status response: description text plus optional favicon data URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerListPing {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

impl ServerListPing {
    /// Response pre-filled with the host defaults.
    pub fn with_defaults(description: impl Into<String>, favicon: Option<String>) -> Self {
        Self {
            description: description.into(),
            favicon,
        }
    }
}

impl Default for ServerListPing {
    fn default() -> Self {
        Self::with_defaults("A Minecraft Server", None)
    }
}

impl StatusResponse for ServerListPing {
    fn set_motd(&mut self, motd: &str) {
        self.description = motd.to_string();
    }

    fn set_icon(&mut self, icon: &Icon) {
        self.favicon = Some(icon.data_uri());
    }
}
