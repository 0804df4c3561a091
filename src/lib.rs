//! # ColorMOTD - randomized server list MOTD and icons
//!
//! Answers a client's pre-login status query with a message and an optional
//! icon, each drawn at random from pools loaded out of a data directory.
//!
//! ## Features
//!
//! - **Message pool**: plain strings (`\n` escapes allowed) or `line1`/`line2` records.
//! - **Icon pool**: every decodable image in `favicons/`, re-encoded to PNG.
//! - **Legacy migration**: 1.x configs (no `version` key) are moved to
//!   `config.old.yml` and replaced with the packaged default.
//! - **Hot reload**: [`MotdService`](motd::MotdService) swaps providers atomically; in-flight
//!   queries finish on the generation they started with.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use colormotd::config::ConfigLoader;
//! use colormotd::listener::{ResponseListener, ServerListPing};
//! use colormotd::motd::MotdService;
//!
//! fn main() -> anyhow::Result<()> {
//!     let loader = ConfigLoader::new("plugins/ColorMOTD");
//!     let service = Arc::new(MotdService::load(&loader)?);
//!     let listener = ResponseListener::new(Arc::clone(&service));
//!
//!     let mut ping = ServerListPing::default();
//!     listener.on_status_query(&mut ping);
//!     println!("{}", ping.description);
//!
//!     // Later, e.g. on an admin command:
//!     service.reload(&loader)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - config loading, defaults and 1.x migration
//! - [`motd`] - messages, icons, pools, providers and the service facade
//! - [`listener`] - status-query boundary with the host
//! - [`errors`] - load-time error taxonomy
//! - [`logutil`] - log-friendly rendering of MOTD text
//!
//! ```text
//! ┌─────────────────┐
//! │ ResponseListener│ ← per status query
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   MotdService   │ ← atomic provider slot
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │  MotdProvider   │ ← message pool + icon pool
//! └─────────────────┘
//!          ▲
//! ┌─────────────────┐
//! │  ConfigLoader   │ ← startup / reload only
//! └─────────────────┘
//! ```

pub mod config;
pub mod errors;
pub mod listener;
pub mod logutil;
pub mod motd;
