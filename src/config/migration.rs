//! Detection and migration of 1.x config documents.
//!
//! A 1.x document carries no `version` key. Migration moves it aside to
//! `config.old.yml` (replacing any earlier backup) so the loader can write the
//! packaged default in its place. There is no backup chain: the last migration
//! wins.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};
use serde_yaml::Value;

use crate::errors::ConfigError;

/// True when `doc` predates the versioned schema.
pub fn is_legacy(doc: &Value) -> bool {
    doc.as_mapping()
        .map_or(true, |map| !map.contains_key("version"))
}

/// Move the legacy document at `config` to `backup`.
///
/// Any failure is fatal for the load; nothing is retried.
pub fn move_legacy_config(config: &Path, backup: &Path) -> Result<(), ConfigError> {
    info!(
        "Legacy (1.x) config detected, renaming '{}' to '{}' ...",
        config.display(),
        backup.display()
    );

    let migration_error = |source| ConfigError::Migration {
        from: config.to_path_buf(),
        to: backup.to_path_buf(),
        source,
    };

    match fs::remove_file(backup) {
        Ok(()) => debug!("Removed previous backup {}", backup.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(migration_error(e)),
    }

    fs::rename(config, backup).map_err(migration_error)
}
