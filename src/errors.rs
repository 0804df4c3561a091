use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a configuration load.
///
/// None of these leave partial state behind: a failed load never reaches
/// [`MotdService`](crate::motd::MotdService).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file, or creating the icon directory.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config document is not valid YAML.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A legacy config could not be moved out of the way.
    #[error("unable to rename '{}' to '{}': {source}", from.display(), to.display())]
    Migration {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `motds` entry is neither a string nor a `line1`/`line2` record.
    #[error("unknown motd type at motds[{index}]: {type_name}")]
    UnknownMotdType { index: usize, type_name: &'static str },

    /// `motds` is present but is not a list.
    #[error("'motds' must be a list, found {type_name}")]
    InvalidMotdList { type_name: &'static str },

    /// An icon file matched an accepted suffix but could not be decoded.
    #[error("unable to load {filename}: {source}")]
    IconLoad {
        filename: String,
        #[source]
        source: image::ImageError,
    },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
