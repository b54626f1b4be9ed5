//! Error types for the raycast crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building inputs or moving data on and off disk.
///
/// The traversal itself never fails; degenerate geometry degrades to an
/// empty or truncated [`Traversal`](crate::raycast::Traversal).
#[derive(Error, Debug)]
pub enum Error {
    /// Grid parameters violate the tile size or tile count preconditions.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Reading or writing a file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `config.toml` could not be parsed.
    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    /// A snapshot could not be serialized or parsed.
    #[error("snapshot format error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A global logger was already installed.
    #[error("logger setup failed: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for fallible crate operations.
pub type Result<T> = std::result::Result<T, Error>;
