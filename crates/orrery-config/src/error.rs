//! Configuration error types.

use std::path::PathBuf;

/// Errors raised while loading or saving the orrery's RON config file.
///
/// The read/write/parse variants carry the offending path so a startup
/// failure names the exact file, not just the syscall that tripped.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file (or its parent directory) could not be written.
    #[error("failed to write config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file's contents are not valid RON for the config schema.
    #[error("config {} is not valid RON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// The in-memory config could not be serialized to RON.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}
