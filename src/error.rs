//! Error types for Periscope.
//!
//! Uses `thiserror` for ergonomic error definitions. Each domain gets its
//! own error family. Probe unreachability is deliberately *not* an error;
//! a host that does not answer is the expected common case and is folded
//! into a boolean outcome instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the connection record store.
///
/// Validation errors are detected before any mutation, so a rejected
/// operation leaves both the in-memory set and the persisted file unchanged.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("a connection named '{0}' already exists")]
    DuplicateName(String),

    #[error("connection needs a hostname or an IP address")]
    InvalidRecord,

    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Unavailable(e.to_string())
    }
}

/// Result type alias for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the range scanner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("invalid scan range {start}..{end}: need 1 <= start < end <= 256")]
    InvalidRange { start: u16, end: u16 },
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors for settings and path handling.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a home directory for config storage")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for CLI command execution.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
