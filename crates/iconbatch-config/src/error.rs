use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("retry.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("invalid delay range for pacing.{name}: min {min_ms}ms > max {max_ms}ms")]
    InvalidDelayRange { name: String, min_ms: u64, max_ms: u64 },

    #[error("timeouts.{name} must be greater than zero")]
    ZeroTimeout { name: String },

    #[error("progress.path must not be empty")]
    EmptyProgressPath,

    #[error("invalid collection URL '{url}': expected http(s)")]
    InvalidCollectionUrl { url: String },

    #[error("no collections configured (set 'collections' or 'collections_file')")]
    NoCollections,

    #[error("failed to read collections file {}: {message}", path.display())]
    CollectionsFile { path: PathBuf, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
