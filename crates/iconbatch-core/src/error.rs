use thiserror::Error;

/// Errors that can occur in iconbatch-core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("invalid delay range: min {min_ms}ms > max {max_ms}ms")]
    InvalidDelayRange { min_ms: u64, max_ms: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
