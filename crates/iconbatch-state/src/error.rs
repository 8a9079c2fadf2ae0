use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("progress data is corrupt: {0}")]
    Corrupt(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress store unavailable: {0}")]
    Unavailable(String),
}

impl StateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StateError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the persisted data exists but cannot be used.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StateError::Corrupt(_))
    }
}

pub type StateResult<T> = Result<T, StateError>;
