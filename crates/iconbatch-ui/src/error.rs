use thiserror::Error;

/// Errors from driving the catalog UI.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UiError {
    #[error("timed out after {timeout_ms}ms waiting for '{selector}'")]
    Timeout { selector: String, timeout_ms: u64 },

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("driver error: {0}")]
    Driver(String),
}

impl UiError {
    /// Check if this error is worth another attempt.
    ///
    /// Timeouts, missing elements and navigation hiccups come and go with the
    /// page; a failing script or a dead driver does not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UiError::Timeout { .. } | UiError::ElementNotFound(_) | UiError::Navigation { .. }
        )
    }
}

pub type UiResult<T> = Result<T, UiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(UiError::Timeout {
            selector: ".grid-icons".into(),
            timeout_ms: 10
        }
        .is_retryable());
        assert!(UiError::ElementNotFound("x".into()).is_retryable());
        assert!(!UiError::Script("bad".into()).is_retryable());
        assert!(!UiError::Driver("closed".into()).is_retryable());
    }
}
