use crate::codes::ErrorCode;
use crate::presentation::RecoveryAction;
use std::fmt;
use thiserror::Error;

/// Result type alias for diagnostics operations
pub type Result<T> = std::result::Result<T, DiagnosticsError>;

/// Errors raised by the diagnostics crate itself
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    #[error("Unknown error code: {0}")]
    UnknownCode(String),

    #[error("Action '{action}' is not offered for {code}")]
    ActionNotOffered { code: ErrorCode, action: RecoveryAction },

    #[error("Recovery flow for {0} was already resolved")]
    FlowAlreadyResolved(ErrorCode),

    #[error("Presentation failed: {0}")]
    Presentation(String),
}

impl DiagnosticsError {
    /// Create a presentation error from anything printable
    pub fn presentation<S: Into<String>>(message: S) -> Self {
        Self::Presentation(message.into())
    }

    /// Get a user-friendly message for command line display
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownCode(code) => format!(
                "'{code}' is not a known error code. Run `token-launch explain` to list them"
            ),
            Self::ActionNotOffered { code, action } => {
                format!("'{action}' is not available for {code}")
            }
            Self::FlowAlreadyResolved(code) => format!("The {code} dialog was already closed"),
            Self::Presentation(msg) => format!("Could not show the error dialog: {msg}"),
        }
    }
}

/// A failure as seen by the classifier: a message and, for HTTP failures,
/// the response status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawError {
    pub message: String,
    pub status: Option<u16>,
}

impl RawError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Build a raw error from any std error, keeping only its message
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self::new(err.to_string())
    }
}

impl fmt::Display for RawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {status}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for RawError {}

impl From<&str> for RawError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for RawError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_error_display() {
        assert_eq!(RawError::new("boom").to_string(), "boom");
        assert_eq!(
            RawError::new("Not Found").with_status(404).to_string(),
            "HTTP 404: Not Found"
        );
    }

    #[test]
    fn test_user_messages() {
        let err = DiagnosticsError::UnknownCode("NOPE".to_string());
        assert!(err.user_message().contains("token-launch explain"));

        let err = DiagnosticsError::ActionNotOffered {
            code: ErrorCode::ExtractionNoTokens,
            action: RecoveryAction::Retry,
        };
        assert_eq!(err.to_string(), "Action 'retry' is not offered for EXTRACTION_NO_TOKENS");
    }
}
