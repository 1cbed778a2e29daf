use diagnostics::RawError;
use thiserror::Error;

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Failures raised by workflow collaborators
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Token extraction failed: {0}")]
    Extraction(String),

    #[error("Remote operation failed: {message}")]
    Remote { message: String, status: Option<u16> },

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Presentation failed: {0}")]
    Presentation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}: {1}")]
    WithContext(String, Box<WorkflowError>),
}

impl WorkflowError {
    pub fn extraction<S: Into<String>>(message: S) -> Self {
        Self::Extraction(message.into())
    }

    pub fn remote<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        Self::Remote {
            message: message.into(),
            status,
        }
    }

    pub fn download<S: Into<String>>(message: S) -> Self {
        Self::Download(message.into())
    }

    pub fn presentation<S: Into<String>>(message: S) -> Self {
        Self::Presentation(message.into())
    }

    /// Add context to an error
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    /// HTTP status of the underlying remote failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => *status,
            Self::WithContext(_, inner) => inner.status(),
            _ => None,
        }
    }

    /// The failure as the classifier should see it: the inner message and
    /// status, without the variant prefix or added context.
    pub fn to_raw(&self) -> RawError {
        let message = match self {
            Self::Extraction(msg)
            | Self::Download(msg)
            | Self::Presentation(msg)
            | Self::Remote { message: msg, .. } => msg.clone(),
            Self::Io(e) => e.to_string(),
            Self::Json(e) => e.to_string(),
            Self::WithContext(_, inner) => return inner.to_raw(),
        };
        RawError {
            message,
            status: self.status(),
        }
    }

    /// Get a user-friendly message for command line display
    pub fn user_message(&self) -> String {
        match self {
            Self::Extraction(msg) => format!("Could not extract tokens: {msg}"),
            Self::Remote {
                message,
                status: Some(status),
            } => format!("Remote error (HTTP {status}): {message}"),
            Self::Remote { message, .. } => format!("Remote error: {message}"),
            Self::Download(msg) => format!("Could not save tokens: {msg}"),
            Self::Presentation(msg) => format!("Prompt failed: {msg}"),
            Self::Io(e) => format!("I/O error: {e}"),
            Self::Json(e) => format!("Invalid JSON: {e}"),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

impl From<diagnostics::DiagnosticsError> for WorkflowError {
    fn from(err: diagnostics::DiagnosticsError) -> Self {
        Self::Presentation(err.to_string())
    }
}

/// Helper trait for adding context to results
pub trait ResultExt<T, E> {
    /// Add context to an error result with a string-producing closure
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;

    /// Add context directly from a string
    fn context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: Into<WorkflowError>,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| {
            let workflow_err: WorkflowError = err.into();
            workflow_err.with_context(context())
        })
    }

    fn context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|err| {
            let workflow_err: WorkflowError = err.into();
            workflow_err.with_context(context)
        })
    }
}
