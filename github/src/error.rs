use diagnostics::{lookup, ErrorCode};
use thiserror::Error;
use workflow::WorkflowError;

/// Result type alias for GitHub operations
pub type Result<T> = std::result::Result<T, GithubError>;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered with a non-success status
    #[error("{operation} failed: {message}")]
    Api {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("GitHub token missing: set the {0} environment variable")]
    MissingToken(String),

    #[error("Invalid repository name: '{0}'")]
    InvalidRepository(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("{0}: {1}")]
    WithContext(String, Box<GithubError>),
}

impl GithubError {
    pub fn api<S: Into<String>>(operation: &'static str, status: u16, message: S) -> Self {
        Self::Api {
            operation,
            status,
            message: message.into(),
        }
    }

    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Add context to an error
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    /// HTTP status of the failure, when GitHub answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::WithContext(_, inner) => inner.status(),
            _ => None,
        }
    }

    /// Message worded so the error classifier can recognise transport failures
    pub fn classifiable_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => format!("network timeout: {e}"),
            Self::Http(e) if e.is_connect() && looks_offline(e) => {
                format!("network offline: {e}")
            }
            Self::Http(e) if e.is_connect() => format!("network connection failed: {e}"),
            Self::Http(e) if e.is_request() => format!("network request failed: {e}"),
            Self::WithContext(_, inner) => inner.classifiable_message(),
            other => other.to_string(),
        }
    }

    /// Get a user-friendly message for command line display
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => "GitHub did not respond in time".to_string(),
            Self::Http(e) => format!("Could not reach GitHub: {e}"),
            Self::Api {
                operation,
                status,
                message,
            } => format!("GitHub {operation} failed (HTTP {status}): {message}"),
            Self::MissingToken(var) => {
                format!("No GitHub token found. Export one in the {var} environment variable")
            }
            Self::InvalidRepository(repo) => {
                let definition = lookup(ErrorCode::RepoInvalidName);
                format!("{} ('{repo}', expected owner/repo)", definition.user_message)
            }
            Self::InvalidConfig(msg) => format!("Invalid [github] configuration: {msg}"),
            Self::UrlParse(e) => format!("Invalid URL: {e}"),
            Self::Json(e) => format!("Unexpected response from GitHub: {e}"),
            Self::Base64(e) => format!("Could not decode file content: {e}"),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

// DNS failures are the closest signal to "no network at all"
fn looks_offline(err: &reqwest::Error) -> bool {
    let mut source: Option<&dyn std::error::Error> = Some(err);
    while let Some(current) = source {
        let text = current.to_string().to_lowercase();
        if text.contains("dns") || text.contains("failed to lookup address") {
            return true;
        }
        source = current.source();
    }
    false
}

impl From<GithubError> for WorkflowError {
    fn from(err: GithubError) -> Self {
        WorkflowError::remote(err.classifiable_message(), err.status())
    }
}
