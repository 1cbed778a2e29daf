use diagnostics::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Configuration file already exists: {0}")]
    ConfigExists(PathBuf),

    #[error("Workflow error: {0}")]
    Workflow(#[from] workflow::WorkflowError),

    #[error("Diagnostics error: {0}")]
    Diagnostics(#[from] diagnostics::DiagnosticsError),

    #[error("GitHub error: {0}")]
    Github(#[from] github::GithubError),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export did not complete ({0})")]
    ExportFailed(ErrorCode),

    #[error("{0}")]
    Other(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<CliError>),
}

impl CliError {
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Io(err) => format!("I/O operation failed: {err}"),
            Self::ConfigParse(err) => format!("Invalid configuration file: {err}"),
            Self::ConfigNotFound(path) => format!(
                "Configuration file not found at {}. Run `token-launch init` to create one",
                path.display()
            ),
            Self::ConfigExists(path) => format!(
                "{} already exists. Use --force to overwrite it",
                path.display()
            ),
            Self::Workflow(err) => err.user_message(),
            Self::Diagnostics(err) => err.user_message(),
            Self::Github(err) => err.user_message(),
            Self::Json(err) => format!("Failed to produce JSON: {err}"),
            Self::ExportFailed(code) => {
                format!("{} ({code})", diagnostics::lookup(*code).title)
            }
            Self::Other(msg) => msg.clone(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

/// Extension trait to add context to Result types
pub trait ResultExt<T> {
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CliError>,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| {
            let cli_err: CliError = err.into();
            cli_err.with_context(context())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_failed_uses_taxonomy_title() {
        let err = CliError::ExportFailed(ErrorCode::RepoNotFound);
        assert_eq!(
            err.user_message(),
            "Repository Not Found (REPO_NOT_FOUND)"
        );
    }

    #[test]
    fn test_context_wraps_user_message() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = result.with_context(|| "Failed to read tokens.json").unwrap_err();
        assert_eq!(
            err.user_message(),
            "Failed to read tokens.json: I/O operation failed: missing"
        );
    }
}
