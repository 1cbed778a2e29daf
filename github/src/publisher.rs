use crate::client::GithubClient;
use crate::config::GithubConfig;
use crate::error::{GithubError, Result};
use crate::repository::Repository;
use chrono::Utc;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info, warn};
use workflow::{
    format_size, ConnectivityStatus, ExtractionResult, FileInfo, PushFeedback, PushOutcome,
    TokenDataset, TokenPublisher, WorkflowError,
};

/// Pushes the token dataset to a single file in a GitHub repository
pub struct GithubPublisher {
    config: GithubConfig,
    repository: Repository,
    token: Option<String>,
    client: OnceLock<GithubClient>,
}

impl GithubPublisher {
    /// Create a publisher from validated configuration. The token is read
    /// from `config.token_env` when the publisher is initialized.
    pub fn new(config: GithubConfig) -> Result<Self> {
        let repository = config.validate()?;
        Ok(Self {
            config,
            repository,
            token: None,
            client: OnceLock::new(),
        })
    }

    /// Use an explicit token instead of the environment
    pub fn with_token<S: Into<String>>(mut self, token: S) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn config(&self) -> &GithubConfig {
        &self.config
    }

    fn resolve_token(&self) -> Result<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        match std::env::var(&self.config.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(GithubError::MissingToken(self.config.token_env.clone())),
        }
    }

    fn client(&self) -> Result<&GithubClient> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = GithubClient::new(
            &self.config.api_url,
            self.resolve_token()?,
            Duration::from_secs(self.config.timeout_seconds),
        )?;
        Ok(self.client.get_or_init(|| client))
    }

    async fn push_dataset(
        &self,
        result: &ExtractionResult,
        feedback: &dyn PushFeedback,
    ) -> Result<PushOutcome> {
        let client = self.client()?;
        let path = self.config.path.as_str();
        let branch = self.config.branch.as_str();

        feedback.progress("Preparing token dataset");
        let mut body = serde_json::to_string_pretty(&TokenDataset::from_extraction(result))?;
        body.push('\n');

        feedback.progress(&format!("Checking {path} on {branch}"));
        let existing = client.get_file(&self.repository, path, branch).await?;
        if let Some(file) = &existing {
            debug!(sha = %file.sha, "updating existing file");
        }

        feedback.progress(&format!("Committing to {}", self.repository));
        let message = self.config.commit_message_at(Utc::now());
        let put = client
            .put_file(
                &self.repository,
                path,
                branch,
                body.as_bytes(),
                &message,
                existing.as_ref().map(|f| f.sha.as_str()),
            )
            .await?;

        let file_info = FileInfo {
            path: put.content.path,
            size: body.len() as u64,
            url: put.content.html_url.or(put.commit.html_url),
            commit_sha: Some(put.commit.sha),
        };
        info!(
            repository = %self.repository,
            path = %file_info.path,
            size = file_info.size,
            "pushed design tokens"
        );
        feedback.finished(&format!(
            "Pushed {} ({})",
            file_info.path,
            format_size(file_info.size)
        ));
        Ok(PushOutcome::pushed(file_info))
    }
}

impl TokenPublisher for GithubPublisher {
    async fn initialize(&self) -> std::result::Result<(), WorkflowError> {
        self.client()?;
        debug!(repository = %self.repository, "GitHub client ready");
        Ok(())
    }

    async fn check_connectivity(&self) -> ConnectivityStatus {
        let repository = self.repository.full_name();
        let client = match self.client() {
            Ok(client) => client,
            Err(err) => {
                return ConnectivityStatus {
                    configured: false,
                    connected: false,
                    repository: Some(repository),
                    error: Some(err.to_string()),
                }
            }
        };

        match client.get_repository(&self.repository).await {
            Ok(info) if info.can_push() => ConnectivityStatus::connected(repository),
            Ok(_) => ConnectivityStatus::unreachable(
                Some(repository),
                "token has no push permission for this repository",
            ),
            Err(err) => {
                warn!(repository = %repository, "connectivity check failed: {err}");
                ConnectivityStatus::unreachable(Some(repository), err.user_message())
            }
        }
    }

    async fn push(
        &self,
        result: &ExtractionResult,
        feedback: &dyn PushFeedback,
    ) -> std::result::Result<PushOutcome, WorkflowError> {
        match self.push_dataset(result, feedback).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                feedback.failed(&err.user_message());
                Err(err.into())
            }
        }
    }
}
