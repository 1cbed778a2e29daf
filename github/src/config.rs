use crate::error::{GithubError, Result};
use crate::repository::Repository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_PATH: &str = "design-tokens/raw/figma-export.json";
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

/// The `[github]` table of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubConfig {
    /// `owner/repo` or a github.com URL
    pub repository: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Path of the pushed file inside the repository
    #[serde(default = "default_path")]
    pub path: String,
    /// Environment variable holding the access token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
}

impl GithubConfig {
    pub fn new<S: Into<String>>(repository: S) -> Self {
        Self {
            repository: repository.into(),
            branch: default_branch(),
            path: default_path(),
            token_env: default_token_env(),
            api_url: default_api_url(),
            timeout_seconds: default_timeout(),
            commit_message: None,
        }
    }

    pub fn with_api_url<S: Into<String>>(mut self, api_url: S) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_branch<S: Into<String>>(mut self, branch: S) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = path.into();
        self
    }

    /// Validate the settings and return the parsed repository
    pub fn validate(&self) -> Result<Repository> {
        let repository: Repository = self.repository.parse()?;

        let api_url = Url::parse(&self.api_url)?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(GithubError::invalid_config(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.branch.trim().is_empty() {
            return Err(GithubError::invalid_config("branch must not be empty"));
        }
        if self.path.trim().is_empty() || self.path.starts_with('/') {
            return Err(GithubError::invalid_config(format!(
                "path must be relative to the repository root, got '{}'",
                self.path
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(GithubError::invalid_config("timeout_seconds must be positive"));
        }
        if self.token_env.trim().is_empty() {
            return Err(GithubError::invalid_config("token_env must name an environment variable"));
        }

        Ok(repository)
    }

    /// Commit message for a push made at `at`
    pub fn commit_message_at(&self, at: DateTime<Utc>) -> String {
        match &self.commit_message {
            Some(message) => message.clone(),
            None => format!(
                "chore(tokens): update design tokens {}",
                at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        }
    }
}
