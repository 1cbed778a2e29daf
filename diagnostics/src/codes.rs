use crate::error::DiagnosticsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad area an error belongs to. Descriptive only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Authentication,
    Authorization,
    Network,
    Validation,
    Repository,
    GitOperation,
    Configuration,
    RateLimit,
    Unknown,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::Network => "network",
            Self::Validation => "validation",
            Self::Repository => "repository",
            Self::GitOperation => "git_operation",
            Self::Configuration => "configuration",
            Self::RateLimit => "rate_limit",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of the current operation an error blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// Blocks all operations
    Critical,
    /// Blocks the current operation
    High,
    /// Degrades functionality
    Medium,
    /// Minor issue, work can continue
    Low,
}

impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of error identifiers known to the taxonomy.
///
/// Codes are grouped by prefix: `AUTH_*` authentication, `AUTHZ_*`
/// authorization, `NET_*` network, `REPO_*` repository, `GIT_*` git
/// operations, `CONFIG_*` configuration, `RATE_*` rate limiting and
/// `EXTRACTION_*` token extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AuthTokenInvalid,
    AuthTokenExpired,
    AuthTokenMissing,
    AuthBadCredentials,

    AuthzInsufficientPermissions,
    AuthzRepoAccessDenied,
    AuthzBranchProtected,

    NetConnectionFailed,
    NetTimeout,
    NetOffline,

    RepoNotFound,
    RepoInvalidName,
    RepoBranchNotFound,
    RepoFileNotFound,

    GitCreateBranchFailed,
    GitPushFailed,
    GitCreatePrFailed,
    GitCommitFailed,
    GitRefNotFound,

    ConfigInvalid,
    ConfigMissing,

    RateLimitExceeded,

    ExtractionNoTokens,

    UnknownError,
}

impl ErrorCode {
    /// Every code, in registry order
    pub const ALL: [ErrorCode; 24] = [
        Self::AuthTokenInvalid,
        Self::AuthTokenExpired,
        Self::AuthTokenMissing,
        Self::AuthBadCredentials,
        Self::AuthzInsufficientPermissions,
        Self::AuthzRepoAccessDenied,
        Self::AuthzBranchProtected,
        Self::NetConnectionFailed,
        Self::NetTimeout,
        Self::NetOffline,
        Self::RepoNotFound,
        Self::RepoInvalidName,
        Self::RepoBranchNotFound,
        Self::RepoFileNotFound,
        Self::GitCreateBranchFailed,
        Self::GitPushFailed,
        Self::GitCreatePrFailed,
        Self::GitCommitFailed,
        Self::GitRefNotFound,
        Self::ConfigInvalid,
        Self::ConfigMissing,
        Self::RateLimitExceeded,
        Self::ExtractionNoTokens,
        Self::UnknownError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthTokenInvalid => "AUTH_TOKEN_INVALID",
            Self::AuthTokenExpired => "AUTH_TOKEN_EXPIRED",
            Self::AuthTokenMissing => "AUTH_TOKEN_MISSING",
            Self::AuthBadCredentials => "AUTH_BAD_CREDENTIALS",
            Self::AuthzInsufficientPermissions => "AUTHZ_INSUFFICIENT_PERMISSIONS",
            Self::AuthzRepoAccessDenied => "AUTHZ_REPO_ACCESS_DENIED",
            Self::AuthzBranchProtected => "AUTHZ_BRANCH_PROTECTED",
            Self::NetConnectionFailed => "NET_CONNECTION_FAILED",
            Self::NetTimeout => "NET_TIMEOUT",
            Self::NetOffline => "NET_OFFLINE",
            Self::RepoNotFound => "REPO_NOT_FOUND",
            Self::RepoInvalidName => "REPO_INVALID_NAME",
            Self::RepoBranchNotFound => "REPO_BRANCH_NOT_FOUND",
            Self::RepoFileNotFound => "REPO_FILE_NOT_FOUND",
            Self::GitCreateBranchFailed => "GIT_CREATE_BRANCH_FAILED",
            Self::GitPushFailed => "GIT_PUSH_FAILED",
            Self::GitCreatePrFailed => "GIT_CREATE_PR_FAILED",
            Self::GitCommitFailed => "GIT_COMMIT_FAILED",
            Self::GitRefNotFound => "GIT_REF_NOT_FOUND",
            Self::ConfigInvalid => "CONFIG_INVALID",
            Self::ConfigMissing => "CONFIG_MISSING",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::ExtractionNoTokens => "EXTRACTION_NO_TOKENS",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = DiagnosticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| DiagnosticsError::UnknownCode(s.to_string()))
    }
}
