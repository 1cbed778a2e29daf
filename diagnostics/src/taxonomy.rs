//! Static registry of error metadata
//!
//! Every [`ErrorCode`] maps to exactly one [`ErrorDefinition`]. The mapping is
//! an exhaustive `match`, so a code without an entry does not compile.

use crate::codes::{ErrorCategory, ErrorCode, ErrorSeverity};
use serde::Serialize;

/// One remediation step shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorSolution {
    pub step: u8,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'static str>,
}

impl ErrorSolution {
    const fn new(step: u8, action: &'static str) -> Self {
        Self {
            step,
            action,
            details: None,
        }
    }

    const fn detailed(step: u8, action: &'static str, details: &'static str) -> Self {
        Self {
            step,
            action,
            details: Some(details),
        }
    }
}

/// User facing metadata for one error code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDefinition {
    pub code: ErrorCode,
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub title: &'static str,
    pub user_message: &'static str,
    pub technical_message: &'static str,
    pub solutions: &'static [ErrorSolution],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learn_more_url: Option<&'static str>,
    pub retryable: bool,
    pub fallback_available: bool,
}

/// Look up the metadata for a code
pub fn lookup(code: ErrorCode) -> &'static ErrorDefinition {
    match code {
        ErrorCode::AuthTokenInvalid => &AUTH_TOKEN_INVALID,
        ErrorCode::AuthTokenExpired => &AUTH_TOKEN_EXPIRED,
        ErrorCode::AuthTokenMissing => &AUTH_TOKEN_MISSING,
        ErrorCode::AuthBadCredentials => &AUTH_BAD_CREDENTIALS,
        ErrorCode::AuthzInsufficientPermissions => &AUTHZ_INSUFFICIENT_PERMISSIONS,
        ErrorCode::AuthzRepoAccessDenied => &AUTHZ_REPO_ACCESS_DENIED,
        ErrorCode::AuthzBranchProtected => &AUTHZ_BRANCH_PROTECTED,
        ErrorCode::NetConnectionFailed => &NET_CONNECTION_FAILED,
        ErrorCode::NetTimeout => &NET_TIMEOUT,
        ErrorCode::NetOffline => &NET_OFFLINE,
        ErrorCode::RepoNotFound => &REPO_NOT_FOUND,
        ErrorCode::RepoInvalidName => &REPO_INVALID_NAME,
        ErrorCode::RepoBranchNotFound => &REPO_BRANCH_NOT_FOUND,
        ErrorCode::RepoFileNotFound => &REPO_FILE_NOT_FOUND,
        ErrorCode::GitCreateBranchFailed => &GIT_CREATE_BRANCH_FAILED,
        ErrorCode::GitPushFailed => &GIT_PUSH_FAILED,
        ErrorCode::GitCreatePrFailed => &GIT_CREATE_PR_FAILED,
        ErrorCode::GitCommitFailed => &GIT_COMMIT_FAILED,
        ErrorCode::GitRefNotFound => &GIT_REF_NOT_FOUND,
        ErrorCode::ConfigInvalid => &CONFIG_INVALID,
        ErrorCode::ConfigMissing => &CONFIG_MISSING,
        ErrorCode::RateLimitExceeded => &RATE_LIMIT_EXCEEDED,
        ErrorCode::ExtractionNoTokens => &EXTRACTION_NO_TOKENS,
        ErrorCode::UnknownError => &UNKNOWN_ERROR,
    }
}

impl ErrorCode {
    /// Shorthand for [`lookup`]
    pub fn definition(self) -> &'static ErrorDefinition {
        lookup(self)
    }
}

const PAT_DOCS_URL: &str = "https://docs.github.com/en/authentication/keeping-your-account-and-data-secure/managing-your-personal-access-tokens";
const RATE_LIMIT_DOCS_URL: &str =
    "https://docs.github.com/en/rest/overview/resources-in-the-rest-api#rate-limiting";

// Authentication

static AUTH_TOKEN_INVALID: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::AuthTokenInvalid,
    category: ErrorCategory::Authentication,
    severity: ErrorSeverity::Critical,
    title: "Invalid GitHub Token",
    user_message: "Your GitHub Personal Access Token is invalid or has been revoked.",
    technical_message: "GitHub API returned 401 Unauthorized with \"Bad credentials\" message.",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Generate a new Personal Access Token",
            "Go to GitHub → Settings → Developer settings → Personal access tokens → Tokens (classic)",
        ),
        ErrorSolution::detailed(
            2,
            "Ensure the token has required permissions",
            "Enable: repo (Full control of private repositories)",
        ),
        ErrorSolution::detailed(
            3,
            "Copy the new token and update your configuration",
            "Export the new token in the environment variable named by github.token_env",
        ),
    ],
    learn_more_url: Some(PAT_DOCS_URL),
    retryable: true,
    fallback_available: true,
};

static AUTH_TOKEN_EXPIRED: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::AuthTokenExpired,
    category: ErrorCategory::Authentication,
    severity: ErrorSeverity::Critical,
    title: "GitHub Token Expired",
    user_message: "Your GitHub Personal Access Token has expired.",
    technical_message: "Token expiration date has passed.",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Generate a new Personal Access Token",
            "Go to GitHub → Settings → Developer settings → Personal access tokens",
        ),
        ErrorSolution::detailed(
            2,
            "Set an expiration date or choose \"No expiration\"",
            "For production use, consider using fine-grained tokens with longer expiration",
        ),
        ErrorSolution::new(3, "Update your token in the plugin configuration"),
    ],
    learn_more_url: Some(PAT_DOCS_URL),
    retryable: true,
    fallback_available: true,
};

static AUTH_TOKEN_MISSING: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::AuthTokenMissing,
    category: ErrorCategory::Authentication,
    severity: ErrorSeverity::Critical,
    title: "GitHub Token Missing",
    user_message: "No GitHub token configured. Please set up GitHub integration first.",
    technical_message: "GitHub client attempted to make API call without authentication token.",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Run the GitHub setup",
            "Run `token-launch init` and fill in the [github] section",
        ),
        ErrorSolution::detailed(
            2,
            "Create a Personal Access Token on GitHub",
            "Go to GitHub → Settings → Developer settings → Personal access tokens",
        ),
        ErrorSolution::new(3, "Export the token in the configured environment variable"),
    ],
    learn_more_url: None,
    retryable: true,
    fallback_available: true,
};

static AUTH_BAD_CREDENTIALS: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::AuthBadCredentials,
    category: ErrorCategory::Authentication,
    severity: ErrorSeverity::Critical,
    title: "Authentication Failed",
    user_message: "GitHub rejected your credentials. The token may be invalid or revoked.",
    technical_message: "HTTP 401: Bad credentials",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Verify your token is correct",
            "Check that you copied the entire token without extra spaces",
        ),
        ErrorSolution::detailed(
            2,
            "Check if the token was revoked",
            "Go to GitHub → Settings → Developer settings → Personal access tokens → Check token status",
        ),
        ErrorSolution::detailed(
            3,
            "Generate a new token if needed",
            "Create a new token with \"repo\" permissions and update your configuration",
        ),
    ],
    learn_more_url: Some("https://docs.github.com/en/rest/overview/troubleshooting"),
    retryable: true,
    fallback_available: true,
};

// Authorization

static AUTHZ_INSUFFICIENT_PERMISSIONS: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::AuthzInsufficientPermissions,
    category: ErrorCategory::Authorization,
    severity: ErrorSeverity::High,
    title: "Insufficient Permissions",
    user_message: "Your GitHub token doesn't have the required permissions for this operation.",
    technical_message: "HTTP 403: Forbidden - Insufficient token scopes",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Check your token permissions",
            "Go to GitHub → Settings → Developer settings → Personal access tokens",
        ),
        ErrorSolution::detailed(
            2,
            "Regenerate token with correct scopes",
            "Required scopes: repo (or public_repo for public repositories only)",
        ),
        ErrorSolution::new(3, "Update the token in plugin configuration"),
    ],
    learn_more_url: Some(
        "https://docs.github.com/en/apps/oauth-apps/building-oauth-apps/scopes-for-oauth-apps",
    ),
    retryable: true,
    fallback_available: true,
};

static AUTHZ_REPO_ACCESS_DENIED: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::AuthzRepoAccessDenied,
    category: ErrorCategory::Authorization,
    severity: ErrorSeverity::High,
    title: "Repository Access Denied",
    user_message: "You don't have access to this repository.",
    technical_message: "HTTP 403: Forbidden - Repository access denied",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Verify you have write access to the repository",
            "Check repository settings → Collaborators & teams",
        ),
        ErrorSolution::detailed(
            2,
            "Contact repository owner for access",
            "Request \"Write\" or \"Admin\" permissions",
        ),
        ErrorSolution::detailed(
            3,
            "Verify repository name is correct",
            "Format should be: owner/repository-name",
        ),
    ],
    learn_more_url: None,
    retryable: false,
    fallback_available: true,
};

static AUTHZ_BRANCH_PROTECTED: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::AuthzBranchProtected,
    category: ErrorCategory::Authorization,
    severity: ErrorSeverity::High,
    title: "Branch is Protected",
    user_message: "Cannot push directly to this protected branch.",
    technical_message: "Branch protection rules prevent direct pushes",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Create a pull request instead",
            "Push to a feature branch and open a pull request",
        ),
        ErrorSolution::detailed(
            2,
            "Or modify branch protection rules",
            "Repository Settings → Branches → Branch protection rules",
        ),
    ],
    learn_more_url: Some("https://docs.github.com/en/repositories/configuring-branches-and-merges-in-your-repository/managing-protected-branches"),
    retryable: false,
    fallback_available: true,
};

// Network

static NET_CONNECTION_FAILED: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::NetConnectionFailed,
    category: ErrorCategory::Network,
    severity: ErrorSeverity::High,
    title: "Connection Failed",
    user_message: "Could not connect to GitHub. Please check your internet connection.",
    technical_message: "Network request failed - unable to reach GitHub API",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Check your internet connection",
            "Ensure you have active internet connectivity",
        ),
        ErrorSolution::detailed(
            2,
            "Check if GitHub is accessible",
            "Visit https://www.githubstatus.com/ to check GitHub status",
        ),
        ErrorSolution::new(3, "Try again in a few moments"),
    ],
    learn_more_url: Some("https://www.githubstatus.com/"),
    retryable: true,
    fallback_available: true,
};

static NET_TIMEOUT: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::NetTimeout,
    category: ErrorCategory::Network,
    severity: ErrorSeverity::Medium,
    title: "Request Timeout",
    user_message: "The request to GitHub took too long and timed out.",
    technical_message: "Network request exceeded timeout threshold",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Check your internet connection speed",
            "Slow connections may cause timeouts",
        ),
        ErrorSolution::detailed(2, "Try again", "The issue may be temporary"),
    ],
    learn_more_url: None,
    retryable: true,
    fallback_available: true,
};

static NET_OFFLINE: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::NetOffline,
    category: ErrorCategory::Network,
    severity: ErrorSeverity::Critical,
    title: "No Internet Connection",
    user_message: "You appear to be offline. GitHub operations require an internet connection.",
    technical_message: "Network unavailable",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Check your internet connection",
            "Ensure Wi-Fi or Ethernet is connected",
        ),
        ErrorSolution::detailed(
            2,
            "Download tokens locally instead",
            "Use the \"Download JSON\" option to save tokens offline",
        ),
    ],
    learn_more_url: None,
    retryable: true,
    fallback_available: true,
};

// Repository

static REPO_NOT_FOUND: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::RepoNotFound,
    category: ErrorCategory::Repository,
    severity: ErrorSeverity::High,
    title: "Repository Not Found",
    user_message: "The specified GitHub repository could not be found.",
    technical_message: "HTTP 404: Repository does not exist or is not accessible",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Verify the repository name is correct",
            "Format: owner/repository-name (e.g., \"myusername/my-design-tokens\")",
        ),
        ErrorSolution::detailed(
            2,
            "Check if the repository exists on GitHub",
            "Visit the repository URL to confirm it exists",
        ),
        ErrorSolution::detailed(
            3,
            "Ensure you have access to the repository",
            "Private repositories require proper permissions",
        ),
    ],
    learn_more_url: None,
    retryable: false,
    fallback_available: true,
};

static REPO_INVALID_NAME: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::RepoInvalidName,
    category: ErrorCategory::Validation,
    severity: ErrorSeverity::Medium,
    title: "Invalid Repository Name",
    user_message: "The repository name format is invalid.",
    technical_message: "Repository name does not match required format: owner/repo",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Use the correct format",
            "Repository name should be: owner/repository-name",
        ),
        ErrorSolution::detailed(
            2,
            "Examples of valid names",
            "github-username/design-system, company/ui-tokens",
        ),
    ],
    learn_more_url: None,
    retryable: false,
    fallback_available: false,
};

static REPO_BRANCH_NOT_FOUND: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::RepoBranchNotFound,
    category: ErrorCategory::Repository,
    severity: ErrorSeverity::Medium,
    title: "Branch Not Found",
    user_message: "The specified branch does not exist in the repository.",
    technical_message: "Git ref not found for specified branch",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Verify the branch name is correct",
            "Check for typos in the branch name",
        ),
        ErrorSolution::detailed(
            2,
            "Use an existing branch",
            "Common branch names: main, master, develop",
        ),
        ErrorSolution::new(3, "Create a new branch from the base branch"),
    ],
    learn_more_url: None,
    retryable: false,
    fallback_available: true,
};

static REPO_FILE_NOT_FOUND: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::RepoFileNotFound,
    category: ErrorCategory::Repository,
    severity: ErrorSeverity::Low,
    title: "File Not Found",
    user_message: "The file does not exist at the specified path.",
    technical_message: "HTTP 404: File path not found in repository",
    solutions: &[ErrorSolution::detailed(
        1,
        "File will be created automatically",
        "The file is created at the configured path on the next push",
    )],
    learn_more_url: None,
    retryable: true,
    fallback_available: false,
};

// Git operations

static GIT_CREATE_BRANCH_FAILED: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::GitCreateBranchFailed,
    category: ErrorCategory::GitOperation,
    severity: ErrorSeverity::High,
    title: "Failed to Create Branch",
    user_message: "Could not create the new branch in the repository.",
    technical_message: "Git branch creation failed",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Check if a branch with this name already exists",
            "Try using a different branch name",
        ),
        ErrorSolution::new(2, "Verify you have write access to the repository"),
        ErrorSolution::new(3, "Ensure the base branch exists and is accessible"),
    ],
    learn_more_url: None,
    retryable: true,
    fallback_available: true,
};

static GIT_PUSH_FAILED: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::GitPushFailed,
    category: ErrorCategory::GitOperation,
    severity: ErrorSeverity::High,
    title: "Push Failed",
    user_message: "Could not push changes to the repository.",
    technical_message: "Git push operation failed",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Check if the branch is protected",
            "Protected branches may require pull requests",
        ),
        ErrorSolution::new(2, "Verify you have write permissions"),
        ErrorSolution::new(3, "Try creating a pull request instead"),
    ],
    learn_more_url: None,
    retryable: true,
    fallback_available: true,
};

static GIT_CREATE_PR_FAILED: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::GitCreatePrFailed,
    category: ErrorCategory::GitOperation,
    severity: ErrorSeverity::High,
    title: "Failed to Create Pull Request",
    user_message: "Could not create the pull request.",
    technical_message: "GitHub PR creation API call failed",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Check if a PR already exists for this branch",
            "You cannot create duplicate PRs for the same branch",
        ),
        ErrorSolution::new(2, "Verify the source and target branches exist"),
        ErrorSolution::new(3, "Ensure you have write access to the repository"),
    ],
    learn_more_url: None,
    retryable: true,
    fallback_available: true,
};

static GIT_COMMIT_FAILED: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::GitCommitFailed,
    category: ErrorCategory::GitOperation,
    severity: ErrorSeverity::High,
    title: "Commit Failed",
    user_message: "Could not commit changes to the repository.",
    technical_message: "Git commit operation failed",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Check if the file path is valid",
            "File paths should not start with / or contain invalid characters",
        ),
        ErrorSolution::new(2, "Verify repository write access"),
        ErrorSolution::new(3, "Ensure the branch exists"),
    ],
    learn_more_url: None,
    retryable: true,
    fallback_available: true,
};

static GIT_REF_NOT_FOUND: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::GitRefNotFound,
    category: ErrorCategory::GitOperation,
    severity: ErrorSeverity::High,
    title: "Git Reference Not Found",
    user_message: "Could not find the specified branch or ref in the repository.",
    technical_message: "Failed to get ref heads/[branch-name]",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Verify the branch name is correct",
            "Check for typos and ensure the branch exists",
        ),
        ErrorSolution::detailed(
            2,
            "Check your GitHub token permissions",
            "Your token must have access to read repository refs",
        ),
        ErrorSolution::new(3, "Try using \"main\" or \"master\" as the base branch"),
    ],
    learn_more_url: None,
    retryable: true,
    fallback_available: true,
};

// Configuration

static CONFIG_INVALID: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::ConfigInvalid,
    category: ErrorCategory::Configuration,
    severity: ErrorSeverity::High,
    title: "Invalid Configuration",
    user_message: "The GitHub configuration is invalid or incomplete.",
    technical_message: "Configuration validation failed",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Re-run the GitHub setup",
            "Run `token-launch init --force` and enter your details again",
        ),
        ErrorSolution::detailed(
            2,
            "Ensure all required fields are filled",
            "Token, repository, and branch are all required",
        ),
    ],
    learn_more_url: None,
    retryable: false,
    fallback_available: true,
};

static CONFIG_MISSING: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::ConfigMissing,
    category: ErrorCategory::Configuration,
    severity: ErrorSeverity::High,
    title: "Configuration Missing",
    user_message: "No GitHub configuration found. Please set up GitHub integration.",
    technical_message: "GitHub configuration not found in storage",
    solutions: &[ErrorSolution::detailed(
        1,
        "Run GitHub setup",
        "Run `token-launch init` to create a configuration file",
    )],
    learn_more_url: None,
    retryable: false,
    fallback_available: true,
};

// Rate limiting

static RATE_LIMIT_EXCEEDED: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::RateLimitExceeded,
    category: ErrorCategory::RateLimit,
    severity: ErrorSeverity::Medium,
    title: "Rate Limit Exceeded",
    user_message: "You've exceeded GitHub's API rate limit. Please wait before trying again.",
    technical_message: "HTTP 429: API rate limit exceeded",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Wait for rate limit to reset",
            "GitHub rate limits reset every hour",
        ),
        ErrorSolution::detailed(2, "Check your rate limit status", RATE_LIMIT_DOCS_URL),
        ErrorSolution::detailed(
            3,
            "Consider using a GitHub App for higher limits",
            "GitHub Apps have higher rate limits than personal tokens",
        ),
    ],
    learn_more_url: Some(RATE_LIMIT_DOCS_URL),
    retryable: true,
    fallback_available: true,
};

// Extraction

static EXTRACTION_NO_TOKENS: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::ExtractionNoTokens,
    category: ErrorCategory::Validation,
    severity: ErrorSeverity::Medium,
    title: "No Design Tokens Found",
    user_message:
        "No design tokens (colors, typography, effects, variables) were found in this document.",
    technical_message: "Token extraction completed with zero tokens found",
    solutions: &[
        ErrorSolution::detailed(
            1,
            "Create color styles",
            "Select objects and create color styles in the Design panel",
        ),
        ErrorSolution::detailed(
            2,
            "Add text styles",
            "Create text styles from your typography elements",
        ),
        ErrorSolution::detailed(
            3,
            "Set up variables",
            "Use the Variables panel to create design tokens",
        ),
    ],
    learn_more_url: None,
    retryable: false,
    fallback_available: false,
};

static UNKNOWN_ERROR: ErrorDefinition = ErrorDefinition {
    code: ErrorCode::UnknownError,
    category: ErrorCategory::Unknown,
    severity: ErrorSeverity::Medium,
    title: "Unknown Error",
    user_message: "An unexpected error occurred.",
    technical_message: "Unclassified error",
    solutions: &[
        ErrorSolution::new(1, "Try the operation again"),
        ErrorSolution::detailed(
            2,
            "Run again with --verbose for details",
            "Set RUST_LOG=debug or pass --diagnostics <file> to capture a report",
        ),
        ErrorSolution::detailed(
            3,
            "Download tokens locally as a fallback",
            "Use the \"Download JSON\" option",
        ),
    ],
    learn_more_url: None,
    retryable: true,
    fallback_available: true,
};
