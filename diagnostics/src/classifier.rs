//! Maps a raw failure onto one taxonomy code.
//!
//! The cascade is an ordered rule table. Rules are evaluated top to bottom
//! and the first match wins, so a message carrying keywords of several
//! categories resolves by table order, not by which keyword is more
//! specific.

use crate::codes::ErrorCode;
use crate::error::RawError;
use crate::taxonomy::{lookup, ErrorDefinition};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Lowercased view of a failure that rules match against
#[derive(Debug, Clone)]
pub struct Signal {
    message: String,
    status: Option<u16>,
}

impl Signal {
    pub fn new(error: &RawError) -> Self {
        Self {
            message: error.message.to_lowercase(),
            status: error.status,
        }
    }

    fn has(&self, needle: &str) -> bool {
        self.message.contains(needle)
    }

    fn has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.message.contains(n))
    }

    fn status_is(&self, status: u16) -> bool {
        self.status == Some(status)
    }
}

/// What a matching rule resolves to
#[derive(Clone, Copy)]
pub enum Outcome {
    Code(ErrorCode),
    /// Evaluate `rules` in order; `fallback` when none of them match
    Cascade {
        rules: &'static [Rule],
        fallback: ErrorCode,
    },
}

/// A named predicate and the outcome it selects
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&Signal) -> bool,
    pub outcome: Outcome,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Code(code) => write!(f, "{} => {code}", self.name),
            Outcome::Cascade { rules, fallback } => f
                .debug_struct(self.name)
                .field("rules", &rules)
                .field("fallback", &fallback)
                .finish(),
        }
    }
}

const fn rule(name: &'static str, matches: fn(&Signal) -> bool, code: ErrorCode) -> Rule {
    Rule {
        name,
        matches,
        outcome: Outcome::Code(code),
    }
}

const fn cascade(
    name: &'static str,
    matches: fn(&Signal) -> bool,
    rules: &'static [Rule],
    fallback: ErrorCode,
) -> Rule {
    Rule {
        name,
        matches,
        outcome: Outcome::Cascade { rules, fallback },
    }
}

static FORBIDDEN_RULES: [Rule; 2] = [
    rule(
        "forbidden/permission",
        |s| s.has_any(&["permission", "scope"]),
        ErrorCode::AuthzInsufficientPermissions,
    ),
    rule(
        "forbidden/protected",
        |s| s.has("protected"),
        ErrorCode::AuthzBranchProtected,
    ),
];

static NOT_FOUND_RULES: [Rule; 3] = [
    rule(
        "not-found/repository",
        |s| s.has_any(&["repository", "repo"]),
        ErrorCode::RepoNotFound,
    ),
    rule(
        "not-found/branch",
        |s| s.has_any(&["branch", "ref"]),
        ErrorCode::RepoBranchNotFound,
    ),
    rule("not-found/file", |s| s.has("file"), ErrorCode::RepoFileNotFound),
];

static NETWORK_RULES: [Rule; 2] = [
    rule("network/offline", |s| s.has("offline"), ErrorCode::NetOffline),
    rule("network/timeout", |s| s.has("timeout"), ErrorCode::NetTimeout),
];

static CONFIG_RULES: [Rule; 1] = [rule(
    "config/missing",
    |s| s.has("missing"),
    ErrorCode::ConfigMissing,
)];

/// Top level cascade, highest priority first
pub static CASCADE: [Rule; 13] = [
    rule(
        "unauthorized",
        |s| s.status_is(401) || s.has("bad credentials"),
        ErrorCode::AuthBadCredentials,
    ),
    rule(
        "token/invalid",
        |s| s.has("token") && s.has_any(&["invalid", "expired"]),
        ErrorCode::AuthTokenInvalid,
    ),
    rule(
        "token/missing",
        |s| s.has("token") && s.has("missing"),
        ErrorCode::AuthTokenMissing,
    ),
    cascade(
        "forbidden",
        |s| s.status_is(403),
        &FORBIDDEN_RULES,
        ErrorCode::AuthzRepoAccessDenied,
    ),
    // A 404 that names nothing recognisable stays unknown.
    cascade(
        "not-found",
        |s| s.status_is(404),
        &NOT_FOUND_RULES,
        ErrorCode::UnknownError,
    ),
    rule(
        "rate-limit",
        |s| s.status_is(429) || s.has("rate limit"),
        ErrorCode::RateLimitExceeded,
    ),
    cascade(
        "network",
        |s| s.has_any(&["network", "connection", "fetch"]),
        &NETWORK_RULES,
        ErrorCode::NetConnectionFailed,
    ),
    rule(
        "git/ref",
        |s| s.has("failed to get ref"),
        ErrorCode::GitRefNotFound,
    ),
    rule(
        "git/create-branch",
        |s| s.has_any(&["create branch", "branch creation"]),
        ErrorCode::GitCreateBranchFailed,
    ),
    rule(
        "git/push",
        |s| s.has("push") && s.has("failed"),
        ErrorCode::GitPushFailed,
    ),
    rule(
        "git/pull-request",
        |s| s.has_any(&["pull request", "pr"]),
        ErrorCode::GitCreatePrFailed,
    ),
    rule("git/commit", |s| s.has("commit"), ErrorCode::GitCommitFailed),
    cascade(
        "config",
        |s| s.has_any(&["configuration", "config"]),
        &CONFIG_RULES,
        ErrorCode::ConfigInvalid,
    ),
];

/// Which rule path produced a code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub code: ErrorCode,
    /// Names of the rules taken, outermost first. Empty when nothing matched.
    pub path: Vec<&'static str>,
}

impl Match {
    /// Rule path joined for display, or `"default"` when no rule matched
    pub fn describe(&self) -> String {
        if self.path.is_empty() {
            "default".to_string()
        } else {
            self.path.join(" > ")
        }
    }
}

fn evaluate(rules: &'static [Rule], signal: &Signal, path: &mut Vec<&'static str>) -> Option<ErrorCode> {
    let rule = rules.iter().find(|r| (r.matches)(signal))?;
    path.push(rule.name);
    match rule.outcome {
        Outcome::Code(code) => Some(code),
        Outcome::Cascade { rules, fallback } => Some(evaluate(rules, signal, path).unwrap_or(fallback)),
    }
}

/// A failure joined with its taxonomy entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    definition: &'static ErrorDefinition,
    /// Registry technical message annotated with context and the original message
    annotated_technical_message: String,
    original_message: String,
    status: Option<u16>,
}

impl Serialize for ClassifiedError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let d = self.definition;
        let mut state = serializer.serialize_struct("ClassifiedError", 12)?;
        state.serialize_field("code", &d.code)?;
        state.serialize_field("category", &d.category)?;
        state.serialize_field("severity", &d.severity)?;
        state.serialize_field("title", d.title)?;
        state.serialize_field("user_message", d.user_message)?;
        state.serialize_field("technical_message", &self.annotated_technical_message)?;
        state.serialize_field("solutions", d.solutions)?;
        state.serialize_field("learn_more_url", &d.learn_more_url)?;
        state.serialize_field("retryable", &d.retryable)?;
        state.serialize_field("fallback_available", &d.fallback_available)?;
        state.serialize_field("original_message", &self.original_message)?;
        state.serialize_field("status", &self.status)?;
        state.end()
    }
}

impl ClassifiedError {
    pub fn new(code: ErrorCode, error: &RawError, context: Option<&str>) -> Self {
        let definition = lookup(code);
        let context_note = context
            .filter(|c| !c.is_empty())
            .map(|c| format!(" (Context: {c})"))
            .unwrap_or_default();

        Self {
            definition,
            annotated_technical_message: format!(
                "{}{}\nOriginal: {}",
                definition.technical_message, context_note, error.message
            ),
            original_message: error.message.clone(),
            status: error.status,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.definition.code
    }

    pub fn definition(&self) -> &'static ErrorDefinition {
        self.definition
    }

    pub fn title(&self) -> &'static str {
        self.definition.title
    }

    pub fn user_message(&self) -> &'static str {
        self.definition.user_message
    }

    pub fn technical_message(&self) -> &str {
        &self.annotated_technical_message
    }

    pub fn original_message(&self) -> &str {
        &self.original_message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn retryable(&self) -> bool {
        self.definition.retryable
    }

    pub fn fallback_available(&self) -> bool {
        self.definition.fallback_available
    }
}

/// Trait for error classification - pure logic, no presentation
pub trait ErrorClassifier: Send + Sync {
    /// Select a code and report the rule path that selected it
    fn matched_rule(&self, error: &RawError) -> Match;

    /// Select the single best-matching code for a failure
    fn classify_code(&self, error: &RawError) -> ErrorCode {
        self.matched_rule(error).code
    }

    /// Classify a failure and attach its metadata
    fn classify(&self, error: &RawError, context: Option<&str>) -> ClassifiedError {
        ClassifiedError::new(self.classify_code(error), error, context)
    }
}

/// Default classifier running [`CASCADE`]
#[derive(Debug, Clone, Copy)]
pub struct CascadeClassifier {
    rules: &'static [Rule],
}

impl CascadeClassifier {
    pub fn new() -> Self {
        Self { rules: &CASCADE }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }
}

impl Default for CascadeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorClassifier for CascadeClassifier {
    fn matched_rule(&self, error: &RawError) -> Match {
        let signal = Signal::new(error);
        let mut path = Vec::new();
        let code = evaluate(self.rules, &signal, &mut path).unwrap_or(ErrorCode::UnknownError);
        Match { code, path }
    }
}

/// Classify with the default cascade
pub fn classify(error: &RawError, context: Option<&str>) -> ClassifiedError {
    CascadeClassifier::new().classify(error, context)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_for(message: &str, status: Option<u16>) -> ErrorCode {
        let mut error = RawError::new(message);
        error.status = status;
        CascadeClassifier::new().classify_code(&error)
    }

    #[test]
    fn test_authentication_rules() {
        assert_eq!(code_for("Bad credentials", Some(401)), ErrorCode::AuthBadCredentials);
        assert_eq!(code_for("Bad credentials", None), ErrorCode::AuthBadCredentials);
        assert_eq!(code_for("Requires authentication", Some(401)), ErrorCode::AuthBadCredentials);
        assert_eq!(code_for("Token has expired", None), ErrorCode::AuthTokenInvalid);
        assert_eq!(code_for("token is missing", None), ErrorCode::AuthTokenMissing);
    }

    #[test]
    fn test_forbidden_sub_cascade() {
        assert_eq!(
            code_for("Resource not accessible: missing scope", Some(403)),
            ErrorCode::AuthzInsufficientPermissions
        );
        assert_eq!(
            code_for("Protected branch update failed", Some(403)),
            ErrorCode::AuthzBranchProtected
        );
        assert_eq!(code_for("Forbidden", Some(403)), ErrorCode::AuthzRepoAccessDenied);
    }

    #[test]
    fn test_not_found_sub_cascade() {
        assert_eq!(code_for("Repository not found", Some(404)), ErrorCode::RepoNotFound);
        assert_eq!(code_for("branch ref not found", Some(404)), ErrorCode::RepoBranchNotFound);
        assert_eq!(code_for("file does not exist", Some(404)), ErrorCode::RepoFileNotFound);
        assert_eq!(code_for("Not Found", Some(404)), ErrorCode::UnknownError);
    }

    #[test]
    fn test_rate_limit() {
        assert_eq!(code_for("API rate limit exceeded", Some(429)), ErrorCode::RateLimitExceeded);
        assert_eq!(code_for("secondary rate limit hit", Some(500)), ErrorCode::RateLimitExceeded);
    }

    #[test]
    fn test_network_sub_cascade() {
        assert_eq!(code_for("network request failed, offline", None), ErrorCode::NetOffline);
        assert_eq!(code_for("network request failed, timeout", None), ErrorCode::NetTimeout);
        assert_eq!(code_for("network request failed", None), ErrorCode::NetConnectionFailed);
        assert_eq!(code_for("error sending request: connection refused", None), ErrorCode::NetConnectionFailed);
    }

    #[test]
    fn test_git_operation_rules() {
        assert_eq!(code_for("Failed to get ref heads/main", None), ErrorCode::GitRefNotFound);
        assert_eq!(code_for("could not create branch", None), ErrorCode::GitCreateBranchFailed);
        assert_eq!(code_for("push failed", None), ErrorCode::GitPushFailed);
        assert_eq!(code_for("Pull request already exists", None), ErrorCode::GitCreatePrFailed);
        assert_eq!(code_for("unable to commit", None), ErrorCode::GitCommitFailed);
    }

    #[test]
    fn test_configuration_rules() {
        assert_eq!(code_for("config missing", None), ErrorCode::ConfigMissing);
        assert_eq!(code_for("bad configuration value", None), ErrorCode::ConfigInvalid);
    }

    #[test]
    fn test_unknown_default() {
        assert_eq!(code_for("something odd happened", None), ErrorCode::UnknownError);
        assert_eq!(code_for("", None), ErrorCode::UnknownError);
    }

    #[test]
    fn test_first_rule_wins_over_specificity() {
        // "token" + "invalid" outranks the network keywords further down.
        assert_eq!(
            code_for("network says token invalid", None),
            ErrorCode::AuthTokenInvalid
        );
        // Short keyword "pr" matches inside unrelated words.
        assert_eq!(code_for("unexpected prompt", None), ErrorCode::GitCreatePrFailed);
    }

    #[test]
    fn test_matched_rule_path() {
        let classifier = CascadeClassifier::new();
        let m = classifier.matched_rule(&RawError::new("Not here").with_status(404));
        assert_eq!(m.code, ErrorCode::UnknownError);
        assert_eq!(m.path, vec!["not-found"]);

        let m = classifier.matched_rule(&RawError::new("fetch failed: offline"));
        assert_eq!(m.describe(), "network > network/offline");

        let m = classifier.matched_rule(&RawError::new("weird"));
        assert!(m.path.is_empty());
        assert_eq!(m.describe(), "default");
    }

    #[test]
    fn test_technical_message_annotation() {
        let error = RawError::new("Bad credentials").with_status(401);
        let classified = classify(&error, Some("pushing tokens"));
        assert_eq!(classified.code(), ErrorCode::AuthBadCredentials);
        assert_eq!(
            classified.technical_message(),
            "HTTP 401: Bad credentials (Context: pushing tokens)\nOriginal: Bad credentials"
        );
        assert_eq!(classified.original_message(), "Bad credentials");
        assert_eq!(classified.status(), Some(401));

        let without_context = classify(&RawError::new("weird"), None);
        assert_eq!(without_context.technical_message(), "Unclassified error\nOriginal: weird");
    }

    #[test]
    fn test_classification_is_deterministic() {
        let error = RawError::new("network timeout").with_status(503);
        assert_eq!(classify(&error, Some("x")), classify(&error, Some("x")));
    }

    #[test]
    fn test_classified_error_serializes_annotated_message() {
        let classified = classify(&RawError::new("push failed"), Some("push"));
        let json = serde_json::to_value(&classified).unwrap();
        assert_eq!(json["code"], "GIT_PUSH_FAILED");
        assert_eq!(json["category"], "git_operation");
        assert!(json["technical_message"]
            .as_str()
            .unwrap()
            .contains("Original: push failed"));
    }
}
