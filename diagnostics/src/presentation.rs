//! Chooses how a classified error is shown and collects the user's decision.
//!
//! Two codes get a fixed-content specialized flow; everything else uses the
//! generic dialog built from taxonomy metadata. The router only reports the
//! chosen [`RecoveryAction`]. Carrying it out is the caller's job.

use crate::codes::ErrorCode;
use crate::error::{DiagnosticsError, Result};
use crate::taxonomy::lookup;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// A terminal decision the user can make on a recovery screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryAction {
    Retry,
    DownloadLocally,
    UseFallback,
    LearnMore,
    Close,
}

impl RecoveryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retry => "retry",
            Self::DownloadLocally => "download-locally",
            Self::UseFallback => "use-fallback",
            Self::LearnMore => "learn-more",
            Self::Close => "close",
        }
    }

    /// Button text for the action
    pub fn label(&self) -> &'static str {
        match self {
            Self::Retry => "Try Again",
            Self::DownloadLocally => "Download JSON Instead",
            Self::UseFallback => "Download Tokens Locally",
            Self::LearnMore => "Learn More",
            Self::Close => "Close",
        }
    }

    /// Whether the action asks the caller to save tokens locally
    pub fn wants_download(&self) -> bool {
        matches!(self, Self::DownloadLocally | Self::UseFallback)
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-content recovery flows bound to a single code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecializedFlow {
    Offline,
    EmptyDocument,
}

impl SpecializedFlow {
    pub fn for_code(code: ErrorCode) -> Option<Self> {
        match code {
            ErrorCode::NetOffline => Some(Self::Offline),
            ErrorCode::ExtractionNoTokens => Some(Self::EmptyDocument),
            _ => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Offline => ErrorCode::NetOffline,
            Self::EmptyDocument => ErrorCode::ExtractionNoTokens,
        }
    }

    pub fn actions(&self) -> &'static [RecoveryAction] {
        match self {
            Self::Offline => &[
                RecoveryAction::Retry,
                RecoveryAction::DownloadLocally,
                RecoveryAction::Close,
            ],
            Self::EmptyDocument => &[RecoveryAction::LearnMore, RecoveryAction::Close],
        }
    }

    pub fn help_url(&self) -> &'static str {
        match self {
            Self::Offline => {
                "https://help.figma.com/hc/en-us/articles/360040328613-Troubleshoot-connection-issues"
            }
            Self::EmptyDocument => {
                "https://help.figma.com/hc/en-us/articles/360041003174-Create-and-apply-styles"
            }
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::Offline => "No Internet Connection",
            Self::EmptyDocument => "No Design Tokens Found",
        }
    }

    fn message(&self, document_name: Option<&str>) -> String {
        match self {
            Self::Offline => "Unable to connect to GitHub. Token extraction doesn't require \
                internet, only the GitHub push does. You can download your tokens now and sync later."
                .to_string(),
            Self::EmptyDocument => match document_name {
                Some(name) => format!(
                    "\"{name}\" doesn't contain any design tokens yet. Design tokens are the \
                    reusable colors, typography, effects and variables of your design system."
                ),
                None => "This document doesn't contain any design tokens yet. Design tokens are \
                    the reusable colors, typography, effects and variables of your design system."
                    .to_string(),
            },
        }
    }

    fn tips(&self) -> Vec<String> {
        let tips: &[&str] = match self {
            Self::Offline => &[
                "Check your connection: verify Wi-Fi, Ethernet or cellular data and try again",
                "Download tokens offline: save the JSON file and upload it to GitHub later",
            ],
            Self::EmptyDocument => &[
                "Create a color style: select a shape, open the fill panel and save it as a style",
                "Create a text style: name it descriptively, e.g. \"Heading/Large\"",
                "Save shadows or blurs as effect styles",
                "Or use the Variables panel for more advanced token management",
            ],
        };
        tips.iter().map(|t| t.to_string()).collect()
    }
}

/// Which kind of flow a screen belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "flow")]
pub enum FlowKind {
    Specialized(SpecializedFlow),
    Generic,
}

/// Check if a code has a dedicated recovery flow
pub fn has_specialized_flow(code: ErrorCode) -> bool {
    SpecializedFlow::for_code(code).is_some()
}

/// Actions the generic dialog offers for a code, gated by its metadata
pub fn generic_actions(code: ErrorCode) -> Vec<RecoveryAction> {
    let definition = lookup(code);
    let mut actions = Vec::with_capacity(4);
    if definition.retryable {
        actions.push(RecoveryAction::Retry);
    }
    if definition.fallback_available {
        actions.push(RecoveryAction::UseFallback);
    }
    if definition.learn_more_url.is_some() {
        actions.push(RecoveryAction::LearnMore);
    }
    actions.push(RecoveryAction::Close);
    actions
}

/// Caller supplied details for a recovery screen
#[derive(Debug, Clone, Default)]
pub struct RouteContext {
    pub document_name: Option<String>,
    pub technical_details: Option<String>,
    pub show_technical_details: bool,
}

impl RouteContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document_name<S: Into<String>>(mut self, name: S) -> Self {
        self.document_name = Some(name.into());
        self
    }

    pub fn with_technical_details<S: Into<String>>(mut self, details: S) -> Self {
        self.technical_details = Some(details.into());
        self
    }

    pub fn show_technical_details(mut self, show: bool) -> Self {
        self.show_technical_details = show;
        self
    }
}

/// Everything a presenter needs to draw one recovery screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryScreen {
    pub code: ErrorCode,
    pub kind: FlowKind,
    pub title: String,
    pub message: String,
    /// Ordered remediation lines, already numbered by position
    pub steps: Vec<String>,
    pub actions: Vec<RecoveryAction>,
    pub help_url: Option<&'static str>,
    /// Present only when the caller asked for technical details
    pub technical_details: Option<String>,
}

impl RecoveryScreen {
    /// Build the screen for a code
    pub fn for_code(code: ErrorCode, context: &RouteContext) -> Self {
        let technical_details = context
            .technical_details
            .clone()
            .filter(|_| context.show_technical_details);

        match SpecializedFlow::for_code(code) {
            Some(flow) => Self {
                code,
                kind: FlowKind::Specialized(flow),
                title: flow.title().to_string(),
                message: flow.message(context.document_name.as_deref()),
                steps: flow.tips(),
                actions: flow.actions().to_vec(),
                help_url: Some(flow.help_url()),
                technical_details,
            },
            None => {
                let definition = lookup(code);
                Self {
                    code,
                    kind: FlowKind::Generic,
                    title: definition.title.to_string(),
                    message: definition.user_message.to_string(),
                    steps: definition
                        .solutions
                        .iter()
                        .map(|s| match s.details {
                            Some(details) => format!("{}: {}", s.action, details),
                            None => s.action.to_string(),
                        })
                        .collect(),
                    actions: generic_actions(code),
                    help_url: definition.learn_more_url,
                    technical_details,
                }
            }
        }
    }

    pub fn offers(&self, action: RecoveryAction) -> bool {
        self.actions.contains(&action)
    }
}

/// Lifecycle of one shown screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Shown,
    Resolved(RecoveryAction),
}

/// The single terminal outcome of a recovery flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresentationResult {
    pub code: ErrorCode,
    pub flow: FlowKind,
    pub action: RecoveryAction,
}

/// A shown screen waiting for exactly one offered action
#[derive(Debug, Clone)]
pub struct RecoveryFlow {
    screen: RecoveryScreen,
    state: FlowState,
}

impl RecoveryFlow {
    pub fn show(screen: RecoveryScreen) -> Self {
        Self {
            screen,
            state: FlowState::Shown,
        }
    }

    pub fn screen(&self) -> &RecoveryScreen {
        &self.screen
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Resolve with the user's action. Rejects actions the screen does not
    /// offer and any second resolution.
    pub fn resolve(&mut self, action: RecoveryAction) -> Result<PresentationResult> {
        if let FlowState::Resolved(_) = self.state {
            return Err(DiagnosticsError::FlowAlreadyResolved(self.screen.code));
        }
        if !self.screen.offers(action) {
            return Err(DiagnosticsError::ActionNotOffered {
                code: self.screen.code,
                action,
            });
        }
        self.state = FlowState::Resolved(action);
        Ok(PresentationResult {
            code: self.screen.code,
            flow: self.screen.kind,
            action,
        })
    }
}

/// Capability for showing a recovery screen and waiting for a decision
pub trait ErrorPresenter: Send + Sync {
    /// Show the screen; resolves once the user picks one of `screen.actions`
    fn present(&self, screen: &RecoveryScreen) -> impl Future<Output = Result<RecoveryAction>> + Send;
}

/// Routes error codes to their recovery flow
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentationRouter;

impl PresentationRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn has_specialized_flow(&self, code: ErrorCode) -> bool {
        has_specialized_flow(code)
    }

    /// Show the flow for `code` and return the user's single decision
    pub async fn route<P: ErrorPresenter>(
        &self,
        code: ErrorCode,
        context: &RouteContext,
        presenter: &P,
    ) -> Result<PresentationResult> {
        let mut flow = RecoveryFlow::show(RecoveryScreen::for_code(code, context));
        tracing::debug!(code = %code, kind = ?flow.screen().kind, "showing recovery flow");

        let action = presenter.present(flow.screen()).await?;
        let result = flow.resolve(action)?;

        tracing::debug!(code = %code, action = %result.action, "recovery flow resolved");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Picks(RecoveryAction);

    impl ErrorPresenter for Picks {
        async fn present(&self, _screen: &RecoveryScreen) -> Result<RecoveryAction> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_specialized_flow_membership() {
        assert!(has_specialized_flow(ErrorCode::NetOffline));
        assert!(has_specialized_flow(ErrorCode::ExtractionNoTokens));
        assert!(!has_specialized_flow(ErrorCode::AuthTokenInvalid));

        let specialized = ErrorCode::ALL
            .iter()
            .filter(|c| has_specialized_flow(**c))
            .count();
        assert_eq!(specialized, 2);
    }

    #[test]
    fn test_specialized_flow_round_trips_its_code() {
        for flow in [SpecializedFlow::Offline, SpecializedFlow::EmptyDocument] {
            assert_eq!(SpecializedFlow::for_code(flow.code()), Some(flow));
        }
    }

    #[test]
    fn test_generic_actions_follow_flags() {
        // retryable, fallback, learn more url
        assert_eq!(
            generic_actions(ErrorCode::RateLimitExceeded),
            vec![
                RecoveryAction::Retry,
                RecoveryAction::UseFallback,
                RecoveryAction::LearnMore,
                RecoveryAction::Close
            ]
        );
        // not retryable, fallback, no url
        assert_eq!(
            generic_actions(ErrorCode::AuthzRepoAccessDenied),
            vec![RecoveryAction::UseFallback, RecoveryAction::Close]
        );
        // nothing but close
        assert_eq!(generic_actions(ErrorCode::RepoInvalidName), vec![RecoveryAction::Close]);
    }

    #[test]
    fn test_screen_content() {
        let context = RouteContext::new()
            .with_document_name("Brand Kit")
            .with_technical_details("HTTP 404");

        let empty = RecoveryScreen::for_code(ErrorCode::ExtractionNoTokens, &context);
        assert_eq!(empty.kind, FlowKind::Specialized(SpecializedFlow::EmptyDocument));
        assert!(empty.message.contains("\"Brand Kit\""));
        assert_eq!(empty.actions, vec![RecoveryAction::LearnMore, RecoveryAction::Close]);
        assert!(empty.technical_details.is_none());

        let generic = RecoveryScreen::for_code(
            ErrorCode::RepoNotFound,
            &context.clone().show_technical_details(true),
        );
        assert_eq!(generic.kind, FlowKind::Generic);
        assert_eq!(generic.title, "Repository Not Found");
        assert_eq!(generic.steps.len(), 3);
        assert_eq!(generic.technical_details.as_deref(), Some("HTTP 404"));
    }

    #[test]
    fn test_flow_resolves_exactly_once() {
        let screen = RecoveryScreen::for_code(ErrorCode::NetOffline, &RouteContext::new());
        let mut flow = RecoveryFlow::show(screen);
        assert_eq!(flow.state(), FlowState::Shown);

        let result = flow.resolve(RecoveryAction::DownloadLocally).unwrap();
        assert_eq!(result.action, RecoveryAction::DownloadLocally);
        assert_eq!(flow.state(), FlowState::Resolved(RecoveryAction::DownloadLocally));

        assert!(matches!(
            flow.resolve(RecoveryAction::Close),
            Err(DiagnosticsError::FlowAlreadyResolved(ErrorCode::NetOffline))
        ));
    }

    #[test]
    fn test_flow_rejects_unoffered_action() {
        let screen = RecoveryScreen::for_code(ErrorCode::ExtractionNoTokens, &RouteContext::new());
        let mut flow = RecoveryFlow::show(screen);
        assert!(matches!(
            flow.resolve(RecoveryAction::Retry),
            Err(DiagnosticsError::ActionNotOffered { .. })
        ));
        assert_eq!(flow.state(), FlowState::Shown);
    }

    #[tokio::test]
    async fn test_route_offline_flow() {
        let router = PresentationRouter::new();
        let result = router
            .route(ErrorCode::NetOffline, &RouteContext::new(), &Picks(RecoveryAction::Retry))
            .await
            .unwrap();

        assert_eq!(result.flow, FlowKind::Specialized(SpecializedFlow::Offline));
        assert_eq!(result.action, RecoveryAction::Retry);
    }

    #[tokio::test]
    async fn test_route_generic_flow_rejects_hidden_action() {
        let router = PresentationRouter::new();
        let err = router
            .route(
                ErrorCode::RepoInvalidName,
                &RouteContext::new(),
                &Picks(RecoveryAction::Retry),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DiagnosticsError::ActionNotOffered { .. }));
    }
}
