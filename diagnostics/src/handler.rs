use crate::classifier::{CascadeClassifier, ClassifiedError, ErrorClassifier};
use crate::codes::ErrorCode;
use crate::error::{RawError, Result};
use crate::presentation::{
    ErrorPresenter, PresentationResult, PresentationRouter, RouteContext, SpecializedFlow,
};
use crate::taxonomy::lookup;
use crate::trail::{DiagnosticSink, SilentSink, TrailLevel};
use serde_json::json;
use std::sync::Arc;

const GENERAL_HELP_URL: &str = "https://help.figma.com/";

/// Help page for a code: the specialized flow's page, then the taxonomy
/// link, then the general help center.
pub fn help_link(code: ErrorCode) -> &'static str {
    SpecializedFlow::for_code(code)
        .map(|flow| flow.help_url())
        .or(lookup(code).learn_more_url)
        .unwrap_or(GENERAL_HELP_URL)
}

/// Options for a single [`ErrorHandler::handle`] call
#[derive(Debug, Clone, Default)]
pub struct HandleOptions {
    /// Free text naming the failing step, appended to the technical message
    pub context: Option<String>,
    pub route: RouteContext,
}

impl HandleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_route(mut self, route: RouteContext) -> Self {
        self.route = route;
        self
    }
}

/// What happened to one handled failure
#[derive(Debug, Clone)]
pub struct HandledError {
    pub classified: ClassifiedError,
    pub presentation: PresentationResult,
}

/// Classifies failures and routes them to their recovery flow in one step
pub struct ErrorHandler<C: ErrorClassifier = CascadeClassifier> {
    classifier: C,
    router: PresentationRouter,
    sink: Arc<dyn DiagnosticSink>,
}

impl ErrorHandler<CascadeClassifier> {
    pub fn new() -> Self {
        Self::with_classifier(CascadeClassifier::new())
    }
}

impl Default for ErrorHandler<CascadeClassifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ErrorClassifier> ErrorHandler<C> {
    pub fn with_classifier(classifier: C) -> Self {
        Self {
            classifier,
            router: PresentationRouter::new(),
            sink: Arc::new(SilentSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Classify a failure without presenting anything
    pub fn classify(&self, error: &RawError, context: Option<&str>) -> ClassifiedError {
        self.classifier.classify(error, context)
    }

    /// Classify `error`, then show its specialized flow or the generic dialog
    pub async fn handle<P: ErrorPresenter>(
        &self,
        error: &RawError,
        options: &HandleOptions,
        presenter: &P,
    ) -> Result<HandledError> {
        let classified = self.classify(error, options.context.as_deref());
        self.present(classified, options, presenter).await
    }

    /// Present an already classified failure
    pub async fn present<P: ErrorPresenter>(
        &self,
        classified: ClassifiedError,
        options: &HandleOptions,
        presenter: &P,
    ) -> Result<HandledError> {
        let code = classified.code();
        tracing::info!(code = %code, "handling error");
        self.sink.record(
            TrailLevel::Error,
            &format!("handling {code}"),
            Some(json!({
                "message": classified.original_message(),
                "status": classified.status(),
                "specialized": self.router.has_specialized_flow(code),
            })),
        );

        let mut route = options.route.clone();
        if route.technical_details.is_none() {
            route.technical_details = Some(classified.technical_message().to_string());
        }

        let presentation = self.router.route(code, &route, presenter).await?;
        self.sink
            .info(&format!("{code} resolved with '{}'", presentation.action));

        Ok(HandledError {
            classified,
            presentation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::{FlowKind, RecoveryAction, RecoveryScreen};
    use crate::trail::DiagnosticTrail;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        screens: Mutex<Vec<RecoveryScreen>>,
    }

    impl ErrorPresenter for Recording {
        async fn present(&self, screen: &RecoveryScreen) -> Result<RecoveryAction> {
            self.screens.lock().unwrap().push(screen.clone());
            Ok(RecoveryAction::Close)
        }
    }

    #[test]
    fn test_help_link_precedence() {
        assert!(help_link(ErrorCode::NetOffline).contains("Troubleshoot-connection-issues"));
        assert_eq!(
            help_link(ErrorCode::RateLimitExceeded),
            lookup(ErrorCode::RateLimitExceeded).learn_more_url.unwrap()
        );
        assert_eq!(help_link(ErrorCode::RepoNotFound), GENERAL_HELP_URL);
    }

    #[tokio::test]
    async fn test_handle_offline_goes_to_specialized_flow() {
        let presenter = Recording::default();
        let handled = ErrorHandler::new()
            .handle(
                &RawError::new("network request failed, offline"),
                &HandleOptions::new(),
                &presenter,
            )
            .await
            .unwrap();

        assert_eq!(handled.classified.code(), ErrorCode::NetOffline);
        assert!(matches!(handled.presentation.flow, FlowKind::Specialized(_)));
        assert_eq!(handled.presentation.action, RecoveryAction::Close);
    }

    #[tokio::test]
    async fn test_handle_generic_attaches_technical_details() {
        let presenter = Recording::default();
        let trail = Arc::new(DiagnosticTrail::new());
        let handler = ErrorHandler::new().with_sink(trail.clone());

        let options = HandleOptions::new()
            .with_context("push")
            .with_route(RouteContext::new().show_technical_details(true));
        let handled = handler
            .handle(&RawError::new("Not Found").with_status(404), &options, &presenter)
            .await
            .unwrap();

        assert_eq!(handled.classified.code(), ErrorCode::UnknownError);
        let screens = presenter.screens.lock().unwrap();
        let details = screens[0].technical_details.as_deref().unwrap();
        assert!(details.contains("(Context: push)"));
        assert!(details.ends_with("Original: Not Found"));
        assert_eq!(trail.len(), 2);
    }
}
