//! The export workflow: extract, check connectivity, ask, then push or
//! download, with a download fallback when a push fails.
//!
//! [`ExportWorkflow::run_workflow`] never fails. Anything that escapes a step
//! is classified and reported in the returned [`WorkflowResult`].

use crate::error::WorkflowError;
use crate::traits::{LocalExporter, TokenPublisher, TokenSource, WorkflowPresenter};
use crate::types::{
    ConnectivityStatus, DownloadOutcome, ExportChoice, ExtractionResult, ExtractionSummary,
    Notice, PushOutcome, WorkflowResult, WorkflowState,
};
use chrono::{DateTime, Utc};
use diagnostics::{
    CascadeClassifier, ClassifiedError, DiagnosticSink, ErrorClassifier, SilentSink, TrailLevel,
};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Message used when a push is requested without any publisher configured
const PUBLISHER_MISSING: &str = "GitHub configuration missing";

/// A fatal failure and the step it escaped from
struct Failure {
    step: &'static str,
    error: WorkflowError,
}

impl Failure {
    fn at(step: &'static str) -> impl FnOnce(WorkflowError) -> Self {
        move |error| Self { step, error }
    }
}

/// Result of the step chosen by the user
struct StepOutcome {
    success: bool,
    choice: ExportChoice,
    git_result: Option<PushOutcome>,
    download_result: Option<DownloadOutcome>,
    error: Option<ClassifiedError>,
}

impl StepOutcome {
    fn new(choice: ExportChoice, success: bool) -> Self {
        Self {
            success,
            choice,
            git_result: None,
            download_result: None,
            error: None,
        }
    }
}

/// Drives one export from extraction to a terminal state
pub struct ExportWorkflow<S, P, E, U> {
    source: S,
    publisher: Option<P>,
    exporter: E,
    presenter: U,
    classifier: Arc<dyn ErrorClassifier>,
    sink: Arc<dyn DiagnosticSink>,
}

impl<S, P, E, U> ExportWorkflow<S, P, E, U>
where
    S: TokenSource,
    P: TokenPublisher,
    E: LocalExporter,
    U: WorkflowPresenter,
{
    /// Create a workflow. Without a publisher only download and cancel can succeed.
    pub fn new(source: S, publisher: Option<P>, exporter: E, presenter: U) -> Self {
        Self {
            source,
            publisher,
            exporter,
            presenter,
            classifier: Arc::new(CascadeClassifier::new()),
            sink: Arc::new(SilentSink),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ErrorClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn presenter(&self) -> &U {
        &self.presenter
    }

    pub fn publisher(&self) -> Option<&P> {
        self.publisher.as_ref()
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Run the complete workflow
    pub async fn run_workflow(&self) -> WorkflowResult {
        let started = Instant::now();
        let mut states = Vec::new();

        self.enter(&mut states, WorkflowState::Init);
        self.initialize_publisher().await;

        let result = match self.execute(&mut states).await {
            Ok((extraction, outcome)) => WorkflowResult {
                success: outcome.success,
                choice: outcome.choice,
                extraction_result: Some(extraction),
                git_result: outcome.git_result,
                download_result: outcome.download_result,
                error: outcome.error,
                duration_ms: 0,
                transitions: Vec::new(),
            },
            Err(failure) => {
                let classified = self.classify(&failure.error, failure.step);
                error!(
                    step = failure.step,
                    code = %classified.code(),
                    "workflow failed: {}",
                    failure.error
                );
                WorkflowResult {
                    success: false,
                    choice: ExportChoice::Cancel,
                    extraction_result: None,
                    git_result: None,
                    download_result: None,
                    error: Some(classified),
                    duration_ms: 0,
                    transitions: Vec::new(),
                }
            }
        };

        self.enter(&mut states, WorkflowState::Done);
        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            success = result.success,
            choice = %result.choice,
            duration_ms,
            "export workflow finished"
        );
        self.sink.record(
            TrailLevel::Info,
            "workflow finished",
            Some(json!({
                "success": result.success,
                "choice": result.choice,
                "durationMs": duration_ms,
            })),
        );

        WorkflowResult {
            duration_ms,
            transitions: states,
            ..result
        }
    }

    async fn execute(
        &self,
        states: &mut Vec<WorkflowState>,
    ) -> Result<(ExtractionResult, StepOutcome), Failure> {
        self.enter(states, WorkflowState::Extracting);
        let extraction = self.extract().await.map_err(Failure::at("extraction"))?;

        self.enter(states, WorkflowState::CheckingConnectivity);
        let connectivity = self.check_connectivity().await;

        self.enter(states, WorkflowState::AwaitingChoice);
        let summary = ExtractionSummary::from(&extraction);
        let choice = self
            .presenter
            .present_choice(&summary, &connectivity)
            .await
            .map_err(Failure::at("choice"))?;
        debug!(choice = %choice, "user selected export target");

        let outcome = match choice {
            ExportChoice::GitPush => {
                self.enter(states, WorkflowState::Pushing);
                if !connectivity.push_available() {
                    warn!("push requested while the repository is unavailable");
                }
                self.push(&extraction, states).await?
            }
            ExportChoice::Download => {
                self.enter(states, WorkflowState::Downloading);
                self.download(&extraction).await
            }
            ExportChoice::Cancel => {
                self.enter(states, WorkflowState::Cancelled);
                info!("user cancelled export");
                self.presenter.notify(Notice::info("Export cancelled"));
                StepOutcome::new(ExportChoice::Cancel, false)
            }
        };

        Ok((extraction, outcome))
    }

    async fn initialize_publisher(&self) {
        let Some(publisher) = &self.publisher else {
            debug!("no publisher configured, running in local-only mode");
            return;
        };
        if let Err(err) = publisher.initialize().await {
            warn!("publisher initialization failed, push unavailable: {err}");
            self.sink
                .warn(&format!("publisher initialization failed: {err}"));
        }
    }

    async fn extract(&self) -> crate::error::Result<ExtractionResult> {
        let started = Instant::now();
        let started_at = Utc::now();
        let mut extraction = self.source.extract().await?;
        extraction.metadata.duration_ms = extraction_duration_ms(
            extraction.metadata.extracted_at,
            started_at,
            Utc::now(),
            started.elapsed(),
        );

        info!(
            tokens = extraction.tokens.len(),
            variables = extraction.variables.len(),
            collections = extraction.collections.len(),
            "extracted design tokens"
        );
        if extraction.has_errors() {
            warn!(
                "extraction completed with {} errors",
                extraction.metadata.errors.len()
            );
            self.sink.record(
                TrailLevel::Warn,
                "extraction completed with errors",
                Some(json!(extraction.metadata.errors)),
            );
        }
        if extraction.is_empty() {
            warn!(document = %extraction.document.name, "document contains no design tokens");
        }
        Ok(extraction)
    }

    async fn check_connectivity(&self) -> ConnectivityStatus {
        let status = match &self.publisher {
            Some(publisher) => publisher.check_connectivity().await,
            None => ConnectivityStatus::not_configured(),
        };
        if !status.push_available() {
            debug!(
                configured = status.configured,
                error = status.error.as_deref().unwrap_or(""),
                "push unavailable"
            );
        }
        self.sink.record(
            TrailLevel::Info,
            "connectivity checked",
            Some(json!({
                "configured": status.configured,
                "connected": status.connected,
                "repository": status.repository,
            })),
        );
        status
    }

    async fn push(
        &self,
        extraction: &ExtractionResult,
        states: &mut Vec<WorkflowState>,
    ) -> Result<StepOutcome, Failure> {
        let attempt = match &self.publisher {
            Some(publisher) => {
                publisher
                    .push(extraction, self.presenter.push_feedback())
                    .await
            }
            None => Err(WorkflowError::remote(PUBLISHER_MISSING, None)),
        };

        let (err, rejected) = match attempt {
            Ok(outcome) if outcome.success => {
                let (path, size) = outcome
                    .file_info
                    .as_ref()
                    .map(|f| (f.path.clone(), f.display_size()))
                    .unwrap_or_default();
                info!(path = %path, "pushed tokens");
                self.presenter
                    .notify(Notice::success(format!("Pushed to GitHub! {path} ({size})")));
                let mut step = StepOutcome::new(ExportChoice::GitPush, true);
                step.git_result = Some(outcome);
                return Ok(step);
            }
            Ok(outcome) => {
                let message = outcome
                    .error
                    .clone()
                    .unwrap_or_else(|| "Git push failed".to_string());
                (WorkflowError::remote(message, None), outcome)
            }
            Err(err) => {
                let rejected = PushOutcome::rejected(err.to_raw().message);
                (err, rejected)
            }
        };

        self.recover_from_push(extraction, err, rejected, states).await
    }

    async fn recover_from_push(
        &self,
        extraction: &ExtractionResult,
        err: WorkflowError,
        rejected: PushOutcome,
        states: &mut Vec<WorkflowState>,
    ) -> Result<StepOutcome, Failure> {
        let classified = self.classify(&err, "push");
        error!(code = %classified.code(), "git push failed: {err}");
        self.presenter.notify(Notice::error(format!(
            "Git push failed: {}",
            err.to_raw().message
        )));

        let accepted = self
            .presenter
            .offer_download_fallback(&classified)
            .await
            .map_err(Failure::at("fallback"))?;

        if accepted {
            info!("falling back to local download");
            self.enter(states, WorkflowState::Downloading);
            let mut step = self.download(extraction).await;
            step.git_result = Some(rejected);
            return Ok(step);
        }

        let mut step = StepOutcome::new(ExportChoice::GitPush, false);
        step.git_result = Some(rejected);
        step.error = Some(classified);
        Ok(step)
    }

    async fn download(&self, extraction: &ExtractionResult) -> StepOutcome {
        match self.exporter.download(extraction).await {
            Ok(outcome) => {
                let message = match &outcome.location {
                    Some(location) => format!("Tokens saved to {}", location.display()),
                    None => "Download started".to_string(),
                };
                info!(bytes = outcome.bytes, "{message}");
                self.presenter.notify(Notice::success(message));
                let mut step = StepOutcome::new(ExportChoice::Download, true);
                step.download_result = Some(outcome);
                step
            }
            Err(err) => {
                let classified = self.classify(&err, "download");
                error!(code = %classified.code(), "download failed: {err}");
                self.presenter.notify(Notice::error(format!(
                    "Download failed: {}",
                    err.to_raw().message
                )));
                let mut step = StepOutcome::new(ExportChoice::Download, false);
                step.error = Some(classified);
                step
            }
        }
    }

    fn classify(&self, err: &WorkflowError, step: &str) -> ClassifiedError {
        let classified = self.classifier.classify(&err.to_raw(), Some(step));
        self.sink.record(
            TrailLevel::Error,
            &format!("{step} failed"),
            Some(json!({
                "code": classified.code(),
                "message": classified.original_message(),
                "status": classified.status(),
            })),
        );
        classified
    }

    fn enter(&self, states: &mut Vec<WorkflowState>, state: WorkflowState) {
        if let Some(previous) = states.last() {
            debug_assert!(
                previous.can_transition_to(state),
                "illegal transition {previous} -> {state}"
            );
        }
        debug!(state = %state, "workflow state");
        self.sink.info(&format!("state: {state}"));
        self.presenter.state_changed(state);
        states.push(state);
    }
}

/// Time from the source's `extracted_at` stamp to completion when the source
/// stamped it during this call; otherwise the measured wall time of the call.
fn extraction_duration_ms(
    extracted_at: DateTime<Utc>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    elapsed: Duration,
) -> u64 {
    if extracted_at >= started_at && extracted_at <= finished_at {
        (finished_at - extracted_at).num_milliseconds().max(0) as u64
    } else {
        elapsed.as_millis() as u64
    }
}
