use crate::error::Result;
use crate::types::{
    ConnectivityStatus, DownloadOutcome, ExportChoice, ExtractionResult, ExtractionSummary,
    Notice, PushOutcome, WorkflowState,
};
use diagnostics::ClassifiedError;
use std::future::Future;

/// Produces the tokens of the current document
pub trait TokenSource: Send + Sync {
    fn extract(&self) -> impl Future<Output = Result<ExtractionResult>> + Send;
}

/// Progress sink handed to a publisher for the duration of one push
pub trait PushFeedback: Send + Sync {
    fn progress(&self, message: &str);
    fn finished(&self, message: &str);
    fn failed(&self, message: &str);
}

/// Remote repository the tokens can be pushed to
pub trait TokenPublisher: Send + Sync {
    /// Prepare credentials and clients. Failure leaves push unavailable
    /// but does not stop the workflow.
    fn initialize(&self) -> impl Future<Output = Result<()>> + Send;

    /// Probe whether a push could succeed. Never fails; problems are
    /// reported inside the status.
    fn check_connectivity(&self) -> impl Future<Output = ConnectivityStatus> + Send;

    fn push(
        &self,
        result: &ExtractionResult,
        feedback: &dyn PushFeedback,
    ) -> impl Future<Output = Result<PushOutcome>> + Send;
}

/// Saves the tokens on the user's machine
pub trait LocalExporter: Send + Sync {
    fn download(&self, result: &ExtractionResult) -> impl Future<Output = Result<DownloadOutcome>> + Send;
}

/// User-facing side of the workflow
pub trait WorkflowPresenter: Send + Sync {
    /// Ask where the tokens should go. Suspends until the user answers.
    fn present_choice(
        &self,
        summary: &ExtractionSummary,
        connectivity: &ConnectivityStatus,
    ) -> impl Future<Output = Result<ExportChoice>> + Send;

    /// Ask whether to download locally after a failed push
    fn offer_download_fallback(
        &self,
        error: &ClassifiedError,
    ) -> impl Future<Output = Result<bool>> + Send;

    fn notify(&self, notice: Notice);

    fn state_changed(&self, _state: WorkflowState) {}

    fn push_feedback(&self) -> &dyn PushFeedback;
}

/// Feedback sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl PushFeedback for NoFeedback {
    fn progress(&self, _message: &str) {}
    fn finished(&self, _message: &str) {}
    fn failed(&self, _message: &str) {}
}
