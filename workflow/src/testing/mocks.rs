use crate::error::{Result, WorkflowError};
use crate::traits::{LocalExporter, PushFeedback, TokenPublisher, TokenSource, WorkflowPresenter};
use crate::types::{
    ConnectivityStatus, DownloadOutcome, ExportChoice, ExtractionResult, ExtractionSummary,
    FileInfo, Notice, PushOutcome, WorkflowState,
};
use diagnostics::{ClassifiedError, ErrorCode, ErrorPresenter, RecoveryAction, RecoveryScreen};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock token source for testing
pub struct MockSource {
    result: ExtractionResult,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn new(result: ExtractionResult) -> Self {
        Self {
            result,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(ExtractionResult::default())
    }

    pub fn failing<S: Into<String>>(message: S) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::empty()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenSource for MockSource {
    async fn extract(&self) -> Result<ExtractionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(WorkflowError::extraction(message.clone())),
            None => Ok(self.result.clone()),
        }
    }
}

/// Mock publisher for testing
pub struct MockPublisher {
    connectivity: ConnectivityStatus,
    init_failure: Option<String>,
    push_failure: Option<(String, Option<u16>)>,
    push_rejection: Option<String>,
    init_calls: AtomicUsize,
    push_calls: AtomicUsize,
}

impl MockPublisher {
    fn with_status(connectivity: ConnectivityStatus) -> Self {
        Self {
            connectivity,
            init_failure: None,
            push_failure: None,
            push_rejection: None,
            init_calls: AtomicUsize::new(0),
            push_calls: AtomicUsize::new(0),
        }
    }

    pub fn connected(repository: &str) -> Self {
        Self::with_status(ConnectivityStatus::connected(repository))
    }

    pub fn unreachable(repository: &str, error: &str) -> Self {
        Self::with_status(ConnectivityStatus::unreachable(Some(repository), error))
    }

    pub fn not_configured() -> Self {
        Self::with_status(ConnectivityStatus::not_configured())
    }

    pub fn with_init_failure<S: Into<String>>(mut self, message: S) -> Self {
        self.init_failure = Some(message.into());
        self
    }

    /// Make `push` return an error
    pub fn with_push_failure<S: Into<String>>(mut self, message: S, status: Option<u16>) -> Self {
        self.push_failure = Some((message.into(), status));
        self
    }

    /// Make `push` return an unsuccessful outcome instead of an error
    pub fn with_push_rejection<S: Into<String>>(mut self, message: S) -> Self {
        self.push_rejection = Some(message.into());
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn push_calls(&self) -> usize {
        self.push_calls.load(Ordering::SeqCst)
    }
}

impl TokenPublisher for MockPublisher {
    async fn initialize(&self) -> Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        match &self.init_failure {
            Some(message) => Err(WorkflowError::remote(message.clone(), None)),
            None => Ok(()),
        }
    }

    async fn check_connectivity(&self) -> ConnectivityStatus {
        self.connectivity.clone()
    }

    async fn push(
        &self,
        result: &ExtractionResult,
        feedback: &dyn PushFeedback,
    ) -> Result<PushOutcome> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        feedback.progress("Pushing tokens");

        if let Some((message, status)) = &self.push_failure {
            feedback.failed(message);
            return Err(WorkflowError::remote(message.clone(), *status));
        }
        if let Some(message) = &self.push_rejection {
            feedback.failed(message);
            return Ok(PushOutcome::rejected(message.clone()));
        }

        feedback.finished("Pushed");
        Ok(PushOutcome::pushed(FileInfo {
            path: "design-tokens/raw/figma-export.json".to_string(),
            size: (result.total_items() * 64) as u64,
            url: None,
            commit_sha: Some("abc123".to_string()),
        }))
    }
}

/// Mock local exporter for testing
pub struct MockExporter {
    failure: Option<String>,
    downloads: Mutex<Vec<usize>>,
}

impl MockExporter {
    pub fn new() -> Self {
        Self {
            failure: None,
            downloads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_failure<S: Into<String>>(mut self, message: S) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn download_calls(&self) -> usize {
        self.downloads.lock().unwrap().len()
    }

    /// Item counts of every extraction handed to `download`
    pub fn downloaded(&self) -> Vec<usize> {
        self.downloads.lock().unwrap().clone()
    }
}

impl Default for MockExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalExporter for MockExporter {
    async fn download(&self, result: &ExtractionResult) -> Result<DownloadOutcome> {
        self.downloads.lock().unwrap().push(result.total_items());
        if let Some(message) = &self.failure {
            return Err(WorkflowError::download(message.clone()));
        }
        Ok(DownloadOutcome {
            initiated: true,
            location: Some(PathBuf::from("design-tokens.json")),
            bytes: 128,
        })
    }
}

/// Push feedback that keeps every message
#[derive(Default)]
pub struct RecordingFeedback {
    messages: Mutex<Vec<String>>,
}

impl RecordingFeedback {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl PushFeedback for RecordingFeedback {
    fn progress(&self, message: &str) {
        self.messages.lock().unwrap().push(format!("progress: {message}"));
    }

    fn finished(&self, message: &str) {
        self.messages.lock().unwrap().push(format!("finished: {message}"));
    }

    fn failed(&self, message: &str) {
        self.messages.lock().unwrap().push(format!("failed: {message}"));
    }
}

/// Presenter answering every prompt from a script
pub struct ScriptedPresenter {
    choice: ExportChoice,
    accept_fallback: bool,
    recovery_action: RecoveryAction,
    feedback: RecordingFeedback,
    choices: Mutex<Vec<(ExtractionSummary, ConnectivityStatus)>>,
    fallback_offers: Mutex<Vec<ErrorCode>>,
    screens: Mutex<Vec<RecoveryScreen>>,
    notices: Mutex<Vec<Notice>>,
    states: Mutex<Vec<WorkflowState>>,
}

impl ScriptedPresenter {
    pub fn choosing(choice: ExportChoice) -> Self {
        Self {
            choice,
            accept_fallback: false,
            recovery_action: RecoveryAction::Close,
            feedback: RecordingFeedback::default(),
            choices: Mutex::new(Vec::new()),
            fallback_offers: Mutex::new(Vec::new()),
            screens: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            states: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting_fallback(mut self, accept: bool) -> Self {
        self.accept_fallback = accept;
        self
    }

    /// Action picked on any recovery screen
    pub fn with_recovery_action(mut self, action: RecoveryAction) -> Self {
        self.recovery_action = action;
        self
    }

    pub fn choices_presented(&self) -> Vec<(ExtractionSummary, ConnectivityStatus)> {
        self.choices.lock().unwrap().clone()
    }

    pub fn fallback_offers(&self) -> Vec<ErrorCode> {
        self.fallback_offers.lock().unwrap().clone()
    }

    pub fn screens(&self) -> Vec<RecoveryScreen> {
        self.screens.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn states(&self) -> Vec<WorkflowState> {
        self.states.lock().unwrap().clone()
    }

    pub fn feedback(&self) -> &RecordingFeedback {
        &self.feedback
    }
}

impl WorkflowPresenter for ScriptedPresenter {
    async fn present_choice(
        &self,
        summary: &ExtractionSummary,
        connectivity: &ConnectivityStatus,
    ) -> Result<ExportChoice> {
        self.choices
            .lock()
            .unwrap()
            .push((summary.clone(), connectivity.clone()));
        Ok(self.choice)
    }

    async fn offer_download_fallback(&self, error: &ClassifiedError) -> Result<bool> {
        self.fallback_offers.lock().unwrap().push(error.code());
        Ok(self.accept_fallback)
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    fn state_changed(&self, state: WorkflowState) {
        self.states.lock().unwrap().push(state);
    }

    fn push_feedback(&self) -> &dyn PushFeedback {
        &self.feedback
    }
}

impl ErrorPresenter for ScriptedPresenter {
    async fn present(&self, screen: &RecoveryScreen) -> diagnostics::Result<RecoveryAction> {
        self.screens.lock().unwrap().push(screen.clone());
        Ok(self.recovery_action)
    }
}
