use crate::config::AppConfig;
use crate::download::FileExporter;
use crate::error::{CliError, Result, ResultExt};
use crate::progress::format_duration;
use crate::source::FileTokenSource;
use crate::terminal::TerminalPresenter;
use crate::ui;
use diagnostics::{
    help_link, DiagnosticTrail, ErrorHandler, ErrorPresenter, HandleOptions, RecoveryAction,
    RouteContext,
};
use github::GithubPublisher;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info};
use workflow::{
    DownloadOutcome, ExportChoice, ExportWorkflow, LocalExporter, TokenPublisher, TokenSource,
    WorkflowPresenter, WorkflowResult,
};

/// Workflow runs allowed when the user keeps choosing retry
pub const MAX_ATTEMPTS: usize = 3;

pub struct ExportOptions {
    pub config: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub choice: Option<ExportChoice>,
    pub no_fallback: bool,
    pub technical_details: bool,
    pub diagnostics: Option<PathBuf>,
}

/// How a sequence of workflow runs ended
#[derive(Debug)]
pub struct RunSummary {
    /// The last run
    pub result: WorkflowResult,
    pub attempts: usize,
    /// Action picked on the recovery screen of the last run, if one was shown
    pub recovery: Option<RecoveryAction>,
    /// Download made from the recovery screen
    pub recovered_download: Option<DownloadOutcome>,
}

impl RunSummary {
    fn finished(result: WorkflowResult, attempts: usize) -> Self {
        Self {
            result,
            attempts,
            recovery: None,
            recovered_download: None,
        }
    }

    /// Whether the tokens ended up somewhere
    pub fn delivered(&self) -> bool {
        self.result.success || self.recovered_download.is_some()
    }
}

pub fn execute(options: ExportOptions) -> Result<()> {
    let runtime = Runtime::new().with_context(|| "Failed to start the async runtime")?;
    runtime.block_on(run(options))
}

async fn run(options: ExportOptions) -> Result<()> {
    let (config, config_path) = AppConfig::load_or_default(options.config.as_deref())?;
    match &config_path {
        Some(path) => debug!(path = %path.display(), "loaded configuration"),
        None => ui::info_message("No configuration file found, using defaults"),
    }

    let source_path = options.source.unwrap_or(config.source.path);
    let output_dir = options.output_dir.unwrap_or(config.export.output_dir);
    let show_details = options.technical_details || config.export.show_technical_details;

    let publisher = config.github.map(GithubPublisher::new).transpose()?;
    if publisher.is_none() {
        ui::info_message("No [github] table configured, running in local-only mode");
    }

    let trail = Arc::new(DiagnosticTrail::new());
    let presenter = TerminalPresenter::new(options.choice)
        .with_fallback(!options.no_fallback)
        .show_technical_details(show_details);
    let workflow = ExportWorkflow::new(
        FileTokenSource::new(source_path),
        publisher,
        FileExporter::new(output_dir),
        presenter,
    )
    .with_sink(trail.clone());
    let handler = ErrorHandler::new().with_sink(trail.clone());

    let outcome = drive(&workflow, &handler, MAX_ATTEMPTS, show_details).await;

    if let Some(path) = &options.diagnostics {
        std::fs::write(path, trail.export_report())
            .with_context(|| format!("Failed to write diagnostics to {}", path.display()))?;
        ui::info_message(&format!("Diagnostic report written to {}", path.display()));
    }

    let summary = outcome?;
    print_summary(&summary);

    match summary.result.error_code() {
        Some(code) if !summary.delivered() => Err(CliError::ExportFailed(code)),
        _ => Ok(()),
    }
}

/// Run the workflow, routing each failure to its recovery screen and
/// acting on the user's decision
pub async fn drive<S, P, E, U>(
    workflow: &ExportWorkflow<S, P, E, U>,
    handler: &ErrorHandler,
    max_attempts: usize,
    show_technical_details: bool,
) -> Result<RunSummary>
where
    S: TokenSource,
    P: TokenPublisher,
    E: LocalExporter,
    U: WorkflowPresenter + ErrorPresenter,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        let result = workflow.run_workflow().await;

        let error = match &result.error {
            Some(error) if !result.success => error.clone(),
            _ => return Ok(RunSummary::finished(result, attempts)),
        };

        let mut route = RouteContext::new().show_technical_details(show_technical_details);
        if let Some(extraction) = &result.extraction_result {
            if !extraction.document.name.is_empty() {
                route = route.with_document_name(extraction.document.name.as_str());
            }
        }
        let handled = handler
            .present(error, &HandleOptions::new().with_route(route), workflow.presenter())
            .await?;
        let action = handled.presentation.action;
        debug!(attempt = attempts, action = %action, "recovery decision");

        if action == RecoveryAction::Retry && attempts < max_attempts {
            ui::info_message(&format!("Retrying (attempt {} of {max_attempts})", attempts + 1));
            continue;
        }

        let mut summary = RunSummary::finished(result, attempts);
        summary.recovery = Some(action);

        if action.wants_download() {
            match &summary.result.extraction_result {
                Some(extraction) => {
                    let download = workflow.exporter().download(extraction).await?;
                    info!(location = ?download.location, "recovered with a local download");
                    summary.recovered_download = Some(download);
                }
                None => ui::warning_message("Nothing was extracted, so there is nothing to save"),
            }
        } else if action == RecoveryAction::LearnMore {
            ui::link_message(help_link(handled.classified.code()));
        }
        return Ok(summary);
    }
}

fn print_summary(summary: &RunSummary) {
    let result = &summary.result;
    ui::section_header("Export result");
    ui::field("Choice", result.choice.as_str());
    ui::field(
        "Duration",
        &format_duration(Duration::from_millis(result.duration_ms)),
    );
    if summary.attempts > 1 {
        ui::field("Attempts", &summary.attempts.to_string());
    }

    if let Some(file) = result.git_result.as_ref().and_then(|g| g.file_info.as_ref()) {
        ui::field("Pushed", &format!("{} ({})", file.path, file.display_size()));
        if let Some(url) = &file.url {
            ui::link_message(url);
        }
    }
    let download = summary
        .recovered_download
        .as_ref()
        .or(result.download_result.as_ref());
    if let Some(location) = download.and_then(|d| d.location.as_ref()) {
        ui::field("Saved", &location.display().to_string());
    }

    if summary.delivered() {
        ui::success_message("Design tokens exported");
    } else if let Some(error) = &result.error {
        ui::error_message(&format!("{} ({})", error.title(), error.code()));
    } else {
        ui::info_message("Nothing was exported");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagnostics::ErrorCode;
    use serde_json::json;
    use workflow::testing::{MockExporter, MockPublisher, MockSource, ScriptedPresenter};
    use workflow::ExtractionResult;

    type MockWorkflow = ExportWorkflow<MockSource, MockPublisher, MockExporter, ScriptedPresenter>;

    fn extraction() -> ExtractionResult {
        ExtractionResult {
            tokens: vec![json!({"name": "primary", "value": "#0d99ff"})],
            ..Default::default()
        }
    }

    fn offline_push(action: RecoveryAction) -> MockWorkflow {
        ExportWorkflow::new(
            MockSource::new(extraction()),
            Some(
                MockPublisher::connected("acme/tokens")
                    .with_push_failure("network request failed, offline", None),
            ),
            MockExporter::new(),
            ScriptedPresenter::choosing(ExportChoice::GitPush)
                .accepting_fallback(false)
                .with_recovery_action(action),
        )
    }

    #[tokio::test]
    async fn test_success_needs_no_recovery() {
        let workflow = ExportWorkflow::new(
            MockSource::new(extraction()),
            Some(MockPublisher::connected("acme/tokens")),
            MockExporter::new(),
            ScriptedPresenter::choosing(ExportChoice::GitPush),
        );
        let summary = drive(&workflow, &ErrorHandler::new(), MAX_ATTEMPTS, false)
            .await
            .unwrap();

        assert!(summary.delivered());
        assert_eq!(summary.attempts, 1);
        assert!(summary.recovery.is_none());
        assert!(workflow.presenter().screens().is_empty());
    }

    #[tokio::test]
    async fn test_recovery_download_saves_tokens() {
        let workflow = offline_push(RecoveryAction::DownloadLocally);
        let summary = drive(&workflow, &ErrorHandler::new(), MAX_ATTEMPTS, false)
            .await
            .unwrap();

        assert!(!summary.result.success);
        assert_eq!(summary.result.error_code(), Some(ErrorCode::NetOffline));
        assert_eq!(summary.recovery, Some(RecoveryAction::DownloadLocally));
        assert!(summary.delivered());
        assert_eq!(workflow.exporter().downloaded(), vec![1]);
    }

    #[tokio::test]
    async fn test_retry_is_bounded() {
        let workflow = offline_push(RecoveryAction::Retry);
        let summary = drive(&workflow, &ErrorHandler::new(), MAX_ATTEMPTS, false)
            .await
            .unwrap();

        assert_eq!(summary.attempts, MAX_ATTEMPTS);
        assert_eq!(summary.recovery, Some(RecoveryAction::Retry));
        assert!(!summary.delivered());
        assert_eq!(workflow.publisher().unwrap().push_calls(), MAX_ATTEMPTS);
        assert_eq!(workflow.presenter().screens().len(), MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_close_leaves_export_undelivered() {
        let workflow = offline_push(RecoveryAction::Close);
        let trail = Arc::new(DiagnosticTrail::new());
        let handler = ErrorHandler::new().with_sink(trail.clone());
        let summary = drive(&workflow, &handler, MAX_ATTEMPTS, true).await.unwrap();

        assert!(!summary.delivered());
        assert_eq!(workflow.exporter().download_calls(), 0);
        assert!(trail.export_report().contains("NET_OFFLINE"));

        let screen = &workflow.presenter().screens()[0];
        assert!(screen.technical_details.is_some());
    }

    #[tokio::test]
    async fn test_cancel_is_not_a_failure() {
        let workflow = ExportWorkflow::new(
            MockSource::new(extraction()),
            None::<MockPublisher>,
            MockExporter::new(),
            ScriptedPresenter::choosing(ExportChoice::Cancel),
        );
        let summary = drive(&workflow, &ErrorHandler::new(), MAX_ATTEMPTS, false)
            .await
            .unwrap();

        assert!(!summary.delivered());
        assert!(summary.result.error.is_none());
        assert!(summary.recovery.is_none());
    }
}
