//! Terminal front end for the export workflow and the recovery dialogs.

use crate::progress::SpinnerFeedback;
use crate::ui;
use colored::Colorize;
use diagnostics::{
    ClassifiedError, ErrorCode, ErrorPresenter, PresentationRouter, RecoveryAction,
    RecoveryScreen, RouteContext,
};
use dialoguer::{theme::ColorfulTheme, Confirm, Select};
use workflow::{
    ConnectivityStatus, ExportChoice, ExtractionSummary, Notice, PushFeedback, WorkflowError,
    WorkflowPresenter, WorkflowState,
};

/// Prompts with dialoguer, or answers from presets when not interactive
pub struct TerminalPresenter {
    preset: Option<ExportChoice>,
    interactive: bool,
    accept_fallback: bool,
    show_technical_details: bool,
    router: PresentationRouter,
    feedback: SpinnerFeedback,
}

impl TerminalPresenter {
    /// Prompts are shown only when no choice is preset and both stdin and
    /// stdout are terminals
    pub fn new(preset: Option<ExportChoice>) -> Self {
        let interactive =
            preset.is_none() && atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout);
        Self {
            preset,
            interactive,
            accept_fallback: true,
            show_technical_details: false,
            router: PresentationRouter::new(),
            feedback: SpinnerFeedback::new(),
        }
    }

    /// Never prompt
    #[cfg(test)]
    pub fn non_interactive(preset: Option<ExportChoice>) -> Self {
        Self {
            interactive: false,
            ..Self::new(preset)
        }
    }

    /// Answer for download offers when not interactive
    pub fn with_fallback(mut self, accept: bool) -> Self {
        self.accept_fallback = accept;
        self
    }

    pub fn show_technical_details(mut self, show: bool) -> Self {
        self.show_technical_details = show;
        self
    }

    /// Route context for recovery screens raised about `document_name`
    pub fn route_context(&self, document_name: Option<&str>) -> RouteContext {
        let context = RouteContext::new().show_technical_details(self.show_technical_details);
        match document_name.filter(|name| !name.is_empty()) {
            Some(name) => context.with_document_name(name),
            None => context,
        }
    }

    fn print_summary(summary: &ExtractionSummary, connectivity: &ConnectivityStatus) {
        ui::section_header("Extraction summary");
        ui::field("Document", &summary.document_name);
        ui::field("Tokens", &summary.token_count.to_string());
        ui::field("Variables", &summary.variable_count.to_string());
        ui::field("Collections", &summary.collection_count.to_string());
        ui::field("Duration", &format!("{} ms", summary.duration_ms));
        if summary.warning_count > 0 || summary.error_count > 0 {
            ui::field(
                "Issues",
                &format!(
                    "{} errors, {} warnings",
                    summary.error_count, summary.warning_count
                ),
            );
        }

        let github = match (&connectivity.repository, connectivity.push_available()) {
            (Some(repo), true) => format!("{} {}", repo, "(connected)".green()),
            (Some(repo), false) => format!("{} {}", repo, "(unavailable)".yellow()),
            (None, _) => "not configured".dimmed().to_string(),
        };
        ui::field("GitHub", &github);
        if let Some(error) = &connectivity.error {
            ui::field("Reason", &error.dimmed().to_string());
        }
    }

    fn prompt_choice(connectivity: &ConnectivityStatus) -> workflow::Result<ExportChoice> {
        let mut options = Vec::new();
        if connectivity.push_available() {
            let target = connectivity.repository.as_deref().unwrap_or("GitHub");
            options.push((format!("Push to {target}"), ExportChoice::GitPush));
        }
        options.push(("Download JSON file".to_string(), ExportChoice::Download));
        options.push(("Cancel".to_string(), ExportChoice::Cancel));

        let labels: Vec<&str> = options.iter().map(|(label, _)| label.as_str()).collect();
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Where should the tokens go?")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| WorkflowError::presentation(e.to_string()))?;

        Ok(options[selection].1)
    }

    fn render_screen(&self, screen: &RecoveryScreen) {
        ui::section_header(&screen.title);
        println!("{}", screen.message);
        if !screen.steps.is_empty() {
            println!();
            for (i, step) in screen.steps.iter().enumerate() {
                ui::step_message(i + 1, step);
            }
        }
        if let Some(details) = &screen.technical_details {
            println!("\n{} {}", "Details:".dimmed(), details.dimmed());
        }
        if let Some(url) = screen.help_url {
            ui::link_message(url);
        }
    }

    fn default_action(&self, screen: &RecoveryScreen) -> RecoveryAction {
        let download = [RecoveryAction::DownloadLocally, RecoveryAction::UseFallback]
            .into_iter()
            .find(|action| screen.offers(*action));
        match download {
            Some(action) if self.accept_fallback => action,
            _ => RecoveryAction::Close,
        }
    }
}

impl WorkflowPresenter for TerminalPresenter {
    async fn present_choice(
        &self,
        summary: &ExtractionSummary,
        connectivity: &ConnectivityStatus,
    ) -> workflow::Result<ExportChoice> {
        Self::print_summary(summary, connectivity);

        if summary.is_empty() {
            let context = self.route_context(Some(&summary.document_name));
            let result = self
                .router
                .route(ErrorCode::ExtractionNoTokens, &context, self)
                .await?;
            if result.action == RecoveryAction::LearnMore {
                ui::link_message(diagnostics::help_link(result.code));
            }
            return Ok(ExportChoice::Cancel);
        }

        if let Some(choice) = self.preset {
            if choice == ExportChoice::GitPush && !connectivity.push_available() {
                ui::warning_message("GitHub push looks unavailable, trying anyway");
            }
            ui::info_message(&format!("Export target: {choice}"));
            return Ok(choice);
        }

        if !self.interactive {
            return Err(WorkflowError::presentation(
                "no interactive terminal available; pass --choice",
            ));
        }
        Self::prompt_choice(connectivity)
    }

    async fn offer_download_fallback(&self, error: &ClassifiedError) -> workflow::Result<bool> {
        ui::warning_message(&format!("{}: {}", error.title(), error.user_message()));
        if !self.interactive {
            return Ok(self.accept_fallback);
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Download the tokens locally instead?")
            .default(true)
            .interact()
            .map_err(|e| WorkflowError::presentation(e.to_string()))
    }

    fn notify(&self, notice: Notice) {
        ui::notice(&notice);
    }

    fn state_changed(&self, state: WorkflowState) {
        match state {
            WorkflowState::Extracting => ui::status_message("Loading extracted tokens"),
            WorkflowState::CheckingConnectivity => ui::status_message("Checking GitHub access"),
            WorkflowState::Downloading => ui::status_message("Saving tokens locally"),
            _ => {}
        }
    }

    fn push_feedback(&self) -> &dyn PushFeedback {
        &self.feedback
    }
}

impl ErrorPresenter for TerminalPresenter {
    async fn present(&self, screen: &RecoveryScreen) -> diagnostics::Result<RecoveryAction> {
        self.render_screen(screen);
        if !self.interactive {
            return Ok(self.default_action(screen));
        }

        let labels: Vec<&str> = screen.actions.iter().map(|a| a.label()).collect();
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| diagnostics::DiagnosticsError::Presentation(e.to_string()))?;
        Ok(screen.actions[selection])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagnostics::{FlowKind, SpecializedFlow};

    fn summary(tokens: usize) -> ExtractionSummary {
        ExtractionSummary {
            document_name: "Brand Kit".to_string(),
            token_count: tokens,
            variable_count: 0,
            collection_count: 0,
            error_count: 0,
            warning_count: 0,
            duration_ms: 12,
        }
    }

    #[tokio::test]
    async fn test_preset_choice_is_returned() {
        let presenter = TerminalPresenter::non_interactive(Some(ExportChoice::Download));
        let choice = presenter
            .present_choice(&summary(3), &ConnectivityStatus::not_configured())
            .await
            .unwrap();
        assert_eq!(choice, ExportChoice::Download);
    }

    #[tokio::test]
    async fn test_empty_document_cancels() {
        let presenter = TerminalPresenter::non_interactive(Some(ExportChoice::GitPush));
        let choice = presenter
            .present_choice(&summary(0), &ConnectivityStatus::connected("acme/tokens"))
            .await
            .unwrap();
        assert_eq!(choice, ExportChoice::Cancel);
    }

    #[tokio::test]
    async fn test_without_terminal_or_preset_fails() {
        let presenter = TerminalPresenter::non_interactive(None);
        let err = presenter
            .present_choice(&summary(3), &ConnectivityStatus::not_configured())
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Presentation(_)));
    }

    #[tokio::test]
    async fn test_non_interactive_recovery_prefers_download() {
        let presenter = TerminalPresenter::non_interactive(Some(ExportChoice::GitPush));
        let offline = RecoveryScreen::for_code(ErrorCode::NetOffline, &RouteContext::new());
        assert_eq!(offline.kind, FlowKind::Specialized(SpecializedFlow::Offline));
        assert_eq!(
            presenter.present(&offline).await.unwrap(),
            RecoveryAction::DownloadLocally
        );

        let denied = RecoveryScreen::for_code(ErrorCode::AuthzRepoAccessDenied, &RouteContext::new());
        assert_eq!(
            presenter.present(&denied).await.unwrap(),
            RecoveryAction::UseFallback
        );

        let declining = TerminalPresenter::non_interactive(None).with_fallback(false);
        assert_eq!(declining.present(&offline).await.unwrap(), RecoveryAction::Close);
        assert!(!declining
            .offer_download_fallback(&diagnostics::classify(&"push failed".into(), None))
            .await
            .unwrap());
    }

    #[test]
    fn test_route_context_skips_empty_name() {
        let presenter = TerminalPresenter::non_interactive(None).show_technical_details(true);
        assert!(presenter.route_context(Some("")).document_name.is_none());
        let context = presenter.route_context(Some("Brand Kit"));
        assert_eq!(context.document_name.as_deref(), Some("Brand Kit"));
        assert!(context.show_technical_details);
    }
}
