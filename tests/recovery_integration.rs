//! Recovery integration tests
//!
//! Failures raised by the GitHub publisher are classified by the workflow and
//! then routed to their recovery screen by the error handler.

use diagnostics::{
    ErrorCode, ErrorHandler, FlowKind, HandleOptions, PresentationRouter, RawError, RecoveryAction,
    RouteContext, SpecializedFlow,
};
use github::{GithubConfig, GithubPublisher};
use std::time::Duration;
use token_launch_tests::{github_publisher, sample_extraction, REPOSITORY};
use wiremock::{matchers::any, Mock, MockServer, ResponseTemplate};
use workflow::testing::{MockExporter, MockSource, ScriptedPresenter};
use workflow::{ExportChoice, ExportWorkflow};

#[tokio::test]
async fn test_slow_github_is_a_retryable_timeout() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = GithubConfig {
        timeout_seconds: 1,
        ..GithubConfig::new(REPOSITORY).with_api_url(server.uri())
    };
    let publisher = GithubPublisher::new(config).unwrap().with_token("ghp_integration");
    let workflow = ExportWorkflow::new(
        MockSource::new(sample_extraction()),
        Some(publisher),
        MockExporter::new(),
        ScriptedPresenter::choosing(ExportChoice::GitPush)
            .accepting_fallback(false)
            .with_recovery_action(RecoveryAction::Retry),
    );
    let result = workflow.run_workflow().await;

    assert!(!result.success);
    let error = result.error.unwrap();
    assert_eq!(error.code(), ErrorCode::NetTimeout);

    let handled = ErrorHandler::new()
        .present(error, &HandleOptions::new(), workflow.presenter())
        .await
        .unwrap();
    assert_eq!(handled.presentation.flow, FlowKind::Generic);
    assert_eq!(handled.presentation.action, RecoveryAction::Retry);

    let screen = workflow.presenter().screens().remove(0);
    assert_eq!(
        screen.actions,
        vec![
            RecoveryAction::Retry,
            RecoveryAction::UseFallback,
            RecoveryAction::Close
        ]
    );
}

#[tokio::test]
async fn test_missing_token_offers_fallback() {
    let config = GithubConfig {
        token_env: "TOKEN_LAUNCH_INTEGRATION_UNSET".to_string(),
        ..GithubConfig::new(REPOSITORY)
    };
    let workflow = ExportWorkflow::new(
        MockSource::new(sample_extraction()),
        Some(GithubPublisher::new(config).unwrap()),
        MockExporter::new(),
        ScriptedPresenter::choosing(ExportChoice::GitPush)
            .accepting_fallback(false)
            .with_recovery_action(RecoveryAction::UseFallback),
    );
    let result = workflow.run_workflow().await;

    assert_eq!(result.error_code(), Some(ErrorCode::AuthTokenMissing));
    assert_eq!(
        workflow.presenter().fallback_offers(),
        vec![ErrorCode::AuthTokenMissing]
    );
    let (_, connectivity) = workflow.presenter().choices_presented().remove(0);
    assert!(!connectivity.configured);

    let handled = ErrorHandler::new()
        .present(
            result.error.unwrap(),
            &HandleOptions::new(),
            workflow.presenter(),
        )
        .await
        .unwrap();
    assert!(handled.presentation.action.wants_download());
}

#[tokio::test]
async fn test_rate_limit_from_github() {
    let server = MockServer::start().await;
    token_launch_tests::mount_repository(&server, true).await;
    token_launch_tests::mount_missing_file(&server).await;
    token_launch_tests::mount_put(
        &server,
        429,
        serde_json::json!({"message": "API rate limit exceeded for user ID 1."}),
    )
    .await;

    let workflow = ExportWorkflow::new(
        MockSource::new(sample_extraction()),
        Some(github_publisher(&server)),
        MockExporter::new(),
        ScriptedPresenter::choosing(ExportChoice::GitPush)
            .with_recovery_action(RecoveryAction::LearnMore),
    );
    let result = workflow.run_workflow().await;
    let error = result.error.unwrap();
    assert_eq!(error.code(), ErrorCode::RateLimitExceeded);
    assert!(error.retryable());

    let handled = ErrorHandler::new()
        .present(error, &HandleOptions::new(), workflow.presenter())
        .await
        .unwrap();
    assert_eq!(handled.presentation.action, RecoveryAction::LearnMore);
    assert!(diagnostics::help_link(handled.classified.code()).starts_with("https://"));
}

#[tokio::test]
async fn test_offline_and_empty_document_use_dedicated_screens() {
    let presenter = ScriptedPresenter::choosing(ExportChoice::Cancel)
        .with_recovery_action(RecoveryAction::Close);
    let handler = ErrorHandler::new();
    let options = HandleOptions::new()
        .with_route(RouteContext::new().with_document_name("Brand Kit"));

    let offline = handler
        .handle(
            &RawError::new("network offline: dns error"),
            &options,
            &presenter,
        )
        .await
        .unwrap();
    assert_eq!(
        offline.presentation.flow,
        FlowKind::Specialized(SpecializedFlow::Offline)
    );

    let empty = PresentationRouter::new()
        .route(ErrorCode::ExtractionNoTokens, &options.route, &presenter)
        .await
        .unwrap();
    assert_eq!(
        empty.flow,
        FlowKind::Specialized(SpecializedFlow::EmptyDocument)
    );

    let screens = presenter.screens();
    assert_eq!(screens.len(), 2);
    assert_eq!(screens[0].title, "No Internet Connection");
    assert!(screens[0].offers(RecoveryAction::DownloadLocally));
    assert!(screens[1].message.contains("\"Brand Kit\""));
    assert_eq!(
        screens[1].actions,
        vec![RecoveryAction::LearnMore, RecoveryAction::Close]
    );
}
