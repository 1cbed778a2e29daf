//! Fixtures shared by the integration tests

use github::{GithubConfig, GithubPublisher};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workflow::{DocumentInfo, ExtractionResult};

pub const REPOSITORY: &str = "acme/design-tokens";
pub const TOKEN_PATH: &str = "tokens/figma.json";

/// A small but complete extraction
pub fn sample_extraction() -> ExtractionResult {
    ExtractionResult {
        document: DocumentInfo {
            name: "Brand Kit".to_string(),
            id: "12:0".to_string(),
            page_count: 2,
            total_nodes: 140,
            paint_styles: 2,
            ..Default::default()
        },
        tokens: vec![
            json!({"name": "color/primary", "type": "color", "value": "#0d99ff"}),
            json!({"name": "color/danger", "type": "color", "value": "#f24822"}),
        ],
        variables: vec![json!({"name": "spacing/md", "resolvedType": "FLOAT", "value": 8})],
        collections: vec![json!({"name": "Primitives", "modes": ["Light", "Dark"]})],
        ..Default::default()
    }
}

/// Publisher pointed at the mock server with a fixed token
pub fn github_publisher(server: &MockServer) -> GithubPublisher {
    let config = GithubConfig::new(REPOSITORY)
        .with_api_url(server.uri())
        .with_path(TOKEN_PATH);
    GithubPublisher::new(config)
        .expect("valid test configuration")
        .with_token("ghp_integration")
}

/// Answer the repository lookup with the given push permission
pub async fn mount_repository(server: &MockServer, can_push: bool) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{REPOSITORY}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "full_name": REPOSITORY,
            "default_branch": "main",
            "private": true,
            "permissions": {"admin": false, "push": can_push, "pull": true}
        })))
        .mount(server)
        .await;
}

/// The token file does not exist yet
pub async fn mount_missing_file(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{REPOSITORY}/contents/{TOKEN_PATH}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(server)
        .await;
}

/// The contents API answers a push with `status` and `body`
pub async fn mount_put(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("PUT"))
        .and(path(format!("/repos/{REPOSITORY}/contents/{TOKEN_PATH}")))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}
