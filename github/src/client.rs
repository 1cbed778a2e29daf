//! Minimal client for the GitHub REST v3 repository and contents endpoints.

use crate::error::{GithubError, Result};
use crate::repository::Repository;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("token-launch/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepositoryPermissions {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub pull: bool,
}

/// Fields of `GET /repos/{owner}/{repo}` the publisher needs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryInfo {
    pub full_name: String,
    pub default_branch: String,
    #[serde(default)]
    pub private: bool,
    /// Only present for authenticated requests
    pub permissions: Option<RepositoryPermissions>,
}

impl RepositoryInfo {
    /// Whether the token may write. Missing permissions are treated as writable.
    pub fn can_push(&self) -> bool {
        self.permissions.as_ref().map_or(true, |p| p.push || p.admin)
    }
}

/// An existing file from `GET /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentFile {
    pub path: String,
    pub sha: String,
    pub size: u64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl ContentFile {
    /// Decode the base64 body GitHub returns (wrapped at 60 columns)
    pub fn decoded(&self) -> Result<Vec<u8>> {
        let compact: String = self
            .content
            .as_deref()
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        Ok(STANDARD.decode(compact)?)
    }
}

#[derive(Debug, Serialize)]
struct PutContentRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PutContentResponse {
    pub content: ContentFile,
    pub commit: CommitInfo,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Authenticated GitHub API client
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_url: String,
    token: String,
}

impl GithubClient {
    pub fn new<S: Into<String>>(api_url: &str, token: S, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub async fn get_repository(&self, repo: &Repository) -> Result<RepositoryInfo> {
        let url = format!("{}/repos/{}/{}", self.api_url, repo.owner, repo.name);
        debug!(url = %url, "GET repository");

        let response = self.authorized(self.http.get(&url)).send().await?;
        let response = check(response, "repository lookup").await?;
        Ok(response.json().await?)
    }

    /// Fetch a file, or `None` when it does not exist on `branch` yet
    pub async fn get_file(
        &self,
        repo: &Repository,
        path: &str,
        branch: &str,
    ) -> Result<Option<ContentFile>> {
        let url = self.contents_url(repo, path);
        debug!(url = %url, branch, "GET contents");

        let response = self
            .authorized(self.http.get(&url))
            .query(&[("ref", branch)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            let message = error_message(response).await;
            // A missing branch is reported as a 404 too
            if message.to_lowercase().contains("no commit found") {
                return Err(GithubError::api("file lookup", 404, message));
            }
            return Ok(None);
        }

        let response = check(response, "file lookup").await?;
        Ok(Some(response.json().await?))
    }

    /// Create or update a file; `sha` must be the current blob sha when updating
    pub async fn put_file(
        &self,
        repo: &Repository,
        path: &str,
        branch: &str,
        content: &[u8],
        message: &str,
        sha: Option<&str>,
    ) -> Result<PutContentResponse> {
        let url = self.contents_url(repo, path);
        debug!(url = %url, branch, bytes = content.len(), update = sha.is_some(), "PUT contents");

        let body = PutContentRequest {
            message,
            content: STANDARD.encode(content),
            branch,
            sha,
        };
        let response = self.authorized(self.http.put(&url)).json(&body).send().await?;
        let response = check(response, "repository push").await?;
        Ok(response.json().await?)
    }

    fn contents_url(&self, repo: &Repository, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            repo.owner,
            repo.name,
            encoded.join("/")
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

async fn check(response: Response, operation: &'static str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = error_message(response).await;
    Err(GithubError::api(operation, status.as_u16(), message))
}

/// GitHub's `message` field, or the status reason when the body has none
async fn error_message(response: Response) -> String {
    let status = response.status();
    let fallback = status.canonical_reason().unwrap_or("request failed").to_string();
    match response.text().await {
        Ok(body) => serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(fallback),
        Err(_) => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo() -> Repository {
        Repository::new("acme", "tokens")
    }

    async fn client(server: &MockServer) -> GithubClient {
        GithubClient::new(&server.uri(), "ghp_test", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_repository_sends_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/tokens"))
            .and(header("authorization", "Bearer ghp_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "full_name": "acme/tokens",
                "default_branch": "main",
                "private": true,
                "permissions": {"admin": false, "push": true, "pull": true}
            })))
            .mount(&server)
            .await;

        let info = client(&server).await.get_repository(&repo()).await.unwrap();
        assert_eq!(info.full_name, "acme/tokens");
        assert!(info.can_push());
    }

    #[tokio::test]
    async fn test_api_errors_keep_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/tokens"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
            )
            .mount(&server)
            .await;

        let err = client(&server).await.get_repository(&repo()).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "repository lookup failed: Bad credentials");
    }

    #[tokio::test]
    async fn test_get_file_missing_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/tokens/contents/design-tokens/raw/figma-export.json"))
            .and(query_param("ref", "main"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .mount(&server)
            .await;

        let file = client(&server)
            .await
            .get_file(&repo(), "design-tokens/raw/figma-export.json", "main")
            .await
            .unwrap();
        assert!(file.is_none());
    }

    #[tokio::test]
    async fn test_get_file_missing_branch_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/tokens/contents/tokens.json"))
            .respond_with(ResponseTemplate::new(404).set_body_json(
                json!({"message": "No commit found for the ref feature/tokens"}),
            ))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .get_file(&repo(), "tokens.json", "feature/tokens")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_get_file_decodes_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/tokens/contents/tokens.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "path": "tokens.json",
                "sha": "3d21ec53",
                "size": 2,
                "content": "e30=\n"
            })))
            .mount(&server)
            .await;

        let file = client(&server)
            .await
            .get_file(&repo(), "tokens.json", "main")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file.sha, "3d21ec53");
        assert_eq!(file.decoded().unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_put_file_encodes_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/repos/acme/tokens/contents/tokens.json"))
            .and(body_partial_json(json!({
                "message": "update",
                "content": "e30=",
                "branch": "main",
                "sha": "3d21ec53"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": {"path": "tokens.json", "sha": "9f1c", "size": 2,
                            "html_url": "https://github.com/acme/tokens/blob/main/tokens.json"},
                "commit": {"sha": "c0ffee", "html_url": "https://github.com/acme/tokens/commit/c0ffee"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let put = client(&server)
            .await
            .put_file(&repo(), "tokens.json", "main", b"{}", "update", Some("3d21ec53"))
            .await
            .unwrap();
        assert_eq!(put.commit.sha, "c0ffee");
        assert_eq!(put.content.sha, "9f1c");
    }

    #[tokio::test]
    async fn test_put_into_missing_repository_names_the_repository() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/repos/acme/tokens/contents/tokens.json"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .put_file(&repo(), "tokens.json", "main", b"{}", "update", None)
            .await
            .unwrap_err();
        let raw = workflow::WorkflowError::from(err).to_raw();
        assert_eq!(raw.message, "repository push failed: Not Found");
        assert_eq!(
            diagnostics::classify(&raw, Some("push")).code(),
            diagnostics::ErrorCode::RepoNotFound
        );
    }

    #[tokio::test]
    async fn test_rejected_put_is_a_push_failure() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"message": "is at 3d21ec53 but expected 9f1c"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .put_file(&repo(), "tokens.json", "main", b"{}", "update", Some("9f1c"))
            .await
            .unwrap_err();
        let raw = workflow::WorkflowError::from(err).to_raw();
        assert_eq!(
            diagnostics::classify(&raw, Some("push")).code(),
            diagnostics::ErrorCode::GitPushFailed
        );
    }
}
