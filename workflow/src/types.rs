use chrono::{DateTime, Utc};
use diagnostics::ClassifiedError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Document the tokens were extracted from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentInfo {
    pub name: String,
    pub id: String,
    pub page_count: usize,
    pub total_nodes: usize,
    pub paint_styles: usize,
    pub text_styles: usize,
    pub effect_styles: usize,
    pub variable_collections: usize,
}

/// Bookkeeping produced alongside the extracted values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    #[serde(default = "Utc::now")]
    pub extracted_at: DateTime<Utc>,
    /// Wall time spent extracting, stamped by the workflow
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub total_nodes: usize,
    #[serde(default)]
    pub processed_nodes: usize,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl Default for ExtractionMetadata {
    fn default() -> Self {
        Self {
            extracted_at: Utc::now(),
            duration_ms: 0,
            total_nodes: 0,
            processed_nodes: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Tokens, variables and collections pulled from a document.
///
/// The individual entries are kept as opaque JSON; the workflow only counts
/// them and hands them on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    #[serde(default)]
    pub document: DocumentInfo,
    #[serde(default)]
    pub tokens: Vec<Value>,
    #[serde(default)]
    pub variables: Vec<Value>,
    #[serde(default)]
    pub collections: Vec<Value>,
    #[serde(default)]
    pub metadata: ExtractionMetadata,
}

impl ExtractionResult {
    pub fn total_items(&self) -> usize {
        self.tokens.len() + self.variables.len() + self.collections.len()
    }

    /// True when the document yielded nothing to export
    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }

    pub fn has_errors(&self) -> bool {
        !self.metadata.errors.is_empty()
    }
}

/// Counts shown to the user when asking where the tokens should go
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub document_name: String,
    pub token_count: usize,
    pub variable_count: usize,
    pub collection_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub duration_ms: u64,
}

impl ExtractionSummary {
    pub fn total_items(&self) -> usize {
        self.token_count + self.variable_count + self.collection_count
    }

    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }
}

impl From<&ExtractionResult> for ExtractionSummary {
    fn from(result: &ExtractionResult) -> Self {
        Self {
            document_name: result.document.name.clone(),
            token_count: result.tokens.len(),
            variable_count: result.variables.len(),
            collection_count: result.collections.len(),
            error_count: result.metadata.errors.len(),
            warning_count: result.metadata.warnings.len(),
            duration_ms: result.metadata.duration_ms,
        }
    }
}

/// Whether pushing is possible right now. Failures are folded in, never raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityStatus {
    pub configured: bool,
    pub connected: bool,
    pub repository: Option<String>,
    pub error: Option<String>,
}

impl ConnectivityStatus {
    pub fn not_configured() -> Self {
        Self::default()
    }

    pub fn connected<S: Into<String>>(repository: S) -> Self {
        Self {
            configured: true,
            connected: true,
            repository: Some(repository.into()),
            error: None,
        }
    }

    pub fn unreachable<S: Into<String>, E: Into<String>>(repository: Option<S>, error: E) -> Self {
        Self {
            configured: true,
            connected: false,
            repository: repository.map(Into::into),
            error: Some(error.into()),
        }
    }

    pub fn push_available(&self) -> bool {
        self.configured && self.connected
    }
}

/// The user's single selection on the choice screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportChoice {
    GitPush,
    Download,
    Cancel,
}

impl ExportChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitPush => "git-push",
            Self::Download => "download",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for ExportChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "git-push" | "push" => Ok(Self::GitPush),
            "download" => Ok(Self::Download),
            "cancel" => Ok(Self::Cancel),
            other => Err(format!(
                "unknown export choice '{other}' (expected git-push, download or cancel)"
            )),
        }
    }
}

/// Where a pushed file ended up
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: String,
    pub size: u64,
    pub url: Option<String>,
    pub commit_sha: Option<String>,
}

impl FileInfo {
    /// Size for display, e.g. `"2.4 KB"`
    pub fn display_size(&self) -> String {
        format_size(self.size)
    }
}

pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushOutcome {
    pub success: bool,
    pub error: Option<String>,
    pub file_info: Option<FileInfo>,
}

impl PushOutcome {
    pub fn pushed(file_info: FileInfo) -> Self {
        Self {
            success: true,
            error: None,
            file_info: Some(file_info),
        }
    }

    pub fn rejected<S: Into<String>>(error: S) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            file_info: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOutcome {
    pub initiated: bool,
    pub location: Option<PathBuf>,
    pub bytes: u64,
}

/// Steps of the export workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Init,
    Extracting,
    CheckingConnectivity,
    AwaitingChoice,
    Pushing,
    Downloading,
    Cancelled,
    Done,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Extracting => "extracting",
            Self::CheckingConnectivity => "checking_connectivity",
            Self::AwaitingChoice => "awaiting_choice",
            Self::Pushing => "pushing",
            Self::Downloading => "downloading",
            Self::Cancelled => "cancelled",
            Self::Done => "done",
        }
    }

    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: WorkflowState) -> bool {
        use WorkflowState::*;
        match (self, next) {
            (Init, Extracting) => true,
            (Extracting, CheckingConnectivity) => true,
            (CheckingConnectivity, AwaitingChoice) => true,
            (AwaitingChoice, Pushing | Downloading | Cancelled) => true,
            (Pushing, Downloading) => true,
            (Done, _) => false,
            // any running state may finish, on success or failure
            (_, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Short message for the user, the workflow's equivalent of a toast
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info<S: Into<String>>(message: S) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn success<S: Into<String>>(message: S) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn warning<S: Into<String>>(message: S) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Everything a single workflow run produced
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub success: bool,
    pub choice: ExportChoice,
    pub extraction_result: Option<ExtractionResult>,
    pub git_result: Option<PushOutcome>,
    pub download_result: Option<DownloadOutcome>,
    pub error: Option<ClassifiedError>,
    pub duration_ms: u64,
    /// States visited, in order
    pub transitions: Vec<WorkflowState>,
}

impl WorkflowResult {
    pub fn error_code(&self) -> Option<diagnostics::ErrorCode> {
        self.error.as_ref().map(ClassifiedError::code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_extraction() {
        let mut result = ExtractionResult::default();
        assert!(result.is_empty());

        result.collections.push(json!({"name": "Brand"}));
        assert!(!result.is_empty());
        assert_eq!(result.total_items(), 1);
    }

    #[test]
    fn test_extraction_deserializes_host_export() {
        let result: ExtractionResult = serde_json::from_value(json!({
            "document": {"name": "Brand Kit", "id": "42:1", "pageCount": 3, "totalNodes": 120},
            "tokens": [{"name": "primary", "type": "color", "value": "#0d99ff"}],
            "metadata": {"processedNodes": 118, "warnings": ["skipped hidden layer"]}
        }))
        .unwrap();

        assert_eq!(result.document.page_count, 3);
        assert_eq!(result.tokens.len(), 1);
        assert!(result.variables.is_empty());
        assert_eq!(result.metadata.processed_nodes, 118);

        let summary = ExtractionSummary::from(&result);
        assert_eq!(summary.document_name, "Brand Kit");
        assert_eq!(summary.warning_count, 1);
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_export_choice_parsing() {
        assert_eq!("git-push".parse::<ExportChoice>().unwrap(), ExportChoice::GitPush);
        assert_eq!("Download".parse::<ExportChoice>().unwrap(), ExportChoice::Download);
        assert!("upload".parse::<ExportChoice>().is_err());
        assert_eq!(serde_json::to_string(&ExportChoice::GitPush).unwrap(), "\"git-push\"");
    }

    #[test]
    fn test_connectivity_push_available() {
        assert!(!ConnectivityStatus::not_configured().push_available());
        assert!(ConnectivityStatus::connected("acme/tokens").push_available());
        assert!(!ConnectivityStatus::unreachable(Some("acme/tokens"), "offline").push_available());
    }

    #[test]
    fn test_state_transitions() {
        use WorkflowState::*;
        assert!(Init.can_transition_to(Extracting));
        assert!(AwaitingChoice.can_transition_to(Cancelled));
        assert!(Pushing.can_transition_to(Downloading));
        assert!(Extracting.can_transition_to(Done));
        assert!(!Downloading.can_transition_to(Pushing));
        assert!(!Init.can_transition_to(Pushing));
        assert!(!Done.can_transition_to(Done));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2458), "2.4 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
