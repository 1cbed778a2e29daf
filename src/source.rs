use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;
use workflow::{ExtractionResult, ResultExt, TokenSource, WorkflowError};

/// Reads an extraction written by the design tool plugin
#[derive(Debug, Clone)]
pub struct FileTokenSource {
    path: PathBuf,
}

impl FileTokenSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl TokenSource for FileTokenSource {
    async fn extract(&self) -> workflow::Result<ExtractionResult> {
        let started = Instant::now();
        // Paths go in the context, which classification ignores
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| WorkflowError::extraction(format!("could not read the document export: {e}")))
            .with_context(|| format!("reading {}", self.path.display()))?;

        let mut result: ExtractionResult = serde_json::from_str(&content)
            .map_err(|e| WorkflowError::extraction(format!("could not parse the document export: {e}")))
            .with_context(|| format!("reading {}", self.path.display()))?;

        if result.document.name.is_empty() {
            if let Some(stem) = self.path.file_stem() {
                result.document.name = stem.to_string_lossy().into_owned();
            }
        }
        debug!(
            path = %self.path.display(),
            items = result.total_items(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded extraction"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_extraction_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("brand.json");
        std::fs::write(
            &path,
            r##"{
                "document": {"name": "Brand Kit", "id": "0:1", "pageCount": 3},
                "tokens": [{"name": "primary", "value": "#0d99ff"}],
                "variables": [],
                "collections": [{"name": "Colors"}],
                "metadata": {"warnings": ["skipped hidden layer"]}
            }"##,
        )
        .unwrap();

        let result = FileTokenSource::new(&path).extract().await.unwrap();
        assert_eq!(result.document.name, "Brand Kit");
        assert_eq!(result.document.page_count, 3);
        assert_eq!(result.total_items(), 2);
        assert_eq!(result.metadata.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_unnamed_document_uses_file_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("marketing-site.json");
        std::fs::write(&path, "{}").unwrap();

        let result = FileTokenSource::new(&path).extract().await.unwrap();
        assert_eq!(result.document.name, "marketing-site");
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_missing_and_malformed_files_are_extraction_errors() {
        let dir = TempDir::new().unwrap();
        let missing = FileTokenSource::new(dir.path().join("absent.json"));
        assert!(matches!(
            missing.extract().await,
            Err(WorkflowError::WithContext(_, inner)) if matches!(*inner, WorkflowError::Extraction(_))
        ));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = FileTokenSource::new(&path).extract().await.unwrap_err();
        assert!(err.to_string().contains("could not parse"));
    }

    #[tokio::test]
    async fn test_file_name_does_not_steer_classification() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tokens-export.json");
        std::fs::write(&path, r#"{"tokens": 5}"#).unwrap();

        let err = FileTokenSource::new(&path).extract().await.unwrap_err();
        assert!(err.user_message().contains("tokens-export.json"));
        let classified = diagnostics::classify(&err.to_raw(), Some("extraction"));
        assert_eq!(classified.code(), diagnostics::ErrorCode::UnknownError);

        let missing = FileTokenSource::new(dir.path().join("missing-config.json"));
        let err = missing.extract().await.unwrap_err();
        assert_eq!(
            diagnostics::classify(&err.to_raw(), None).code(),
            diagnostics::ErrorCode::UnknownError
        );
    }
}
