use chrono::Utc;
use std::path::PathBuf;
use tracing::info;
use workflow::{
    download_file_name, DownloadOutcome, ExtractionResult, LocalExporter, TokenDataset,
    WorkflowError,
};

/// Writes the token dataset to a timestamped file in `output_dir`
#[derive(Debug, Clone)]
pub struct FileExporter {
    output_dir: PathBuf,
}

impl FileExporter {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl LocalExporter for FileExporter {
    async fn download(&self, result: &ExtractionResult) -> workflow::Result<DownloadOutcome> {
        let now = Utc::now();
        let json = TokenDataset::at(result, now).to_json_pretty()?;
        let path = self.output_dir.join(download_file_name(now));

        tokio::fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            WorkflowError::download(format!(
                "cannot create {}: {e}",
                self.output_dir.display()
            ))
        })?;
        tokio::fs::write(&path, json.as_bytes())
            .await
            .map_err(|e| WorkflowError::download(format!("cannot write {}: {e}", path.display())))?;

        info!(path = %path.display(), bytes = json.len(), "saved design tokens");
        Ok(DownloadOutcome {
            initiated: true,
            location: Some(path),
            bytes: json.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_download_writes_dataset() {
        let dir = TempDir::new().unwrap();
        let exporter = FileExporter::new(dir.path().join("exports"));
        let result = ExtractionResult {
            tokens: vec![json!({"name": "spacing/sm", "value": 4})],
            ..Default::default()
        };

        let outcome = exporter.download(&result).await.unwrap();
        assert!(outcome.initiated);

        let path = outcome.location.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("design-tokens-") && name.ends_with(".json"));

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["metadata"]["tokenCounts"]["totalTokens"], 1);
        assert_eq!(written["designTokens"][0]["name"], "spacing/sm");
        assert_eq!(outcome.bytes, std::fs::metadata(&path).unwrap().len());
    }
}
