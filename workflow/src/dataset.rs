//! JSON document written by both the push and the download paths.

use crate::error::Result;
use crate::types::ExtractionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    pub name: String,
    pub id: String,
    pub total_nodes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCounts {
    pub total_tokens: usize,
    pub total_variables: usize,
    pub total_collections: usize,
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    pub export_timestamp: DateTime<Utc>,
    /// Milliseconds spent extracting
    pub extraction_duration: u64,
    pub source_document: SourceDocument,
    pub token_counts: TokenCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDataset {
    pub metadata: DatasetMetadata,
    pub variables: Vec<Value>,
    pub collections: Vec<Value>,
    pub design_tokens: Vec<Value>,
}

impl TokenDataset {
    pub fn from_extraction(result: &ExtractionResult) -> Self {
        Self::at(result, Utc::now())
    }

    /// Build the dataset stamped with a fixed export time
    pub fn at(result: &ExtractionResult, exported_at: DateTime<Utc>) -> Self {
        Self {
            metadata: DatasetMetadata {
                export_timestamp: exported_at,
                extraction_duration: result.metadata.duration_ms,
                source_document: SourceDocument {
                    name: result.document.name.clone(),
                    id: result.document.id.clone(),
                    total_nodes: result.document.total_nodes,
                },
                token_counts: TokenCounts {
                    total_tokens: result.tokens.len(),
                    total_variables: result.variables.len(),
                    total_collections: result.collections.len(),
                    errors: result.metadata.errors.len(),
                    warnings: result.metadata.warnings.len(),
                },
            },
            variables: result.variables.clone(),
            collections: result.collections.clone(),
            design_tokens: result.tokens.clone(),
        }
    }

    /// Pretty-printed JSON with a trailing newline
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// Local file name for a download made at `at`
pub fn download_file_name(at: DateTime<Utc>) -> String {
    format!("design-tokens-{}.json", at.format("%Y-%m-%d-%H-%M-%S"))
}
