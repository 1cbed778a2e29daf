//! Workflow - export state machine for design tokens
//!
//! Sequences extraction, a connectivity check, the user's choice and then a
//! push or a local download, falling back to download when a push fails.

// Core modules
pub mod error;
pub mod types;

pub mod dataset;
pub mod export;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use dataset::{download_file_name, TokenDataset};
pub use error::{Result, ResultExt, WorkflowError};
pub use export::ExportWorkflow;
pub use traits::{
    LocalExporter, NoFeedback, PushFeedback, TokenPublisher, TokenSource, WorkflowPresenter,
};
pub use types::{
    format_size, ConnectivityStatus, DocumentInfo, DownloadOutcome, ExportChoice,
    ExtractionMetadata, ExtractionResult, ExtractionSummary, FileInfo, Notice, NoticeLevel,
    PushOutcome, WorkflowResult, WorkflowState,
};
