//! Diagnostics - error taxonomy, classification and recovery routing
//!
//! Turns raw failures from token extraction and repository pushes into a
//! fixed set of error codes with user-facing remediation, and decides which
//! recovery flow the user sees.

// Core modules
pub mod codes;
pub mod error;
pub mod taxonomy;

// Classification and presentation
pub mod classifier;
pub mod handler;
pub mod presentation;
pub mod trail;

pub use classifier::{classify, CascadeClassifier, ClassifiedError, ErrorClassifier, Match};
pub use codes::{ErrorCategory, ErrorCode, ErrorSeverity};
pub use error::{DiagnosticsError, RawError, Result};
pub use handler::{help_link, ErrorHandler, HandleOptions, HandledError};
pub use presentation::{
    generic_actions, has_specialized_flow, ErrorPresenter, FlowKind, FlowState,
    PresentationResult, PresentationRouter, RecoveryAction, RecoveryFlow, RecoveryScreen,
    RouteContext, SpecializedFlow,
};
pub use taxonomy::{lookup, ErrorDefinition, ErrorSolution};
pub use trail::{DiagnosticSink, DiagnosticTrail, SilentSink, TrailEntry, TrailLevel};
