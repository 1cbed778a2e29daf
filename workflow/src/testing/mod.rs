//! Scripted collaborators for exercising the workflow without a terminal or network

pub mod mocks;

pub use mocks::{MockExporter, MockPublisher, MockSource, RecordingFeedback, ScriptedPresenter};
