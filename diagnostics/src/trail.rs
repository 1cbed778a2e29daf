//! In-memory record of what happened during a run, exportable as a report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Mutex;

/// Importance of a trail entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailLevel {
    Info,
    Warn,
    Error,
}

impl TrailLevel {
    fn marker(&self) -> &'static str {
        match self {
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailEntry {
    pub timestamp: DateTime<Utc>,
    pub level: TrailLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl fmt::Display for TrailEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level.marker(),
            self.message
        )?;
        if let Some(data) = &self.data {
            write!(f, " {data}")?;
        }
        Ok(())
    }
}

/// Observer for workflow and error handling events.
///
/// Injected wherever events are produced so tests and hosts can choose
/// whether anything is kept.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, level: TrailLevel, message: &str, data: Option<Value>);

    fn info(&self, message: &str) {
        self.record(TrailLevel::Info, message, None);
    }

    fn warn(&self, message: &str) {
        self.record(TrailLevel::Warn, message, None);
    }

    fn error(&self, message: &str) {
        self.record(TrailLevel::Error, message, None);
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl DiagnosticSink for SilentSink {
    fn record(&self, _level: TrailLevel, _message: &str, _data: Option<Value>) {}
}

const SEPARATOR_WIDTH: usize = 80;

/// Thread-safe, bounded trail of diagnostic entries
#[derive(Debug)]
pub struct DiagnosticTrail {
    entries: Mutex<Vec<TrailEntry>>,
    capacity: usize,
}

impl DiagnosticTrail {
    pub const DEFAULT_CAPACITY: usize = 1000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Keep at most `capacity` entries; the oldest are dropped first
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn entries(&self) -> Vec<TrailEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Render the trail as a plain text report
    pub fn export_report(&self) -> String {
        let rule = "=".repeat(SEPARATOR_WIDTH);
        let mut lines = vec![
            rule.clone(),
            "TOKEN LAUNCH DIAGNOSTIC REPORT".to_string(),
            format!("Generated: {}", Utc::now().to_rfc3339()),
            rule.clone(),
            String::new(),
        ];
        lines.extend(self.lock().iter().map(|e| e.to_string()));
        lines.push(String::new());
        lines.push(rule);
        lines.push("END OF REPORT".to_string());
        lines.join("\n")
    }

    // A poisoned lock only means another thread panicked mid-push; the
    // entries are still usable.
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TrailEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DiagnosticTrail {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for DiagnosticTrail {
    fn record(&self, level: TrailLevel, message: &str, data: Option<Value>) {
        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            entries.remove(0);
        }
        entries.push(TrailEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
            data,
        });
    }
}
