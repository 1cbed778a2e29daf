use crate::ui;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use workflow::PushFeedback;

/// A simple progress tracker for CLI operations
pub struct ProgressTracker {
    operation_name: String,
    start_time: Instant,
    steps: Vec<String>,
    current_step: usize,
}

impl ProgressTracker {
    /// Create a new progress tracker with the given operation name
    pub fn new(operation_name: &str) -> Self {
        ui::section_header(operation_name);
        Self {
            operation_name: operation_name.to_string(),
            start_time: Instant::now(),
            steps: Vec::new(),
            current_step: 0,
        }
    }

    /// Add steps to the tracker
    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }

    /// Start the next step
    pub fn start_step(&self) -> &str {
        if self.current_step < self.steps.len() {
            let step = &self.steps[self.current_step];
            ui::status_message(step);
            step
        } else {
            ""
        }
    }

    /// Complete the current step
    pub fn complete_step(&mut self) {
        if self.current_step < self.steps.len() {
            ui::success_message(&self.steps[self.current_step]);
            self.current_step += 1;
        }
    }

    /// Skip the current step
    pub fn skip_step(&mut self, reason: &str) {
        if self.current_step < self.steps.len() {
            ui::warning_message(&format!(
                "Skipped: {} ({})",
                self.steps[self.current_step], reason
            ));
            self.current_step += 1;
        }
    }

    /// Mark the current step as failed and move on
    pub fn fail_step(&mut self, reason: &str) {
        if self.current_step < self.steps.len() {
            ui::error_message(&format!("{}: {}", self.steps[self.current_step], reason));
            self.current_step += 1;
        }
    }

    /// Complete the operation
    pub fn complete(&self) {
        ui::success_message(&format!(
            "{} completed in {}",
            self.operation_name,
            format_duration(self.start_time.elapsed())
        ));
    }
}

/// Format a duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    let seconds = duration.as_secs();
    if seconds == 0 {
        format!("{millis} ms")
    } else if seconds < 60 {
        format!("{seconds} seconds")
    } else if seconds < 3600 {
        format!(
            "{} minutes {seconds_remainder} seconds",
            seconds / 60,
            seconds_remainder = seconds % 60
        )
    } else {
        format!(
            "{hours} hours {minutes} minutes",
            hours = seconds / 3600,
            minutes = (seconds % 3600) / 60
        )
    }
}

/// Spinner shown while a push is in flight
#[derive(Default)]
pub struct SpinnerFeedback {
    spinner: Mutex<Option<ProgressBar>>,
}

impl SpinnerFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    fn create_spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    fn take(&self) -> Option<ProgressBar> {
        match self.spinner.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

impl PushFeedback for SpinnerFeedback {
    fn progress(&self, message: &str) {
        let mut guard = match self.spinner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.as_ref() {
            Some(pb) => pb.set_message(message.to_string()),
            None => *guard = Some(Self::create_spinner(message)),
        }
    }

    fn finished(&self, message: &str) {
        if let Some(pb) = self.take() {
            pb.finish_and_clear();
        }
        ui::success_message(message);
    }

    fn failed(&self, message: &str) {
        if let Some(pb) = self.take() {
            pb.finish_and_clear();
        }
        ui::error_message(message);
    }
}
