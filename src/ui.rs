use colored::Colorize;
use std::io::{self, Write};
use workflow::{Notice, NoticeLevel};

/// Print a status message with a spinner-like indicator
pub fn status_message(message: &str) {
    println!("{} {} ... ", "⏳".yellow(), message.bright_white());
    let _ = io::stdout().flush();
}

/// Print a success message
pub fn success_message(message: &str) {
    println!("{} {}", "✅".green(), message.green());
}

/// Print a warning message
pub fn warning_message(message: &str) {
    println!("{} {}", "⚠️ ".yellow(), message.yellow());
}

/// Print an error message
pub fn error_message(message: &str) {
    eprintln!("{} {}", "❌".red(), message.red().bold());
}

/// Print a section header to separate logical sections of output
pub fn section_header(title: &str) {
    println!("\n{}", format!("==== {} ====", title).cyan().bold());
}

/// Print a simple informational message
pub fn info_message(message: &str) {
    println!("{} {}", "ℹ️ ".blue(), message.blue());
}

/// Print a step in a numbered list of steps
pub fn step_message(step_number: usize, message: &str) {
    println!("  {}. {}", format!("{}", step_number).cyan(), message);
}

/// Print an aligned `label: value` line
pub fn field(label: &str, value: &str) {
    println!("  {:<14} {}", format!("{label}:").dimmed(), value);
}

/// Print a help link
pub fn link_message(url: &str) {
    println!("{} {}", "🔗".blue(), url.underline().blue());
}

/// Print a workflow notice with the helper matching its level
pub fn notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => info_message(&notice.message),
        NoticeLevel::Success => success_message(&notice.message),
        NoticeLevel::Warning => warning_message(&notice.message),
        NoticeLevel::Error => error_message(&notice.message),
    }
}
