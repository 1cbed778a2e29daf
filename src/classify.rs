use crate::error::Result;
use crate::ui;
use diagnostics::{CascadeClassifier, ClassifiedError, ErrorClassifier, Match, RawError};

pub fn execute(
    message: String,
    status: Option<u16>,
    context: Option<String>,
    json: bool,
) -> Result<()> {
    let (matched, classified) = classify_message(message, status, context.as_deref());

    if json {
        println!("{}", serde_json::to_string_pretty(&classified)?);
        return Ok(());
    }

    ui::section_header(&format!("{} ({})", classified.title(), classified.code()));
    ui::field("Rule", &matched.describe());
    ui::field("Message", classified.user_message());
    ui::field("Technical", classified.technical_message());
    ui::field("Retryable", if classified.retryable() { "yes" } else { "no" });
    ui::info_message(&format!(
        "Run `token-launch explain {}` for remediation steps",
        classified.code()
    ));
    Ok(())
}

fn classify_message(
    message: String,
    status: Option<u16>,
    context: Option<&str>,
) -> (Match, ClassifiedError) {
    let mut raw = RawError::new(message);
    if let Some(status) = status {
        raw = raw.with_status(status);
    }
    let classifier = CascadeClassifier::new();
    (classifier.matched_rule(&raw), classifier.classify(&raw, context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagnostics::ErrorCode;

    #[test]
    fn test_rule_path_is_reported() {
        let (matched, classified) =
            classify_message("Resource not accessible: protected branch".into(), Some(403), None);
        assert_eq!(classified.code(), ErrorCode::AuthzBranchProtected);
        assert!(matched.path.len() >= 2, "{}", matched.describe());
    }

    #[test]
    fn test_unmatched_message_is_unknown() {
        let (matched, classified) = classify_message("something odd".into(), None, Some("export"));
        assert_eq!(classified.code(), ErrorCode::UnknownError);
        assert_eq!(matched.describe(), "default");
        assert!(classified.technical_message().contains("export"));
    }
}
