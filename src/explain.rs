use crate::error::Result;
use crate::ui;
use colored::Colorize;
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, Color,
    ContentArrangement, Table,
};
use diagnostics::{
    generic_actions, help_link, lookup, ErrorCode, ErrorDefinition, ErrorSeverity,
    SpecializedFlow,
};

pub fn execute(code: Option<String>) -> Result<()> {
    match code {
        Some(code) => {
            let code: ErrorCode = code.parse()?;
            explain(lookup(code));
        }
        None => println!("{}", code_table()),
    }
    Ok(())
}

fn explain(definition: &ErrorDefinition) {
    ui::section_header(&format!("{} ({})", definition.title, definition.code));
    println!("{}\n", definition.user_message);
    ui::field("Category", definition.category.as_str());
    ui::field("Severity", definition.severity.as_str());
    ui::field("Technical", definition.technical_message);
    ui::field("Retryable", yes_no(definition.retryable));
    ui::field("Fallback", yes_no(definition.fallback_available));

    let actions = match SpecializedFlow::for_code(definition.code) {
        Some(flow) => {
            ui::field("Flow", "dedicated recovery screen");
            flow.actions().to_vec()
        }
        None => generic_actions(definition.code),
    };
    let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
    ui::field("Actions", &labels.join(", "));

    if !definition.solutions.is_empty() {
        println!("\n{}", "How to fix:".bold());
        for solution in definition.solutions {
            let text = match solution.details {
                Some(details) => format!("{}: {}", solution.action, details.dimmed()),
                None => solution.action.to_string(),
            };
            ui::step_message(solution.step as usize, &text);
        }
    }
    println!();
    ui::link_message(help_link(definition.code));
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Table of every code with its category, severity and recovery flags
pub fn code_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Code").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Severity").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Retry").add_attribute(Attribute::Bold),
            Cell::new("Fallback").add_attribute(Attribute::Bold),
        ]);

    for code in ErrorCode::ALL {
        let definition = lookup(code);
        let severity = match definition.severity {
            ErrorSeverity::Critical => Cell::new(definition.severity.as_str()).fg(Color::Red),
            ErrorSeverity::High => Cell::new(definition.severity.as_str()).fg(Color::Yellow),
            _ => Cell::new(definition.severity.as_str()),
        };
        table.add_row(vec![
            Cell::new(code.as_str()),
            Cell::new(definition.category.as_str()),
            severity,
            Cell::new(definition.title),
            Cell::new(yes_no(definition.retryable)),
            Cell::new(yes_no(definition.fallback_available)),
        ]);
    }
    table
}
