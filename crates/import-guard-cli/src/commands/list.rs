//! List command implementation.

use anyhow::Result;
use import_guard_js::{ReportKind, RestrictionTable};

use crate::config_resolver::ConfigSource;

/// Runs the list command.
pub fn run(source: &ConfigSource) -> Result<()> {
    let config = source.load()?;
    let table = config.restriction_table();

    println!("Restricted packages:\n");
    for line in table_lines(&table) {
        println!("{line}");
    }

    println!("\nDiagnostic codes:");
    for kind in ReportKind::all() {
        println!("  {}  {}", kind.code(), kind.description());
    }

    Ok(())
}

fn table_lines(table: &RestrictionTable) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{:<24} {:<28} {:<22} Severity",
            "Original", "Alternate", "Kind"
        ),
        "-".repeat(84),
    ];
    if table.is_empty() {
        lines.push("(none configured)".to_string());
    }
    for rule in table.rules() {
        lines.push(format!(
            "{:<24} {:<28} {:<22} {}",
            rule.original(),
            rule.alternate().unwrap_or("-"),
            table.classify(rule).to_string(),
            rule.severity()
        ));
    }
    lines
}
