use std::fmt::Write;

use comfy_table::Cell;

use crate::report::AuditReport;

use super::styling::{emphasis, findings, heading, highlight, label, subject, success};
use super::tables::{create_table, header_cells, version_cell};

/// Prints a human-readable summary of the audit to stdout.
///
/// Shows an overview of what was scanned followed by one table row per step
/// that runs a deprecated task version.
pub fn print_summary(report: &AuditReport) {
    println!("{}", render_summary(report));
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", emphasis(emoji), heading(title));
}

fn render_summary(report: &AuditReport) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "📊", "Overview");

    let usages = report.total_usages();

    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        label("Organization:"),
        subject(&report.organization),
        label("Projects scanned:"),
        highlight(report.stats.projects),
        label("Definitions scanned:"),
        highlight(report.stats.definitions),
        label("Catalog tasks:"),
        highlight(report.stats.catalog_entries),
        label("Deprecated versions:"),
        highlight(report.stats.deprecated_versions),
        label("Deprecated usages:"),
        findings(usages, usages),
    );

    add_section_header(&mut output, "⚠️", "Deprecated Task Usage");

    if report.entries.is_empty() {
        let _ = writeln!(
            output,
            "  {}",
            success("No pipelines use deprecated task versions")
        );
        return output;
    }

    let mut table = create_table();
    table.set_header(header_cells(&["Project", "Pipeline", "Task", "Version Used"]));

    for entry in &report.entries {
        for usage in &entry.deprecated_tasks {
            table.add_row(vec![
                Cell::new(&entry.project),
                Cell::new(&usage.pipeline_name),
                Cell::new(&usage.task_name),
                version_cell(&usage.version_used),
            ]);
        }
    }

    let _ = writeln!(output, "{table}");
    output
}
