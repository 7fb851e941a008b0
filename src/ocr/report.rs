//! Plain-text report rendering.

use super::assemble::{Row, ScanOutcome};

/// Formats one row as `<identifier> | <time A> | <time B>`.
pub fn format_row(row: &Row) -> String {
    format!("{} | {} | {}", row.identifier, row.time_a, row.time_b)
}

/// Renders the full report: one line per row, a blank separator line, then
/// the diagnostics joined with `" | "`.
///
/// With zero rows the report is just the blank separator and the
/// diagnostics line, so the shape stays parseable.
pub fn render_report(outcome: &ScanOutcome) -> String {
    let rows = outcome
        .rows
        .iter()
        .map(format_row)
        .collect::<Vec<_>>()
        .join("\n");
    let diagnostics = outcome.diagnostics.summary().join(" | ");

    format!("{}\n\n{}", rows, diagnostics)
}
