//! Output rendering for column tables.

use board::{ColumnTable, Timestamp};
use serde::Serialize;

use crate::args::OutputFormat;

const CELL_GAP: &str = "  ";

/// Renders every table in the requested format.
pub fn render(
    project: &str,
    cutoff: Timestamp,
    tables: &[ColumnTable],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => Ok(render_text(project, cutoff, tables)),
        OutputFormat::Markdown => Ok(render_markdown(project, cutoff, tables)),
        OutputFormat::Json => render_json(project, cutoff, tables),
    }
}

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

fn render_text(project: &str, cutoff: Timestamp, tables: &[ColumnTable]) -> String {
    let mut sections = vec![format!("{project}\nPrevious status as of {cutoff}")];
    sections.extend(tables.iter().map(render_text_table));
    sections.join("\n\n")
}

/// Renders one table with every cell padded to its column's widest value.
fn render_text_table(table: &ColumnTable) -> String {
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| single_line(cell)).collect())
        .collect();

    let widths: Vec<usize> = table
        .headings
        .iter()
        .enumerate()
        .map(|(index, heading)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(heading.chars().count())
        })
        .collect();

    let header_line = join_cells(table.headings.iter().copied(), &widths);
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = vec![table.title.clone(), header_line, divider];
    lines.extend(
        rows.iter()
            .map(|row| join_cells(row.iter().map(String::as_str), &widths)),
    );
    lines.join("\n")
}

fn join_cells<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(CELL_GAP)
        .trim_end()
        .to_string()
}

fn single_line(cell: &str) -> String {
    cell.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Markdown
// ---------------------------------------------------------------------------

fn render_markdown(project: &str, cutoff: Timestamp, tables: &[ColumnTable]) -> String {
    let mut sections = vec![format!(
        "# {}\n\nPrevious status as of {cutoff}",
        escape_markdown(project)
    )];
    sections.extend(tables.iter().map(render_markdown_table));
    sections.join("\n\n")
}

fn render_markdown_table(table: &ColumnTable) -> String {
    let row_line = |cells: Vec<String>| format!("| {} |", cells.join(" | "));

    let mut lines = vec![
        format!("## {}", escape_markdown(&table.title)),
        String::new(),
        row_line(table.headings.iter().map(|h| h.to_string()).collect()),
        row_line(table.headings.iter().map(|_| "---".to_string()).collect()),
    ];
    lines.extend(
        table
            .rows
            .iter()
            .map(|row| row_line(row.iter().map(|cell| escape_markdown(cell)).collect())),
    );
    lines.join("\n")
}

fn escape_markdown(cell: &str) -> String {
    cell.replace('|', "\\|")
        .lines()
        .collect::<Vec<_>>()
        .join("<br>")
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct JsonReport<'a> {
    project: &'a str,
    cutoff: Timestamp,
    tables: &'a [ColumnTable],
}

fn render_json(project: &str, cutoff: Timestamp, tables: &[ColumnTable]) -> anyhow::Result<String> {
    let report = JsonReport {
        project,
        cutoff,
        tables,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
