//! Projection of a finished snapshot into per-column tables.
//!
//! Output formatting (aligned text, Markdown, JSON) belongs to the `cli`
//! crate; this module only decides *what* each cell contains.

use serde::Serialize;

use crate::status::resolve_previous_column;
use crate::{Assignee, Card, Column, Issue, ProjectSnapshot, Timestamp};

/// Prefix that marks a label as a size estimate.
pub const SIZE_LABEL_PREFIX: &str = "size:";

/// Marker appended to the assignee list when not every assignee was fetched.
pub const MORE_ASSIGNEES_MARKER: &str = "...";

/// Column headings, without the optional notes heading.
pub const HEADINGS: [&str; 5] = ["Issue ID", "Title", "Size", "Assignee(s)", "Previous status"];

/// Heading of the optional blank notes column.
pub const NOTES_HEADING: &str = "Notes";

/// The size value of the first `size:` label, or `""` when there is none.
///
/// Only the first matching label counts. The value is the text between the
/// first and any second colon, trimmed: `"size: L"` yields `"L"`.
pub fn size_label<S: AsRef<str>>(labels: &[S]) -> &str {
    labels
        .iter()
        .map(|label| label.as_ref())
        .find(|label| label.starts_with(SIZE_LABEL_PREFIX))
        .and_then(|label| label.split(':').nth(1))
        .map_or("", str::trim)
}

/// Joins assignee display names with `", "`.
///
/// When `total` exceeds the number of fetched assignees, [`MORE_ASSIGNEES_MARKER`]
/// is appended as a final entry.
pub fn join_assignee_names(assignees: &[Assignee], total: u32) -> String {
    let mut names: Vec<&str> = assignees.iter().map(Assignee::display_name).collect();
    if total as usize > assignees.len() {
        names.push(MORE_ASSIGNEES_MARKER);
    }
    names.join(", ")
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// One rendered table: a column of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnTable {
    /// `"{column name} ({total card count})"`.
    pub title: String,

    /// Cell headings; includes [`NOTES_HEADING`] when notes are enabled.
    pub headings: Vec<&'static str>,

    /// One entry per card, each the same length as `headings`.
    pub rows: Vec<Vec<String>>,
}

/// Builds one table per column of `snapshot`.
///
/// Issue rows show the reference, title, size, assignees and the column the
/// issue was in just before `cutoff`. Note rows put the note text in the title
/// cell and leave every other cell blank. When `include_notes` is set every row
/// gains a trailing blank cell for hand-written notes.
pub fn build_tables(
    snapshot: &ProjectSnapshot,
    cutoff: Timestamp,
    include_notes: bool,
) -> Vec<ColumnTable> {
    snapshot
        .columns
        .iter()
        .map(|column| build_table(column, cutoff, include_notes))
        .collect()
}

fn build_table(column: &Column, cutoff: Timestamp, include_notes: bool) -> ColumnTable {
    let mut headings = HEADINGS.to_vec();
    if include_notes {
        headings.push(NOTES_HEADING);
    }

    let rows = column
        .cards
        .iter()
        .map(|card| {
            let mut row = match card {
                Card::Issue(issue) => issue_row(issue, cutoff),
                Card::Note { text } => note_row(text),
            };
            if include_notes {
                row.push(String::new());
            }
            row
        })
        .collect();

    ColumnTable {
        title: format!("{} ({})", column.name, column.total_count),
        headings,
        rows,
    }
}

fn issue_row(issue: &Issue, cutoff: Timestamp) -> Vec<String> {
    vec![
        issue.reference(),
        issue.title.clone(),
        size_label(&issue.labels).to_string(),
        join_assignee_names(&issue.assignees, issue.assignee_count),
        resolve_previous_column(issue.timeline.as_deref(), cutoff).to_string(),
    ]
}

fn note_row(text: &str) -> Vec<String> {
    vec![
        String::new(),
        text.to_string(),
        String::new(),
        String::new(),
        String::new(),
    ]
}
