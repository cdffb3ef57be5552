//! Shared value types for the project board domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! the board content itself: the finished [`ProjectSnapshot`] and everything it
//! contains. Every type here is a plain owned value; a snapshot handed to a
//! caller is never mutated again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{IssueNumber, RepositoryName};

/// Maximum number of timeline events the service returns per issue.
///
/// Older events are dropped by the server. Status resolution works on whatever
/// survives the cap.
pub const TIMELINE_EVENT_CAP: usize = 200;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The fully merged content of one project board.
///
/// Columns appear in the display order assigned by the server. Produced only by
/// [`crate::fetch_project_snapshot`] once both pagination axes are exhausted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Name of the project as reported by the service.
    pub name: String,

    /// Board columns in display order.
    pub columns: Vec<Column>,
}

impl ProjectSnapshot {
    /// Total number of cards fetched across every column.
    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    /// Iterates over every issue-backed card in board order.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.columns
            .iter()
            .flat_map(|c| c.cards.iter())
            .filter_map(Card::as_issue)
    }
}

// ---------------------------------------------------------------------------

/// A named status bucket on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Display name of the column.
    pub name: String,

    /// Number of non-archived cards the service reports for this column.
    ///
    /// Authoritative for display, independent of how many cards were fetched.
    pub total_count: u32,

    /// Cards in server insertion order.
    pub cards: Vec<Card>,
}

// ---------------------------------------------------------------------------

/// One entry on the board.
///
/// A card either links to an issue or pull request, or it is a free-text note.
/// The service signals a note by returning no linked content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Card {
    /// Free-form text with no linked content.
    Note {
        /// The note body. Empty when the service returns no text.
        text: String,
    },
    /// A reference to an issue or pull request.
    Issue(Issue),
}

impl Card {
    /// Returns the linked issue, if this card is not a note.
    pub fn as_issue(&self) -> Option<&Issue> {
        match self {
            Card::Issue(issue) => Some(issue),
            Card::Note { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------

/// The kind of content a card links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Issue,
    PullRequest,
}

/// An issue or pull request linked from a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Whether this is an issue or a pull request.
    pub kind: IssueKind,

    /// Repository that owns the issue.
    pub repository: RepositoryName,

    /// Issue number within the repository.
    pub number: IssueNumber,

    /// Issue title.
    pub title: String,

    /// The assignees the service returned. May be fewer than `assignee_count`.
    pub assignees: Vec<Assignee>,

    /// Total number of assignees on the issue, including any not fetched.
    pub assignee_count: u32,

    /// Label names in the order the service returned them.
    pub labels: Vec<String>,

    /// Project column events, capped at [`TIMELINE_EVENT_CAP`].
    ///
    /// `None` when the service has no timeline for this item (pull requests,
    /// or issues whose history was lost). Events are not guaranteed to be in
    /// chronological order.
    pub timeline: Option<Vec<TimelineEvent>>,
}

impl Issue {
    /// Human-readable reference in `"repository #number"` form.
    pub fn reference(&self) -> String {
        format!("{} #{}", self.repository, self.number)
    }
}

// ---------------------------------------------------------------------------

/// A user assigned to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    /// GitHub login.
    pub login: String,

    /// Profile display name, if the user has set one.
    pub name: Option<String>,
}

impl Assignee {
    /// The profile name when present and non-empty, otherwise the login.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.login,
        }
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// The kind of project board event recorded on an issue timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    /// The issue was added to the board.
    AddedToProject,
    /// The issue was moved from one column to another.
    MovedColumns,
}

/// A single column change recorded on an issue timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// What happened.
    pub kind: TimelineEventKind,

    /// Name of the column the issue was in after the event.
    pub column: String,

    /// When the event happened.
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses an RFC 3339 timestamp such as `2024-03-01T12:00:00Z`.
    pub fn parse_rfc3339(value: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
