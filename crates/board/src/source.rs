//! Port definitions for the paged board transport.
//!
//! The aggregator never talks to the network. It asks a [`ProjectBoardSource`]
//! for one [`ProjectPage`] at a time, describing which page it wants with a
//! [`PageRequest`]. The `github` crate implements the trait over GraphQL; tests
//! implement it with scripted pages.
//!
//! ## Cursor discipline
//!
//! A board is paged along two axes: columns (one per page) and the cards of the
//! current column. A card cursor is only valid together with the column cursor
//! that produced its column. [`PagePosition`] encodes this: the only way to ask
//! for more cards is [`PagePosition::MoreCards`], which carries the column
//! cursor and the card cursor together, and the only way to move to the next
//! column is [`PagePosition::NextColumn`], which carries no card cursor.

use async_trait::async_trait;

use crate::{BoardError, Card, Cursor, OrganizationName, ProjectNameFilter, ProjectTarget};

/// Number of columns requested per page.
///
/// Fixed at one so that the nested card connection always belongs to a single
/// column and its cursor can be followed unambiguously.
pub const COLUMNS_PER_PAGE: u32 = 1;

/// Number of cards requested per page; the GraphQL API's connection limit.
pub const CARDS_PER_PAGE: u32 = 100;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Where the next page starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagePosition {
    /// The first column and its first card page.
    FirstColumn,

    /// The column after `after`, starting from its first card page.
    NextColumn {
        /// End cursor of the previous column page.
        after: Cursor,
    },

    /// Further cards of the column currently being filled.
    MoreCards {
        /// The column cursor that produced the current column. `None` when
        /// the current column is the first one.
        column: Option<Cursor>,
        /// End cursor of the previous card page of that column.
        after: Cursor,
    },
}

impl PagePosition {
    /// The `after` cursor for the column connection.
    pub fn column_cursor(&self) -> Option<&Cursor> {
        match self {
            PagePosition::FirstColumn => None,
            PagePosition::NextColumn { after } => Some(after),
            PagePosition::MoreCards { column, .. } => column.as_ref(),
        }
    }

    /// The `after` cursor for the card connection of the returned column.
    pub fn card_cursor(&self) -> Option<&Cursor> {
        match self {
            PagePosition::MoreCards { after, .. } => Some(after),
            PagePosition::FirstColumn | PagePosition::NextColumn { .. } => None,
        }
    }

    /// Whether the page continues the current column rather than starting one.
    pub fn continues_column(&self) -> bool {
        matches!(self, PagePosition::MoreCards { .. })
    }
}

/// One page request handed to a [`ProjectBoardSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Organisation that owns the project.
    pub organization: OrganizationName,

    /// Project search text.
    pub project_name: ProjectNameFilter,

    /// Which page to return.
    pub position: PagePosition,
}

impl PageRequest {
    /// Builds the request for `position` on `target`.
    pub fn new(target: &ProjectTarget, position: PagePosition) -> Self {
        Self {
            organization: target.organization.clone(),
            project_name: target.project_name.clone(),
            position,
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// One page of a project board.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPage {
    /// Name of the matched project.
    pub project_name: String,

    /// Number of columns on the board.
    pub column_total: u32,

    /// End cursor of the column connection, present only when another column
    /// page exists.
    pub next_column: Option<Cursor>,

    /// The column on this page. `None` only when the board has no columns.
    pub column: Option<ColumnPage>,
}

/// The single column carried by a [`ProjectPage`], with one page of its cards.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPage {
    /// Column display name.
    pub name: String,

    /// Total non-archived cards in the column.
    pub card_total: u32,

    /// This page's cards in server order.
    pub cards: Vec<Card>,

    /// End cursor of the card connection, present only when another card page
    /// exists.
    pub next_cards: Option<Cursor>,
}

impl ProjectPage {
    /// The position of the page that follows this one, or `None` when both
    /// axes are exhausted.
    ///
    /// `requested` must be the position this page was fetched with. Remaining
    /// cards of the current column always take precedence over the next column.
    pub fn next_position(&self, requested: &PagePosition) -> Option<PagePosition> {
        if let Some(after) = self.column.as_ref().and_then(|c| c.next_cards.clone()) {
            return Some(PagePosition::MoreCards {
                column: requested.column_cursor().cloned(),
                after,
            });
        }

        self.next_column
            .clone()
            .map(|after| PagePosition::NextColumn { after })
    }
}

// ---------------------------------------------------------------------------
// Port traits
// ---------------------------------------------------------------------------

/// Supplies pages of a project board.
///
/// Implementations perform exactly one request per call and classify every
/// failure into a [`BoardError`]. They must not retry.
#[async_trait]
pub trait ProjectBoardSource: Send + Sync {
    /// Fetches the page described by `request`.
    ///
    /// # Errors
    ///
    /// - [`BoardError::Transport`] for network failures and non-success statuses.
    /// - [`BoardError::Service`] when the response carries an error list.
    /// - [`BoardError::ProjectNotFound`] when no project matches.
    /// - [`BoardError::MalformedResponse`] when the body cannot be interpreted.
    async fn fetch_page(&self, request: &PageRequest) -> Result<ProjectPage, BoardError>;
}

/// Progress made by an in-flight aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchProgress {
    /// 1-based index of the column currently being filled.
    pub column: usize,

    /// Number of columns on the board.
    pub column_total: u32,

    /// Cards fetched so far across all columns.
    pub cards_fetched: usize,
}

/// Receives progress notifications while a snapshot is being assembled.
///
/// Notifications carry counts only; the partially merged snapshot is never
/// exposed.
pub trait FetchObserver: Send + Sync {
    /// Called after each page has been merged.
    fn page_merged(&self, progress: FetchProgress);
}

/// A [`FetchObserver`] that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl FetchObserver for NoProgress {
    fn page_merged(&self, _progress: FetchProgress) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(value: &str) -> Cursor {
        Cursor::new(value).unwrap()
    }

    fn page(next_column: Option<&str>, next_cards: Option<&str>) -> ProjectPage {
        ProjectPage {
            project_name: "Roadmap".to_string(),
            column_total: 3,
            next_column: next_column.map(cursor),
            column: Some(ColumnPage {
                name: "Backlog".to_string(),
                card_total: 0,
                cards: Vec::new(),
                next_cards: next_cards.map(cursor),
            }),
        }
    }

    #[test]
    fn remaining_cards_hold_the_column_cursor() {
        let requested = PagePosition::NextColumn { after: cursor("c1") };
        let next = page(Some("c2"), Some("k1")).next_position(&requested);

        assert_eq!(
            next,
            Some(PagePosition::MoreCards {
                column: Some(cursor("c1")),
                after: cursor("k1"),
            })
        );
    }

    #[test]
    fn first_column_cards_continue_without_a_column_cursor() {
        let next = page(Some("c1"), Some("k1")).next_position(&PagePosition::FirstColumn);
        let next = next.unwrap();

        assert_eq!(next.column_cursor(), None);
        assert_eq!(next.card_cursor(), Some(&cursor("k1")));
    }

    #[test]
    fn exhausted_cards_advance_the_column_and_reset_cards() {
        let requested = PagePosition::MoreCards {
            column: Some(cursor("c1")),
            after: cursor("k1"),
        };
        let next = page(Some("c2"), None).next_position(&requested).unwrap();

        assert_eq!(next, PagePosition::NextColumn { after: cursor("c2") });
        assert_eq!(next.card_cursor(), None);
    }

    #[test]
    fn both_axes_exhausted_terminates() {
        assert_eq!(page(None, None).next_position(&PagePosition::FirstColumn), None);
    }

    #[test]
    fn empty_board_terminates() {
        let empty = ProjectPage {
            project_name: "Roadmap".to_string(),
            column_total: 0,
            next_column: None,
            column: None,
        };
        assert_eq!(empty.next_position(&PagePosition::FirstColumn), None);
    }
}
