//! Core domain for project board tables.
//!
//! This crate contains the board snapshot model, the two-axis page aggregator,
//! historical status resolution, and the port trait a transport must implement.
//! Infrastructure crates implement the traits defined here; they never add
//! domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype domain identifiers (`OrganizationName`, `Cursor`, etc.) |
//! | [`types`] | Snapshot model (`ProjectSnapshot`, `Column`, `Card`, `Issue`, `Timestamp`) |
//! | [`errors`] | The [`BoardError`] taxonomy |
//! | [`config`] | Explicit fetch configuration and cutoff parsing |
//! | [`source`] | The [`ProjectBoardSource`] port and page types |
//! | [`aggregator`] | [`fetch_project_snapshot`] |
//! | [`status`] | [`resolve_previous_column`] |
//! | [`report`] | Per-column table projection, size and assignee helpers |

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod identifiers;
pub mod report;
pub mod source;
pub mod status;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use aggregator::fetch_project_snapshot;
pub use config::{default_cutoff, parse_cutoff, ApiKey, FetchConfig, ProjectTarget};
pub use errors::BoardError;
pub use identifiers::{
    Cursor, FetchRunId, IssueNumber, OrganizationName, ProjectNameFilter, RepositoryName,
};
pub use report::{build_tables, join_assignee_names, size_label, ColumnTable};
pub use source::{
    ColumnPage, FetchObserver, FetchProgress, NoProgress, PagePosition, PageRequest,
    ProjectBoardSource, ProjectPage, CARDS_PER_PAGE, COLUMNS_PER_PAGE,
};
pub use status::{resolve_previous_column, NEW_ISSUE};
pub use types::{
    Assignee, Card, Column, Issue, IssueKind, ProjectSnapshot, TimelineEvent, TimelineEventKind,
    Timestamp, TIMELINE_EVENT_CAP,
};
