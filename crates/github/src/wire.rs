//! Response shapes returned by the GraphQL API and their conversion into
//! [`board::ProjectPage`].
//!
//! Field names follow the API (`camelCase`). Every collection the API may
//! omit or null out is defaulted so that missing assignees, labels or events
//! become empty values rather than decode failures.

use board::{
    Assignee, BoardError, Card, ColumnPage, Cursor, Issue, IssueKind, IssueNumber, PageRequest,
    ProjectPage, RepositoryName, TimelineEvent, TimelineEventKind, Timestamp,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The top-level GraphQL response.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryData {
    pub organization: Option<Organization>,
}

#[derive(Debug, Deserialize)]
pub struct Organization {
    pub projects: Connection<Project>,
}

#[derive(Debug, Deserialize)]
pub struct Project {
    pub name: String,
    pub columns: PagedConnection<ProjectColumn>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectColumn {
    pub name: String,
    pub cards: PagedConnection<ProjectCard>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectCard {
    pub note: Option<String>,
    pub content: Option<CardContent>,
}

// ---------------------------------------------------------------------------
// Connections
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default = "Vec::new", deserialize_with = "nullable_vec")]
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct PagedConnection<T> {
    #[serde(default)]
    pub total_count: u32,
    pub page_info: PageInfo,
    #[serde(default = "Vec::new", deserialize_with = "nullable_vec")]
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

impl PageInfo {
    /// The cursor to continue from, present only when another page exists.
    ///
    /// Announcing another page without a non-empty end cursor is malformed.
    fn next_cursor(&self) -> Result<Option<Cursor>, BoardError> {
        if !self.has_next_page {
            return Ok(None);
        }
        self.end_cursor
            .clone()
            .and_then(Cursor::new)
            .map(Some)
            .ok_or_else(|| {
                BoardError::malformed("connection reports another page but no end cursor")
            })
    }
}

// ---------------------------------------------------------------------------
// Card content
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContent {
    #[serde(rename = "__typename")]
    pub typename: String,
    #[serde(default)]
    pub title: String,
    pub number: u64,
    pub repository: Repository,
    pub assignees: Option<AssigneeConnection>,
    pub labels: Option<Connection<Label>>,
    pub timeline_items: Option<Connection<TimelineItem>>,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeConnection {
    pub total_count: Option<u32>,
    #[serde(default = "Vec::new", deserialize_with = "nullable_vec")]
    pub nodes: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub login: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    #[serde(rename = "__typename")]
    pub typename: Option<String>,
    pub project_column_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Treats an explicit `null` list the same as a missing one.
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Interpretation
// ---------------------------------------------------------------------------

/// Classifies a successful HTTP body and converts it into a page.
///
/// # Errors
///
/// - [`BoardError::MalformedResponse`] when the body is not the expected JSON.
/// - [`BoardError::Service`] when the body carries an `errors` array.
/// - [`BoardError::ProjectNotFound`] when no project matched the request.
pub fn interpret_page(body: &str, request: &PageRequest) -> Result<ProjectPage, BoardError> {
    let response: GraphQlResponse<QueryData> = serde_json::from_str(body)
        .map_err(|e| BoardError::malformed(format!("failed to parse response: {e}")))?;

    if !response.errors.is_empty() {
        return Err(BoardError::Service {
            messages: response.errors.into_iter().map(|e| e.message).collect(),
        });
    }

    let project = response
        .data
        .and_then(|data| data.organization)
        .and_then(|org| org.projects.nodes.into_iter().next())
        .ok_or_else(|| BoardError::ProjectNotFound {
            organization: request.organization.clone(),
            project_name: request.project_name.clone(),
        })?;

    project.into_page()
}

impl Project {
    fn into_page(self) -> Result<ProjectPage, BoardError> {
        let next_column = self.columns.page_info.next_cursor()?;
        let column = self
            .columns
            .nodes
            .into_iter()
            .next()
            .map(ProjectColumn::into_column_page)
            .transpose()?;

        Ok(ProjectPage {
            project_name: self.name,
            column_total: self.columns.total_count,
            next_column,
            column,
        })
    }
}

impl ProjectColumn {
    fn into_column_page(self) -> Result<ColumnPage, BoardError> {
        let next_cards = self.cards.page_info.next_cursor()?;
        let cards = self
            .cards
            .nodes
            .into_iter()
            .map(ProjectCard::into_card)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ColumnPage {
            name: self.name,
            card_total: self.cards.total_count,
            cards,
            next_cards,
        })
    }
}

impl ProjectCard {
    fn into_card(self) -> Result<Card, BoardError> {
        match self.content {
            None => Ok(Card::Note {
                text: self.note.unwrap_or_default(),
            }),
            Some(content) => content.into_issue().map(Card::Issue),
        }
    }
}

impl CardContent {
    fn into_issue(self) -> Result<Issue, BoardError> {
        let repository = RepositoryName::new(self.repository.name).ok_or_else(|| {
            BoardError::malformed(format!("card #{} has an empty repository name", self.number))
        })?;

        let kind = if self.typename == "PullRequest" {
            IssueKind::PullRequest
        } else {
            IssueKind::Issue
        };

        let (assignees, assignee_count) = match self.assignees {
            Some(connection) => {
                let fetched = connection.nodes.len() as u32;
                let assignees = connection
                    .nodes
                    .into_iter()
                    .map(|user| Assignee {
                        login: user.login,
                        name: user.name,
                    })
                    .collect();
                (assignees, connection.total_count.unwrap_or(fetched))
            }
            None => (Vec::new(), 0),
        };

        let labels = self
            .labels
            .map(|c| c.nodes.into_iter().map(|label| label.name).collect())
            .unwrap_or_default();

        let timeline = self
            .timeline_items
            .map(|c| c.nodes.into_iter().filter_map(TimelineItem::into_event).collect());

        Ok(Issue {
            kind,
            repository,
            number: IssueNumber::new(self.number),
            title: self.title,
            assignees,
            assignee_count,
            labels,
            timeline,
        })
    }
}

impl TimelineItem {
    /// Converts a timeline node, skipping nodes that lack a column or time.
    fn into_event(self) -> Option<TimelineEvent> {
        let kind = match self.typename.as_deref() {
            Some("AddedToProjectEvent") => TimelineEventKind::AddedToProject,
            _ => TimelineEventKind::MovedColumns,
        };

        Some(TimelineEvent {
            kind,
            column: self.project_column_name?,
            created_at: Timestamp::from_utc(self.created_at?),
        })
    }
}
