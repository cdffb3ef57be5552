//! The GraphQL document and variables for one board page.

use board::{PageRequest, CARDS_PER_PAGE, COLUMNS_PER_PAGE};
use serde::Serialize;

/// Assignees fetched per issue. The total count is fetched separately so a
/// truncated list can be marked.
pub const ISSUE_ASSIGNEES_PER_PAGE: u32 = 3;

/// Assignees fetched per pull request.
pub const PULL_REQUEST_ASSIGNEES_PER_PAGE: u32 = 1;

/// Labels fetched per issue; only the first `size:` label matters.
pub const LABELS_PER_PAGE: u32 = 20;

/// Builds the query document.
///
/// The project is the first search match. Exactly one column is requested per
/// page so the nested card connection belongs to a single column; archived
/// cards are excluded.
pub fn project_page_query() -> String {
    format!(
        r#"query ($organisation_name: String!, $project_name: String, $column_cursor: String, $card_cursor: String) {{
  organization(login: $organisation_name) {{
    name
    projects(first: 1, search: $project_name) {{
      nodes {{
        name
        columns(first: {columns}, after: $column_cursor) {{
          totalCount
          pageInfo {{ endCursor hasNextPage }}
          nodes {{
            name
            cards(first: {cards}, archivedStates: [NOT_ARCHIVED], after: $card_cursor) {{
              totalCount
              pageInfo {{ endCursor hasNextPage }}
              nodes {{
                note
                content {{
                  __typename
                  ... on Issue {{
                    title
                    number
                    repository {{ name }}
                    assignees(first: {issue_assignees}) {{ totalCount nodes {{ login name }} }}
                    labels(first: {labels}) {{ nodes {{ name }} }}
                    timelineItems(last: {timeline}, itemTypes: [ADDED_TO_PROJECT_EVENT, MOVED_COLUMNS_IN_PROJECT_EVENT]) {{
                      nodes {{
                        __typename
                        ... on AddedToProjectEvent {{ projectColumnName createdAt }}
                        ... on MovedColumnsInProjectEvent {{ projectColumnName createdAt }}
                      }}
                    }}
                  }}
                  ... on PullRequest {{
                    title
                    number
                    repository {{ name }}
                    assignees(first: {pr_assignees}) {{ totalCount nodes {{ login name }} }}
                  }}
                }}
              }}
            }}
          }}
        }}
      }}
    }}
  }}
}}"#,
        columns = COLUMNS_PER_PAGE,
        cards = CARDS_PER_PAGE,
        issue_assignees = ISSUE_ASSIGNEES_PER_PAGE,
        labels = LABELS_PER_PAGE,
        timeline = board::TIMELINE_EVENT_CAP,
        pr_assignees = PULL_REQUEST_ASSIGNEES_PER_PAGE,
    )
}

/// Variables sent with [`project_page_query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageVariables<'a> {
    pub organisation_name: &'a str,
    pub project_name: &'a str,
    pub column_cursor: Option<&'a str>,
    pub card_cursor: Option<&'a str>,
}

impl<'a> From<&'a PageRequest> for PageVariables<'a> {
    fn from(request: &'a PageRequest) -> Self {
        Self {
            organisation_name: request.organization.as_str(),
            project_name: request.project_name.as_str(),
            column_cursor: request.position.column_cursor().map(|c| c.as_str()),
            card_cursor: request.position.card_cursor().map(|c| c.as_str()),
        }
    }
}

/// The JSON body of a GraphQL POST.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlPayload<'a> {
    pub query: &'a str,
    pub variables: PageVariables<'a>,
}
