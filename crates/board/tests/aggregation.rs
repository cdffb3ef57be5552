//! End-to-end aggregation against a scripted board source.

use std::sync::Mutex;

use async_trait::async_trait;
use board::{
    fetch_project_snapshot, BoardError, Card, ColumnPage, Cursor, FetchObserver, FetchProgress,
    NoProgress, OrganizationName, PageRequest, ProjectBoardSource, ProjectNameFilter, ProjectPage,
    ProjectTarget,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ---------------------------------------------------------------------------
// Scripted source
// ---------------------------------------------------------------------------

/// Serves a fixed board, slicing each column's cards into pages of
/// `cards_per_page`.
///
/// Column cursors are `col:<index>`; card cursors are `card:<column>:<offset>`.
/// A card cursor presented alongside a column cursor for a different column is
/// answered with an error so that any cursor mix-up fails the test.
struct ScriptedBoard {
    columns: Vec<(String, Vec<String>)>,
    cards_per_page: usize,
    fail_on_request: Option<(usize, BoardError)>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedBoard {
    fn new(columns: &[(&str, usize)], cards_per_page: usize) -> Self {
        let columns = columns
            .iter()
            .map(|(name, count)| {
                let cards = (0..*count).map(|i| format!("{name}-{i}")).collect();
                (name.to_string(), cards)
            })
            .collect();

        Self {
            columns,
            cards_per_page,
            fail_on_request: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, request_index: usize, error: BoardError) -> Self {
        self.fail_on_request = Some((request_index, error));
        self
    }

    fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn parse_index(cursor: Option<&Cursor>, prefix: &str) -> Option<usize> {
        cursor.map(|c| {
            c.as_str()
                .strip_prefix(prefix)
                .and_then(|rest| rest.parse().ok())
                .expect("cursor produced by this board")
        })
    }
}

#[async_trait]
impl ProjectBoardSource for ScriptedBoard {
    async fn fetch_page(&self, request: &PageRequest) -> Result<ProjectPage, BoardError> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };

        if let Some((fail_at, error)) = &self.fail_on_request {
            if *fail_at == index {
                return Err(error.clone());
            }
        }

        let column_index = Self::parse_index(request.position.column_cursor(), "col:")
            .map_or(0, |previous| previous + 1);

        let offset = match request.position.card_cursor() {
            None => 0,
            Some(cursor) => {
                let (column, offset) = cursor
                    .as_str()
                    .strip_prefix("card:")
                    .and_then(|rest| rest.split_once(':'))
                    .expect("card cursor produced by this board");
                if column.parse::<usize>().ok() != Some(column_index) {
                    return Err(BoardError::malformed("card cursor used with another column"));
                }
                offset.parse::<usize>().expect("numeric offset")
            }
        };

        let Some((name, cards)) = self.columns.get(column_index) else {
            return Ok(ProjectPage {
                project_name: "Roadmap".to_string(),
                column_total: self.columns.len() as u32,
                next_column: None,
                column: None,
            });
        };

        let end = (offset + self.cards_per_page).min(cards.len());
        let next_cards = (end < cards.len())
            .then(|| Cursor::new(format!("card:{column_index}:{end}")))
            .flatten();
        let next_column = (column_index + 1 < self.columns.len())
            .then(|| Cursor::new(format!("col:{column_index}")))
            .flatten();

        Ok(ProjectPage {
            project_name: "Roadmap".to_string(),
            column_total: self.columns.len() as u32,
            next_column,
            column: Some(ColumnPage {
                name: name.clone(),
                card_total: cards.len() as u32,
                cards: cards[offset..end]
                    .iter()
                    .map(|text| Card::Note { text: text.clone() })
                    .collect(),
                next_cards,
            }),
        })
    }
}

#[derive(Default)]
struct RecordingObserver {
    seen: Mutex<Vec<FetchProgress>>,
}

impl FetchObserver for RecordingObserver {
    fn page_merged(&self, progress: FetchProgress) {
        self.seen.lock().unwrap().push(progress);
    }
}

fn target() -> ProjectTarget {
    ProjectTarget {
        organization: OrganizationName::new("acme").unwrap(),
        project_name: ProjectNameFilter::new("Roadmap"),
    }
}

fn note_texts(cards: &[Card]) -> Vec<String> {
    cards
        .iter()
        .map(|card| match card {
            Card::Note { text } => text.clone(),
            Card::Issue(issue) => issue.reference(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Completeness
// ---------------------------------------------------------------------------

#[rstest]
#[case::single_page(&[("Backlog", 3)], 100)]
#[case::many_card_pages(&[("Backlog", 7)], 2)]
#[case::one_card_per_page(&[("Backlog", 3), ("Doing", 2), ("Done", 4)], 1)]
#[case::empty_columns(&[("Backlog", 0), ("Doing", 5), ("Done", 0)], 2)]
#[case::exact_page_boundary(&[("Backlog", 4), ("Done", 4)], 2)]
#[tokio::test]
async fn snapshot_holds_every_card_in_server_order(
    #[case] layout: &[(&str, usize)],
    #[case] cards_per_page: usize,
) {
    let board = ScriptedBoard::new(layout, cards_per_page);

    let snapshot = fetch_project_snapshot(&board, &target(), &NoProgress)
        .await
        .unwrap();

    assert_eq!(snapshot.name, "Roadmap");
    assert_eq!(snapshot.columns.len(), layout.len());
    for (column, (name, cards)) in snapshot.columns.iter().zip(board.columns.iter()) {
        assert_eq!(&column.name, name);
        assert_eq!(column.total_count as usize, cards.len());
        assert_eq!(&note_texts(&column.cards), cards);
    }
}

#[tokio::test]
async fn board_without_columns_yields_an_empty_snapshot() {
    let board = ScriptedBoard::new(&[], 10);

    let snapshot = fetch_project_snapshot(&board, &target(), &NoProgress)
        .await
        .unwrap();

    assert!(snapshot.columns.is_empty());
    assert_eq!(board.requests().len(), 1);
}

// ---------------------------------------------------------------------------
// Cursor discipline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn card_pages_keep_the_column_cursor_fixed() {
    let board = ScriptedBoard::new(&[("Backlog", 3), ("Doing", 3)], 2);

    fetch_project_snapshot(&board, &target(), &NoProgress)
        .await
        .unwrap();

    let cursors: Vec<(Option<String>, Option<String>)> = board
        .requests()
        .iter()
        .map(|r| {
            (
                r.position.column_cursor().map(|c| c.to_string()),
                r.position.card_cursor().map(|c| c.to_string()),
            )
        })
        .collect();

    assert_eq!(
        cursors,
        vec![
            (None, None),
            (None, Some("card:0:2".to_string())),
            (Some("col:0".to_string()), None),
            (Some("col:0".to_string()), Some("card:1:2".to_string())),
        ]
    );
}

#[tokio::test]
async fn every_request_targets_the_configured_project() {
    let board = ScriptedBoard::new(&[("Backlog", 1), ("Done", 1)], 10);

    fetch_project_snapshot(&board, &target(), &NoProgress)
        .await
        .unwrap();

    for request in board.requests() {
        assert_eq!(request.organization.as_str(), "acme");
        assert_eq!(request.project_name.as_str(), "Roadmap");
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[tokio::test]
async fn observer_sees_progress_after_each_page() {
    let board = ScriptedBoard::new(&[("Backlog", 3), ("Done", 1)], 2);
    let observer = RecordingObserver::default();

    fetch_project_snapshot(&board, &target(), &observer)
        .await
        .unwrap();

    let seen = observer.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            FetchProgress {
                column: 1,
                column_total: 2,
                cards_fetched: 2,
            },
            FetchProgress {
                column: 1,
                column_total: 2,
                cards_fetched: 3,
            },
            FetchProgress {
                column: 2,
                column_total: 2,
                cards_fetched: 4,
            },
        ]
    );
}

// ---------------------------------------------------------------------------
// Failure propagation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn service_error_mid_fetch_aborts_without_a_snapshot() {
    let error = BoardError::Service {
        messages: vec!["Something went wrong".to_string()],
    };
    let board = ScriptedBoard::new(&[("Backlog", 3), ("Done", 3)], 2).failing_on(2, error.clone());

    let result = fetch_project_snapshot(&board, &target(), &NoProgress).await;

    assert_eq!(result, Err(error));
    assert_eq!(board.requests().len(), 3, "no request after the failure");
}

#[tokio::test]
async fn missing_project_is_reported_distinctly() {
    let error = BoardError::ProjectNotFound {
        organization: OrganizationName::new("acme").unwrap(),
        project_name: ProjectNameFilter::new("Roadmap"),
    };
    let board = ScriptedBoard::new(&[("Backlog", 1)], 2).failing_on(0, error);

    let err = fetch_project_snapshot(&board, &target(), &NoProgress)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "project_not_found");
}

#[tokio::test]
async fn transport_failure_is_not_retried() {
    let board =
        ScriptedBoard::new(&[("Backlog", 1)], 2).failing_on(0, BoardError::http_status(502, "oops"));

    let err = fetch_project_snapshot(&board, &target(), &NoProgress)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "transport");
    assert_eq!(board.requests().len(), 1);
}
