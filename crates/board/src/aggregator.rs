//! Two-axis page aggregation.
//!
//! [`fetch_project_snapshot`] walks a project board one page at a time: the
//! cards of the current column are exhausted before the next column is
//! requested, and each request's cursors come from the previous response. The
//! pages form a lazily produced stream which is folded into a
//! [`PartialSnapshot`]; every merge consumes the accumulator and returns a new
//! one, so no long-lived mutable aggregate exists.
//!
//! The partial snapshot is private to the fold. Callers only ever receive the
//! finished [`ProjectSnapshot`], and only after both axes report no further
//! page. Any error ends the stream and the fold, and the partial snapshot is
//! dropped with it. Dropping the returned future has the same effect.

use futures::{future, stream, Stream, TryStreamExt};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::source::{
    FetchObserver, FetchProgress, PagePosition, PageRequest, ProjectBoardSource, ProjectPage,
};
use crate::{BoardError, Column, ProjectSnapshot, ProjectTarget};

/// Fetches every column and card of the target project and merges them into
/// one snapshot.
///
/// Requests are issued strictly one after another; at most one is outstanding
/// at any time. `observer` is told about progress after each merged page.
///
/// # Errors
///
/// Returns the first [`BoardError`] produced by `source`, or
/// [`BoardError::MalformedResponse`] when a page does not fit the column it is
/// supposed to continue. No snapshot is produced on error.
pub async fn fetch_project_snapshot(
    source: &dyn ProjectBoardSource,
    target: &ProjectTarget,
    observer: &dyn FetchObserver,
) -> Result<ProjectSnapshot, BoardError> {
    let span = info_span!(
        "fetch_project_snapshot",
        organization = %target.organization,
        project = %target.project_name,
    );

    async move {
        let result = page_stream(source, target)
            .try_fold(PartialSnapshot::default(), |partial, (position, page)| {
                let merged = partial.merge(&position, page).inspect(|partial| {
                    observer.page_merged(partial.progress());
                });
                future::ready(merged)
            })
            .await;

        match result {
            Ok(partial) => {
                let snapshot = partial.finish();
                info!(
                    columns = snapshot.columns.len(),
                    cards = snapshot.card_count(),
                    issues = snapshot.issues().count(),
                    "project snapshot complete"
                );
                Ok(snapshot)
            }
            Err(error) => {
                warn!(kind = error.kind(), %error, "project fetch aborted");
                Err(error)
            }
        }
    }
    .instrument(span)
    .await
}

/// The sequence of pages for `target`, each paired with the position it was
/// requested at.
///
/// The next request is only built once the previous page has arrived, because
/// its cursors come from that page.
fn page_stream<'a>(
    source: &'a dyn ProjectBoardSource,
    target: &'a ProjectTarget,
) -> impl Stream<Item = Result<(PagePosition, ProjectPage), BoardError>> + 'a {
    stream::try_unfold(Some(PagePosition::FirstColumn), move |position| async move {
        let Some(position) = position else {
            return Ok(None);
        };

        let request = PageRequest::new(target, position);
        debug!(
            column_cursor = ?request.position.column_cursor(),
            card_cursor = ?request.position.card_cursor(),
            "requesting board page"
        );

        let page = source.fetch_page(&request).await?;
        let next = page.next_position(&request.position);

        Ok::<_, BoardError>(Some(((request.position, page), next)))
    })
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// The board as merged so far.
#[derive(Debug, Default)]
struct PartialSnapshot {
    project_name: String,
    column_total: u32,
    columns: Vec<Column>,
}

impl PartialSnapshot {
    /// Merges one page, returning the extended accumulator.
    fn merge(mut self, position: &PagePosition, page: ProjectPage) -> Result<Self, BoardError> {
        self.project_name = page.project_name;
        self.column_total = page.column_total;

        let Some(column_page) = page.column else {
            return match position {
                PagePosition::FirstColumn => Ok(self),
                PagePosition::NextColumn { .. } => Err(BoardError::malformed(
                    "column page reported another column but returned none",
                )),
                PagePosition::MoreCards { .. } => Err(BoardError::malformed(
                    "card page returned no column to continue",
                )),
            };
        };

        if position.continues_column() {
            let current = self.columns.last_mut().ok_or_else(|| {
                BoardError::malformed("card page arrived before any column was started")
            })?;
            if current.name != column_page.name {
                return Err(BoardError::malformed(format!(
                    "card page for column '{}' arrived while filling '{}'",
                    column_page.name, current.name
                )));
            }

            debug!(
                column = %current.name,
                cards = column_page.cards.len(),
                "appending card page"
            );
            current.total_count = column_page.card_total;
            current.cards.extend(column_page.cards);
        } else {
            debug!(
                column = %column_page.name,
                cards = column_page.cards.len(),
                "starting column"
            );
            self.columns.push(Column {
                name: column_page.name,
                total_count: column_page.card_total,
                cards: column_page.cards,
            });
        }

        Ok(self)
    }

    fn progress(&self) -> FetchProgress {
        FetchProgress {
            column: self.columns.len(),
            column_total: self.column_total,
            cards_fetched: self.columns.iter().map(|c| c.cards.len()).sum(),
        }
    }

    fn finish(self) -> ProjectSnapshot {
        ProjectSnapshot {
            name: self.project_name,
            columns: self.columns,
        }
    }
}
