//! Historical status resolution.
//!
//! Answers "which column was this issue in just before the cutoff?" from the
//! issue's capped project timeline.

use crate::{Timestamp, TimelineEvent};

/// Result for issues with no column history before the cutoff.
pub const NEW_ISSUE: &str = "** New Issue **";

/// Returns the column the issue occupied immediately before `cutoff`.
///
/// Events are treated as an unordered set: among the events strictly before
/// `cutoff` the one with the latest timestamp wins. When two qualifying events
/// share that timestamp, the one that appears first in `timeline` wins.
///
/// Returns [`NEW_ISSUE`] when `timeline` is `None` (the item was never tracked)
/// or when no event lies before `cutoff`.
pub fn resolve_previous_column(timeline: Option<&[TimelineEvent]>, cutoff: Timestamp) -> &str {
    let Some(events) = timeline else {
        return NEW_ISSUE;
    };

    events
        .iter()
        .filter(|event| event.created_at < cutoff)
        .fold(None::<&TimelineEvent>, |latest, event| match latest {
            Some(current) if current.created_at >= event.created_at => Some(current),
            _ => Some(event),
        })
        .map_or(NEW_ISSUE, |event| event.column.as_str())
}
