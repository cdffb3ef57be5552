//! Terminal progress for a running fetch.

use std::time::Duration;

use board::{FetchObserver, FetchProgress};
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner on stderr that reports which column is being fetched.
///
/// Disabled in quiet mode. indicatif hides it on its own when stderr is not a
/// terminal.
pub struct FetchSpinner {
    bar: Option<ProgressBar>,
}

impl FetchSpinner {
    #[must_use]
    pub fn start(enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message("Fetching project board");
        Self { bar: Some(bar) }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl FetchObserver for FetchSpinner {
    fn page_merged(&self, progress: FetchProgress) {
        if let Some(bar) = &self.bar {
            bar.set_message(progress_message(progress));
        }
    }
}

fn progress_message(progress: FetchProgress) -> String {
    format!(
        "Fetching data for column {}/{} ({} cards)",
        progress.column, progress.column_total, progress.cards_fetched
    )
}
