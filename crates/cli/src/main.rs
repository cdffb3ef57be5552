//! board-tables entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse configuration**: read flags and environment fallbacks, then
//!    validate them into a [`board::FetchConfig`] before any request is made.
//! 2. **Wire observability**: install the `tracing` subscriber with an optional
//!    OpenTelemetry OTLP exporter (see [`telemetry`]). Spans and events from
//!    every crate flow through it.
//! 3. **Construct infrastructure**: build the [`github::GitHubBoardClient`] and
//!    inject it into [`board::fetch_project_snapshot`] as the board source.
//! 4. **Render**: project the finished snapshot into column tables and write
//!    them to stdout.
//!
//! Any failure aborts the run with a non-zero exit code and no tables.

use std::process::ExitCode;

use anyhow::Context;
use board::{build_tables, fetch_project_snapshot, FetchRunId};
use chrono::Local;
use clap::Parser;
use github::{GitHubBoardClient, GitHubClientConfig};
use tracing::{info, info_span, Instrument};

mod args;
mod progress;
mod render;
mod telemetry;

use args::Cli;
use progress::FetchSpinner;
use telemetry::LogOptions;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _telemetry = match telemetry::init(LogOptions {
        quiet: cli.quiet,
        verbose: cli.verbose,
        json: cli.log_json,
    }) {
        Ok(guard) => guard,
        Err(error) => {
            eprintln!("board-tables error: {error:#}");
            return ExitCode::FAILURE;
        }
    };

    let run_id = FetchRunId::new_random();
    let span = info_span!("board_tables", run_id = %run_id.as_uuid());
    match run(cli).instrument(span).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("board-tables error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli
        .fetch_config(Local::now())
        .context("invalid configuration")?;

    let client = GitHubBoardClient::new(GitHubClientConfig {
        endpoint: cli.endpoint.clone(),
        timeout_secs: cli.timeout_secs,
        ..GitHubClientConfig::new(config.api_key.clone())
    })
    .context("failed to create GitHub client")?;

    info!(
        organization = %config.target.organization,
        project = %config.target.project_name.as_str(),
        cutoff = %config.cutoff,
        "fetching project board"
    );

    let spinner = FetchSpinner::start(!cli.quiet);
    let fetched = fetch_project_snapshot(&client, &config.target, &spinner).await;
    spinner.finish_clear();

    let snapshot = fetched.with_context(|| {
        format!(
            "failed to fetch project board '{}' of '{}'",
            config.target.project_name.as_str(),
            config.target.organization
        )
    })?;

    let tables = build_tables(&snapshot, config.cutoff, cli.notes);
    let output = render::render(&snapshot.name, config.cutoff, &tables, cli.format)?;
    println!("{output}");
    Ok(())
}
