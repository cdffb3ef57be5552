//! Command-line arguments.
//!
//! Every input that identifies the board or carries a credential can also be
//! supplied through the environment, so the binary runs unchanged from CI.

use board::{default_cutoff, parse_cutoff, BoardError, FetchConfig};
use chrono::{DateTime, TimeZone};
use clap::{Parser, ValueEnum};
use github::DEFAULT_ENDPOINT;

/// How the column tables are written to stdout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text tables.
    Table,
    /// GitHub-flavoured Markdown tables.
    Markdown,
    /// One JSON document holding every table.
    Json,
}

/// Top-level CLI parser for the `board-tables` binary.
#[derive(Debug, Parser)]
#[command(
    name = "board-tables",
    version,
    about = "Render a GitHub project board as one table per column"
)]
pub struct Cli {
    /// Organisation that owns the project
    #[arg(long, env = "BOARD_TABLES_ORG")]
    pub org: String,

    /// Project name to search for; the first match is used
    #[arg(long, env = "BOARD_TABLES_PROJECT", default_value = "")]
    pub project: String,

    /// GitHub token used as a bearer credential
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub api_key: String,

    /// Previous-status cutoff: RFC 3339, or local "YYYY-MM-DD HH:MM"
    /// (defaults to noon fourteen days ago)
    #[arg(long)]
    pub cutoff: Option<String>,

    /// Add an empty "Notes" column to every table
    #[arg(long)]
    pub notes: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// GraphQL endpoint
    #[arg(long, env = "BOARD_TABLES_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Quiet mode (no progress display, errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Builds the validated fetch configuration.
    ///
    /// `now` anchors the default cutoff and its time zone interprets a cutoff
    /// given without an offset.
    pub fn fetch_config<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Result<FetchConfig, BoardError> {
        let cutoff = match self.cutoff.as_deref() {
            Some(value) => parse_cutoff(value, &now.timezone())?,
            None => default_cutoff(now),
        };

        FetchConfig::new(&self.org, &self.project, &self.api_key, cutoff)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(extra: &[&str]) -> Cli {
        let mut argv = vec![
            "board-tables",
            "--org",
            "acme",
            "--api-key",
            "token",
            "--endpoint",
            "https://example.test/graphql",
        ];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv).unwrap()
    }

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-15T09:30:00+01:00").unwrap()
    }

    #[test]
    fn clap_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_are_parsed() {
        let cli = parse(&["--project", "Roadmap", "--notes", "--format", "markdown", "-v"]);

        assert_eq!(cli.org, "acme");
        assert_eq!(cli.project, "Roadmap");
        assert!(cli.notes);
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Markdown);
        assert_eq!(cli.timeout_secs, 30);
    }

    #[test]
    fn missing_cutoff_defaults_to_noon_two_weeks_back() {
        let config = parse(&[]).fetch_config(now()).unwrap();

        assert_eq!(config.cutoff.to_string(), "2024-03-01T11:00:00+00:00");
        assert_eq!(config.target.organization.as_str(), "acme");
    }

    #[test]
    fn local_cutoff_uses_the_zone_of_now() {
        let config = parse(&["--cutoff", "2024-03-10 08:00"])
            .fetch_config(now())
            .unwrap();

        assert_eq!(config.cutoff.to_string(), "2024-03-10T07:00:00+00:00");
    }

    #[test]
    fn unparsable_cutoff_is_a_configuration_error() {
        let err = parse(&["--cutoff", "last tuesday"])
            .fetch_config(Utc::now())
            .unwrap_err();

        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn blank_organisation_is_rejected() {
        let mut cli = parse(&[]);
        cli.org = "   ".to_string();

        assert_eq!(cli.fetch_config(now()).unwrap_err().kind(), "configuration");
    }
}
