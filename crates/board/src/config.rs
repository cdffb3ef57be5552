//! Operator-supplied configuration for one board fetch.
//!
//! Everything the fetch needs is passed in explicitly through [`FetchConfig`];
//! nothing is read from ambient state. The composition root (the `cli` crate)
//! gathers the raw values from flags and environment variables and builds the
//! config with [`FetchConfig::new`], which validates them before any request is
//! made.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

use crate::{BoardError, OrganizationName, ProjectNameFilter, Timestamp};

/// How far before "now" the default cutoff lies.
pub const DEFAULT_CUTOFF_DAYS_AGO: i64 = 14;

/// Hour of day (local time) used for the default cutoff.
pub const DEFAULT_CUTOFF_HOUR: u32 = 12;

/// Local date-time layouts accepted for the cutoff in addition to RFC 3339.
const LOCAL_CUTOFF_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// A GitHub API token.
///
/// The value never appears in `Debug` output, so configs can be logged safely.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a token, returning `None` if it is empty or whitespace.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.trim().is_empty() {
            None
        } else {
            Some(Self(v.trim().to_string()))
        }
    }

    /// Returns the raw token for use in an `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Target and config
// ---------------------------------------------------------------------------

/// Which project board to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTarget {
    /// Organisation that owns the project.
    pub organization: OrganizationName,

    /// Search text; the first matching project is used.
    pub project_name: ProjectNameFilter,
}

/// Everything one fetch-and-render run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// The project to fetch.
    pub target: ProjectTarget,

    /// Credential sent with every request.
    pub api_key: ApiKey,

    /// Instant used to compute each issue's previous column.
    pub cutoff: Timestamp,
}

impl FetchConfig {
    /// Validates raw operator input and builds a config.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Configuration`] when the organisation or API key is
    /// empty.
    pub fn new(
        organization: &str,
        project_name: &str,
        api_key: &str,
        cutoff: Timestamp,
    ) -> Result<Self, BoardError> {
        let organization = OrganizationName::new(organization.trim())
            .ok_or_else(|| BoardError::configuration("organisation name must not be empty"))?;
        let api_key =
            ApiKey::new(api_key).ok_or_else(|| BoardError::configuration("API key must not be empty"))?;

        Ok(Self {
            target: ProjectTarget {
                organization,
                project_name: ProjectNameFilter::new(project_name.trim()),
            },
            api_key,
            cutoff,
        })
    }
}

// ---------------------------------------------------------------------------
// Cutoff handling
// ---------------------------------------------------------------------------

/// The default cutoff: noon, [`DEFAULT_CUTOFF_DAYS_AGO`] days before `now`, in
/// `now`'s time zone.
pub fn default_cutoff<Tz: TimeZone>(now: DateTime<Tz>) -> Timestamp {
    let tz = now.timezone();
    let earlier = now - Duration::days(DEFAULT_CUTOFF_DAYS_AGO);
    let noon = earlier
        .date_naive()
        .and_hms_opt(DEFAULT_CUTOFF_HOUR, 0, 0)
        .and_then(|naive| tz.from_local_datetime(&naive).earliest());

    match noon {
        Some(dt) => Timestamp::from_utc(dt.with_timezone(&Utc)),
        // Noon does not exist in this zone on that day; keep the time of day.
        None => Timestamp::from_utc(earlier.with_timezone(&Utc)),
    }
}

/// Parses an operator-supplied cutoff.
///
/// Accepts RFC 3339 (`2024-03-01T12:00:00Z`) or a local date-time without
/// offset (`2024-03-01 12:00`, `2024-03-01T12:00`, optionally with seconds),
/// which is interpreted in `tz`.
///
/// # Errors
///
/// Returns [`BoardError::Configuration`] when the value matches none of the
/// accepted layouts or names a local time that does not exist in `tz`.
pub fn parse_cutoff<Tz: TimeZone>(value: &str, tz: &Tz) -> Result<Timestamp, BoardError> {
    let value = value.trim();
    if let Some(ts) = Timestamp::parse_rfc3339(value) {
        return Ok(ts);
    }

    let naive = LOCAL_CUTOFF_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| {
            BoardError::configuration(format!(
                "cutoff '{value}' is not RFC 3339 or 'YYYY-MM-DD HH:MM'"
            ))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| Timestamp::from_utc(dt.with_timezone(&Utc)))
        .ok_or_else(|| {
            BoardError::configuration(format!("cutoff '{value}' does not exist in the local time zone"))
        })
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn utc(value: &str) -> Timestamp {
        Timestamp::parse_rfc3339(value).unwrap()
    }

    #[test]
    fn api_key_is_redacted_in_debug_output() {
        let key = ApiKey::new("ghp_secret").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(<redacted>)");
        assert_eq!(key.expose(), "ghp_secret");
        assert!(ApiKey::new("   ").is_none());
    }

    #[test]
    fn config_rejects_missing_organization_and_key() {
        let cutoff = utc("2024-03-01T12:00:00Z");

        let err = FetchConfig::new("  ", "Roadmap", "token", cutoff).unwrap_err();
        assert_eq!(err.kind(), "configuration");

        let err = FetchConfig::new("acme", "Roadmap", "", cutoff).unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn config_trims_operator_input() {
        let config =
            FetchConfig::new(" acme ", " Roadmap ", "token", utc("2024-03-01T12:00:00Z")).unwrap();
        assert_eq!(config.target.organization.as_str(), "acme");
        assert_eq!(config.target.project_name.as_str(), "Roadmap");
    }

    #[test]
    fn default_cutoff_is_noon_two_weeks_earlier() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        assert_eq!(default_cutoff(now), utc("2024-03-01T12:00:00Z"));
    }

    #[test]
    fn default_cutoff_uses_the_callers_zone() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = zone.with_ymd_and_hms(2024, 3, 15, 0, 30, 0).unwrap();
        assert_eq!(default_cutoff(now), utc("2024-03-01T10:00:00Z"));
    }

    #[rstest]
    #[case("2024-03-01T12:00:00Z", "2024-03-01T12:00:00Z")]
    #[case("2024-03-01T12:00:00+01:00", "2024-03-01T11:00:00Z")]
    #[case("2024-03-01 12:00", "2024-03-01T10:00:00Z")]
    #[case("2024-03-01T12:00", "2024-03-01T10:00:00Z")]
    #[case("2024-03-01 12:00:30", "2024-03-01T10:00:30Z")]
    fn parses_supported_cutoff_layouts(#[case] input: &str, #[case] expected: &str) {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(parse_cutoff(input, &zone).unwrap(), utc(expected));
    }

    #[rstest]
    #[case("")]
    #[case("last tuesday")]
    #[case("2024-13-01 12:00")]
    fn rejects_unparsable_cutoffs(#[case] input: &str) {
        let err = parse_cutoff(input, &Utc).unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }
}
