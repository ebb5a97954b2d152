//! Shared value types for the activity-report domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (e.g. thresholds are strictly positive
//! day counts) and participate in domain computations.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ReportError;
use crate::identifiers::{Cursor, OrgName, UserLogin};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses an RFC 3339 date-time string (the remote API's wire format).
    ///
    /// Returns `None` if the string is not a valid RFC 3339 date-time.
    #[must_use]
    pub fn parse_rfc3339(value: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Formats this timestamp as a `DD-MM-YYYY` report date.
    pub fn report_date(self) -> String {
        self.0.format("%d-%m-%Y").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

// ---------------------------------------------------------------------------

/// The configured activity threshold, in whole days.
///
/// Defines both the cutoff date for activity collection (`now − threshold`)
/// and the active/inactive boundary during classification. Always strictly
/// positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold(u32);

impl Threshold {
    /// The default threshold applied when none is configured.
    pub const DEFAULT_DAYS: u32 = 60;

    /// Creates a [`Threshold`], returning `None` if `days` is zero.
    #[must_use]
    pub fn new(days: u32) -> Option<Self> {
        if days == 0 {
            None
        } else {
            Some(Self(days))
        }
    }

    /// Returns the threshold as a day count.
    pub fn as_days(self) -> u32 {
        self.0
    }

    /// Returns the collection cutoff: `now` minus this many days.
    pub fn cutoff_from(self, now: Timestamp) -> Timestamp {
        Timestamp(now.0 - Duration::days(i64::from(self.0)))
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(Self::DEFAULT_DAYS)
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} days", self.0)
    }
}

// ---------------------------------------------------------------------------
// Activity observations
// ---------------------------------------------------------------------------

/// The source kind of an observed activity event.
///
/// All kinds are treated identically by the ledger; the merge cares only
/// about "latest across any kind". The kind is carried for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// A commit authored on some branch.
    Commit,
    /// An issue created or updated.
    Issue,
    /// A pull request created or updated.
    PullRequest,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Commit => "commit",
            Self::Issue => "issue",
            Self::PullRequest => "pull-request",
        };
        write!(f, "{label}")
    }
}

// ---------------------------------------------------------------------------

/// A single observed action attributable to a user at a point in time.
///
/// Events are transient: they are consumed into the [`crate::ActivityLedger`]
/// as they arrive and never retained individually. Records without an
/// identifiable author never become events; they are dropped at the
/// infrastructure boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// The user the action is attributed to.
    pub user: UserLogin,
    /// When the action happened (author date for commits, last-update date
    /// for issues and pull requests).
    pub timestamp: Timestamp,
    /// Which source the action was observed through.
    pub kind: ActivityKind,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// One page of items from a paginated remote query.
///
/// `next` is `Some` while further pages remain; handing it back to the same
/// query continues the enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Every item of the current page.
    pub items: Vec<T>,
    /// Continuation cursor, or `None` when the enumeration is exhausted.
    pub next: Option<Cursor>,
}

impl<T> Page<T> {
    /// Creates a terminal page carrying `items` and no continuation.
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }

    /// Creates an empty terminal page.
    pub fn empty() -> Self {
        Self::last(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// Report rows
// ---------------------------------------------------------------------------

/// Final classification of one user for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityStatus {
    /// Last activity within the threshold window.
    Active,
    /// Activity recorded, but none within the threshold window.
    Inactive,
    /// A roster member with zero recorded activity across all sources.
    NeverActive,
}

impl ActivityStatus {
    /// Returns the value written to the report's `active` column.
    pub fn report_value(self) -> &'static str {
        match self {
            Self::Active => "true",
            Self::Inactive => "false",
            Self::NeverActive => "never-active",
        }
    }
}

// ---------------------------------------------------------------------------

/// One row of the final per-organization report.
///
/// Rows are assembled once at the end of a run, one per user appearing in
/// either the ledger or the roster, then written out and discarded. No state
/// crosses runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// The user this row describes.
    pub user: UserLogin,
    /// Latest observed activity, or `None` for never-active users.
    pub last_activity: Option<Timestamp>,
    /// The classified status.
    pub status: ActivityStatus,
}

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Validated configuration for one CLI invocation.
///
/// Construction is the configuration boundary: a [`RunConfig`] that exists is
/// valid, and no API access happens before one exists.
#[derive(Clone)]
pub struct RunConfig {
    token: String,
    organizations: Vec<OrgName>,
    threshold: Threshold,
}

impl RunConfig {
    /// Validates raw configuration values into a [`RunConfig`].
    ///
    /// Fails if the token is empty or no organization names remain after
    /// trimming.
    pub fn new(
        token: impl Into<String>,
        organizations: Vec<OrgName>,
        threshold: Threshold,
    ) -> Result<Self, ReportError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ReportError::Configuration {
                message: "API token is missing or empty".to_string(),
            });
        }
        if organizations.is_empty() {
            return Err(ReportError::Configuration {
                message: "no organization names configured".to_string(),
            });
        }
        Ok(Self {
            token,
            organizations,
            threshold,
        })
    }

    /// Returns the API credential.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the organizations to process, in configured order.
    pub fn organizations(&self) -> &[OrgName] {
        &self.organizations
    }

    /// Returns the configured activity threshold.
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }
}

// The token never appears in logs or panics.
impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("token", &"<redacted>")
            .field("organizations", &self.organizations)
            .field("threshold", &self.threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32) -> Timestamp {
        Timestamp::from_utc(Utc.with_ymd_and_hms(y, mo, d, 12, 0, 0).unwrap())
    }

    #[test]
    fn threshold_rejects_zero() {
        assert!(Threshold::new(0).is_none());
        assert_eq!(Threshold::default().as_days(), 60);
    }

    #[test]
    fn cutoff_subtracts_whole_days() {
        let now = at(2024, 3, 31);
        let cutoff = Threshold::new(30).unwrap().cutoff_from(now);
        assert_eq!(cutoff, at(2024, 3, 1));
    }

    #[test]
    fn timestamp_parses_remote_wire_format() {
        let ts = Timestamp::parse_rfc3339("2024-05-03T12:00:00Z").unwrap();
        assert_eq!(ts.report_date(), "03-05-2024");
        assert!(Timestamp::parse_rfc3339("yesterday").is_none());
    }

    #[test]
    fn run_config_rejects_missing_inputs() {
        let org = OrgName::new("acme").unwrap();
        assert!(RunConfig::new("", vec![org.clone()], Threshold::default()).is_err());
        assert!(RunConfig::new("tok", Vec::new(), Threshold::default()).is_err());
        assert!(RunConfig::new("tok", vec![org], Threshold::default()).is_ok());
    }

    #[test]
    fn token_is_redacted_in_debug_output() {
        let cfg = RunConfig::new(
            "ghp_secret",
            vec![OrgName::new("acme").unwrap()],
            Threshold::default(),
        )
        .unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("ghp_secret"));
    }
}
