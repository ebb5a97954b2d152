//! Error and retry-policy types for the activity-report domain.
//!
//! [`ReportError`] covers conditions that stop a run (or one organization's
//! run) outright. [`ApiError`] is the recoverable-at-unit-scope failure that
//! crosses the infrastructure boundary: the orchestration layer decides
//! whether to skip the affected branch or repository and continue.
//!
//! [`RetryPolicy`] is a cross-cutting concern: any infrastructure error type
//! that participates in retry decisions must be able to produce one.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifiers::OrgName;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// Returned by infrastructure error types to let the page fetcher decide
/// whether to re-issue a request without escalating.
///
/// - `Retryable`: network faults, HTTP 5xx, rate-limit responses, malformed
///   or partial pages.
/// - `NonRetryable`: authentication failures, schema errors, unknown
///   organizations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The request may be re-issued.
    Retryable {
        /// Minimum back-off before the next attempt (e.g. derived from a
        /// `Retry-After` header). `None` means the caller applies its own
        /// back-off schedule.
        after: Option<Duration>,
    },
    /// The request must not be re-issued; the failure is surfaced as-is.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Unit-scope API failure
// ---------------------------------------------------------------------------

/// A paginated API call failed permanently (its retry budget is spent, or the
/// failure was not retryable).
///
/// Carries the query context so skip-and-continue handling can say *what* was
/// being fetched. Whether this aborts anything is the caller's decision: a
/// branch or repository fetch failure is skipped, a roster fetch failure
/// aborts the organization.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("'{query}' failed after {attempts} attempt(s): {message}")]
pub struct ApiError {
    /// Human-readable description of the query (e.g. `"commit history of
    /// acme/widgets@main"`).
    pub query: String,
    /// How many attempts were made before giving up.
    pub attempts: u32,
    /// Description of the final failure.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Run-level errors
// ---------------------------------------------------------------------------

/// Errors that stop a run, or one organization's portion of it.
///
/// These are distinct from [`ApiError`] in that no smaller unit can be
/// skipped to recover from them.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The inbound configuration is invalid.
    ///
    /// Raised before any API access; the run never starts with an invalid
    /// configuration.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The organization's member roster could not be fetched.
    ///
    /// Never-active detection is impossible without the roster, so the
    /// current organization's report is abandoned. Subsequent organizations
    /// in the same invocation still run.
    #[error("member roster for '{org}' unavailable: {source}")]
    RosterUnavailable {
        /// The organization whose roster fetch failed.
        org: OrgName,
        /// The underlying exhausted API call.
        source: ApiError,
    },
}
