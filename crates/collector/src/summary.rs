//! Per-run outcome aggregation.
//!
//! The skip policy is visible data rather than log side effects: every unit
//! the walk could not process is recorded here with its reason, and the CLI
//! decides how to present that.

use report::{BranchName, RepoName};

/// How one repository's walk ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoOutcome {
    /// Branches were enumerated and swept (some may still have been skipped
    /// individually).
    Collected {
        /// Number of branches swept.
        branches: usize,
    },
    /// The repository has no branches. Counted, not an error.
    Empty,
    /// Branch enumeration failed; the repository was skipped whole.
    Skipped {
        /// Why it was skipped.
        reason: String,
    },
}

/// One skipped unit of work and why it was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedUnit {
    /// The repository the unit belongs to.
    pub repo: RepoName,
    /// The skipped branch, or `None` when the whole repository was skipped.
    pub branch: Option<BranchName>,
    /// Human-readable reason (usually the exhausted API call).
    pub reason: String,
}

/// Aggregated outcome of one organization's walk.
///
/// Partial data is not flagged per report row; this summary is the record of
/// what the walk did and did not cover.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Repositories enumerated for the organization.
    pub repos_seen: usize,
    /// Repositories with zero branches.
    pub repos_empty: usize,
    /// Repositories skipped whole after a fetch failure.
    pub repos_skipped: Vec<SkippedUnit>,
    /// Branches skipped after a fetch failure.
    pub branches_skipped: Vec<SkippedUnit>,
    /// Activity observations fed into the ledger.
    pub events_recorded: usize,
    /// Rate-limit pauses taken during the walk.
    pub rate_limit_pauses: usize,
}

impl RunSummary {
    /// Total units (repositories and branches) skipped by failure.
    pub fn skipped_units(&self) -> usize {
        self.repos_skipped.len() + self.branches_skipped.len()
    }

    /// Returns `true` if every enumerated unit was fully processed.
    pub fn is_complete(&self) -> bool {
        self.skipped_units() == 0
    }
}
