//! Observational progress events.
//!
//! The collector narrates its walk through these events so a console (or any
//! other sink) can render progress. Events never affect control flow; a sink
//! that ignores everything is a valid implementation.

use std::time::Duration;

use crate::identifiers::{BranchName, OrgName, RepoName};

/// One step of a report run, as seen from the outside.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Repository enumeration for an organization has begun.
    OrgStarted {
        /// The organization being processed.
        org: OrgName,
    },
    /// Repository enumeration finished.
    ReposDiscovered {
        /// The organization being processed.
        org: OrgName,
        /// How many repositories will be walked.
        total: usize,
    },
    /// One repository's walk has begun.
    RepoStarted {
        /// 1-based position within the organization.
        index: usize,
        /// Total repositories in the organization.
        total: usize,
        /// The repository being walked.
        repo: RepoName,
    },
    /// A repository had no branches and was skipped.
    RepoEmpty {
        /// The branchless repository.
        repo: RepoName,
    },
    /// A repository was skipped after a fetch failure.
    RepoSkipped {
        /// The skipped repository.
        repo: RepoName,
        /// Why it was skipped.
        reason: String,
    },
    /// One branch's activity sweep has begun.
    BranchStarted {
        /// The repository the branch belongs to.
        repo: RepoName,
        /// The branch being swept.
        branch: BranchName,
    },
    /// A branch was skipped after a fetch failure.
    BranchSkipped {
        /// The repository the branch belongs to.
        repo: RepoName,
        /// The skipped branch.
        branch: BranchName,
        /// Why it was skipped.
        reason: String,
    },
    /// The rate limiter paused the walk.
    RateLimitPause {
        /// Repositories processed so far when the pause triggered.
        after_repos: usize,
        /// How long the walk pauses.
        pause: Duration,
    },
    /// The member roster fetch has begun.
    RosterStarted {
        /// The organization whose roster is being fetched.
        org: OrgName,
    },
    /// The member roster fetch finished.
    RosterFetched {
        /// The organization whose roster was fetched.
        org: OrgName,
        /// Number of members in the roster.
        members: usize,
    },
}

/// A sink for [`ProgressEvent`]s.
pub trait Progress: Send + Sync {
    /// Receives one event. Must not block for long and must not fail.
    fn emit(&self, event: &ProgressEvent);
}

/// A sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl Progress for SilentProgress {
    fn emit(&self, _event: &ProgressEvent) {}
}
