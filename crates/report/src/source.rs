//! Port traits implemented by infrastructure.
//!
//! The orchestration layer walks organizations through [`OrgActivitySource`]
//! and paces itself through [`Delay`]. Production wires in the GraphQL-backed
//! implementations; tests inject in-memory fakes with zero real delay.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::ApiError;
use crate::identifiers::{BranchName, Cursor, OrgName, RepoName, UserLogin};
use crate::types::{ActivityEvent, Page, Timestamp};

/// Paginated access to one organization's repositories, activity signals, and
/// member roster.
///
/// Every method returns a single [`Page`]; callers drive the enumeration by
/// handing the returned cursor back. Implementations perform their own
/// transient-error retry; an `Err` here is final for that call, and the
/// caller decides which unit of work it sinks.
#[async_trait]
pub trait OrgActivitySource: Send + Sync {
    /// One page of the organization's repository names.
    async fn repositories(
        &self,
        org: &OrgName,
        cursor: Option<&Cursor>,
    ) -> Result<Page<RepoName>, ApiError>;

    /// One page of a repository's branch names.
    async fn branches(
        &self,
        org: &OrgName,
        repo: &RepoName,
        cursor: Option<&Cursor>,
    ) -> Result<Page<BranchName>, ApiError>;

    /// One page of commits authored on `branch` since `since`.
    ///
    /// Event timestamps are commit author dates. A branch that has vanished
    /// or has no commit target yields an empty terminal page, not an error.
    async fn commits_since(
        &self,
        org: &OrgName,
        repo: &RepoName,
        branch: &BranchName,
        since: Timestamp,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ActivityEvent>, ApiError>;

    /// One page of the repository's issues, most recently updated first.
    ///
    /// Event timestamps are last-update dates. The page may extend past any
    /// cutoff; the caller stops paginating when it has seen enough.
    async fn issues_updated(
        &self,
        org: &OrgName,
        repo: &RepoName,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ActivityEvent>, ApiError>;

    /// One page of the repository's pull requests in any state, most recently
    /// updated first.
    async fn pull_requests_updated(
        &self,
        org: &OrgName,
        repo: &RepoName,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ActivityEvent>, ApiError>;

    /// One page of the organization's member logins.
    async fn members(
        &self,
        org: &OrgName,
        cursor: Option<&Cursor>,
    ) -> Result<Page<UserLogin>, ApiError>;
}

// ---------------------------------------------------------------------------

/// An injectable pause.
///
/// Production implementations sleep on the async runtime; tests substitute a
/// recording no-op so retry and rate-limit behavior can be asserted without
/// real waiting.
#[async_trait]
pub trait Delay: Send + Sync {
    /// Suspends the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}
