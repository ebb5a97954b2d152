//! The organization walk.
//!
//! Enumerates repositories, then branches, then sweeps each branch's three
//! activity signals (commits, issues, pull requests) into the ledger. The
//! branch is the failure-isolation boundary: a branch whose sweep fails is
//! skipped with its reason recorded, and the walk continues. A repository
//! whose branch enumeration fails is likewise skipped whole. Only the
//! initial repository enumeration is fatal for the organization, since
//! without it there is nothing to walk.

use report::{
    ActivityLedger, ApiError, BranchName, Cursor, OrgActivitySource, OrgName, Page, Progress,
    ProgressEvent, RepoName, Timestamp,
};
use tracing::{info, warn};

use crate::limiter::RateLimiter;
use crate::summary::{RepoOutcome, RunSummary, SkippedUnit};

/// Walks one organization and feeds every observation into a ledger.
pub struct ActivityCollector<'a> {
    source: &'a dyn OrgActivitySource,
    progress: &'a dyn Progress,
    limiter: RateLimiter,
}

impl<'a> ActivityCollector<'a> {
    /// Creates a collector over an injected source, progress sink, and
    /// limiter.
    pub fn new(
        source: &'a dyn OrgActivitySource,
        progress: &'a dyn Progress,
        limiter: RateLimiter,
    ) -> Self {
        Self {
            source,
            progress,
            limiter,
        }
    }

    /// Collects all activity since `cutoff` for `org` into `ledger`.
    ///
    /// Returns the walk's [`RunSummary`]. Fails only if the repository list
    /// itself cannot be fetched; every smaller failure is recorded in the
    /// summary and skipped.
    pub async fn collect(
        &mut self,
        org: &OrgName,
        cutoff: Timestamp,
        ledger: &mut ActivityLedger,
    ) -> Result<RunSummary, ApiError> {
        self.progress
            .emit(&ProgressEvent::OrgStarted { org: org.clone() });

        let repos = self.enumerate_repositories(org).await?;
        self.progress.emit(&ProgressEvent::ReposDiscovered {
            org: org.clone(),
            total: repos.len(),
        });
        info!(org = %org, repos = repos.len(), "repository enumeration complete");

        let mut summary = RunSummary {
            repos_seen: repos.len(),
            ..RunSummary::default()
        };

        let total = repos.len();
        for (index, repo) in repos.iter().enumerate() {
            self.progress.emit(&ProgressEvent::RepoStarted {
                index: index + 1,
                total,
                repo: repo.clone(),
            });

            match self
                .walk_repository(org, repo, cutoff, ledger, &mut summary)
                .await
            {
                RepoOutcome::Collected { .. } => {}
                RepoOutcome::Empty => {
                    summary.repos_empty += 1;
                    self.progress
                        .emit(&ProgressEvent::RepoEmpty { repo: repo.clone() });
                }
                RepoOutcome::Skipped { reason } => {
                    warn!(org = %org, repo = %repo, %reason, "repository skipped");
                    self.progress.emit(&ProgressEvent::RepoSkipped {
                        repo: repo.clone(),
                        reason: reason.clone(),
                    });
                    summary.repos_skipped.push(SkippedUnit {
                        repo: repo.clone(),
                        branch: None,
                        reason,
                    });
                }
            }

            if let Some(pause) = self.limiter.tick().await {
                summary.rate_limit_pauses += 1;
                self.progress.emit(&ProgressEvent::RateLimitPause {
                    after_repos: index + 1,
                    pause,
                });
            }
        }

        Ok(summary)
    }

    /// Walks one repository; failures below branch enumeration are folded
    /// into `summary` rather than returned.
    async fn walk_repository(
        &self,
        org: &OrgName,
        repo: &RepoName,
        cutoff: Timestamp,
        ledger: &mut ActivityLedger,
        summary: &mut RunSummary,
    ) -> RepoOutcome {
        let branches = match self.enumerate_branches(org, repo).await {
            Ok(branches) => branches,
            Err(err) => {
                return RepoOutcome::Skipped {
                    reason: err.to_string(),
                }
            }
        };

        if branches.is_empty() {
            return RepoOutcome::Empty;
        }

        let count = branches.len();
        for branch in branches {
            self.progress.emit(&ProgressEvent::BranchStarted {
                repo: repo.clone(),
                branch: branch.clone(),
            });
            match self
                .sweep_branch(org, repo, &branch, cutoff, ledger)
                .await
            {
                Ok(events) => summary.events_recorded += events,
                Err(err) => {
                    let reason = err.to_string();
                    warn!(org = %org, repo = %repo, branch = %branch, %reason, "branch skipped");
                    self.progress.emit(&ProgressEvent::BranchSkipped {
                        repo: repo.clone(),
                        branch: branch.clone(),
                        reason: reason.clone(),
                    });
                    summary.branches_skipped.push(SkippedUnit {
                        repo: repo.clone(),
                        branch: Some(branch.clone()),
                        reason,
                    });
                }
            }
        }

        RepoOutcome::Collected { branches: count }
    }

    /// Sweeps one branch's three signals into the ledger, returning how many
    /// observations were fed.
    async fn sweep_branch(
        &self,
        org: &OrgName,
        repo: &RepoName,
        branch: &BranchName,
        cutoff: Timestamp,
        ledger: &mut ActivityLedger,
    ) -> Result<usize, ApiError> {
        let mut fed = 0;

        // Commits are filtered server-side by the cutoff.
        let mut cursor: Option<Cursor> = None;
        loop {
            let page = self
                .source
                .commits_since(org, repo, branch, cutoff, cursor.as_ref())
                .await?;
            fed += Self::feed(ledger, &page);
            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        // Issues and pull requests arrive newest-update first; stop fetching
        // once a page's tail predates the cutoff. Events already fetched are
        // still fed regardless of age; the classifier decides what they mean.
        let mut cursor: Option<Cursor> = None;
        loop {
            let page = self
                .source
                .issues_updated(org, repo, cursor.as_ref())
                .await?;
            fed += Self::feed(ledger, &page);
            if Self::exhausted(&page, cutoff) {
                break;
            }
            cursor = page.next;
        }

        let mut cursor: Option<Cursor> = None;
        loop {
            let page = self
                .source
                .pull_requests_updated(org, repo, cursor.as_ref())
                .await?;
            fed += Self::feed(ledger, &page);
            if Self::exhausted(&page, cutoff) {
                break;
            }
            cursor = page.next;
        }

        Ok(fed)
    }

    fn feed(ledger: &mut ActivityLedger, page: &Page<report::ActivityEvent>) -> usize {
        for event in &page.items {
            ledger.record_event(event.clone());
        }
        page.items.len()
    }

    fn exhausted(page: &Page<report::ActivityEvent>, cutoff: Timestamp) -> bool {
        page.next.is_none()
            || page
                .items
                .last()
                .is_some_and(|event| event.timestamp < cutoff)
    }

    async fn enumerate_repositories(&self, org: &OrgName) -> Result<Vec<RepoName>, ApiError> {
        let mut repos = Vec::new();
        let mut cursor: Option<Cursor> = None;
        loop {
            let page = self.source.repositories(org, cursor.as_ref()).await?;
            repos.extend(page.items);
            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(repos)
    }

    async fn enumerate_branches(
        &self,
        org: &OrgName,
        repo: &RepoName,
    ) -> Result<Vec<BranchName>, ApiError> {
        let mut branches = Vec::new();
        let mut cursor: Option<Cursor> = None;
        loop {
            let page = self.source.branches(org, repo, cursor.as_ref()).await?;
            branches.extend(page.items);
            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(branches)
    }
}
