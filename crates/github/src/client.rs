//! The [`report::OrgActivitySource`] implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use report::{
    ActivityEvent, ApiError, BranchName, Cursor, Delay, OrgActivitySource, OrgName, Page, RepoName,
    Timestamp, UserLogin,
};

use crate::fetch::{PageFetcher, RetryConfig, TokioDelay};
use crate::{queries, response};

/// Default endpoint of the GitHub GraphQL API.
pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

const USER_AGENT: &str = concat!("dormant/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// GraphQL-backed [`OrgActivitySource`].
///
/// One client is constructed per run and carries the shared HTTP session and
/// retry budget; nothing about it outlives the run.
#[derive(Debug)]
pub struct GithubClient {
    fetcher: PageFetcher,
}

impl GithubClient {
    /// Creates a client with the default retry bounds and a real Tokio delay.
    pub fn new(token: &str, endpoint: &str) -> Result<Self, reqwest::Error> {
        Self::with_retry(token, endpoint, RetryConfig::default(), Arc::new(TokioDelay))
    }

    /// Creates a client with explicit retry bounds and delay strategy.
    pub fn with_retry(
        token: &str,
        endpoint: &str,
        retry: RetryConfig,
        delay: Arc<dyn Delay>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            fetcher: PageFetcher::new(http, endpoint, token, retry, delay),
        })
    }
}

fn cursor_var(cursor: Option<&Cursor>) -> serde_json::Value {
    match cursor {
        Some(c) => json!(c.as_str()),
        None => serde_json::Value::Null,
    }
}

#[async_trait]
impl OrgActivitySource for GithubClient {
    async fn repositories(
        &self,
        org: &OrgName,
        cursor: Option<&Cursor>,
    ) -> Result<Page<RepoName>, ApiError> {
        let context = format!("repositories of {org}");
        let vars = json!({ "org": org.as_str(), "cursor": cursor_var(cursor) });
        let data: response::RepositoriesData = self
            .fetcher
            .run(&context, queries::REPOSITORIES, vars)
            .await?;
        Ok(data.into_page())
    }

    async fn branches(
        &self,
        org: &OrgName,
        repo: &RepoName,
        cursor: Option<&Cursor>,
    ) -> Result<Page<BranchName>, ApiError> {
        let context = format!("branches of {org}/{repo}");
        let vars = json!({
            "org": org.as_str(),
            "repo": repo.as_str(),
            "cursor": cursor_var(cursor),
        });
        let data: response::BranchesData =
            self.fetcher.run(&context, queries::BRANCHES, vars).await?;
        Ok(data.into_page())
    }

    async fn commits_since(
        &self,
        org: &OrgName,
        repo: &RepoName,
        branch: &BranchName,
        since: Timestamp,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ActivityEvent>, ApiError> {
        let context = format!("commit history of {org}/{repo}@{branch}");
        let vars = json!({
            "org": org.as_str(),
            "repo": repo.as_str(),
            "branch": branch.as_str(),
            "since": since.as_datetime().to_rfc3339(),
            "cursor": cursor_var(cursor),
        });
        let data: response::CommitHistoryData = self
            .fetcher
            .run(&context, queries::COMMIT_HISTORY, vars)
            .await?;
        Ok(data.into_page())
    }

    async fn issues_updated(
        &self,
        org: &OrgName,
        repo: &RepoName,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ActivityEvent>, ApiError> {
        let context = format!("issues of {org}/{repo}");
        let vars = json!({
            "org": org.as_str(),
            "repo": repo.as_str(),
            "cursor": cursor_var(cursor),
        });
        let data: response::IssuesData =
            self.fetcher.run(&context, queries::ISSUES, vars).await?;
        Ok(data.into_page())
    }

    async fn pull_requests_updated(
        &self,
        org: &OrgName,
        repo: &RepoName,
        cursor: Option<&Cursor>,
    ) -> Result<Page<ActivityEvent>, ApiError> {
        let context = format!("pull requests of {org}/{repo}");
        let vars = json!({
            "org": org.as_str(),
            "repo": repo.as_str(),
            "cursor": cursor_var(cursor),
        });
        let data: response::PullRequestsData = self
            .fetcher
            .run(&context, queries::PULL_REQUESTS, vars)
            .await?;
        Ok(data.into_page())
    }

    async fn members(
        &self,
        org: &OrgName,
        cursor: Option<&Cursor>,
    ) -> Result<Page<UserLogin>, ApiError> {
        let context = format!("members of {org}");
        let vars = json!({ "org": org.as_str(), "cursor": cursor_var(cursor) });
        let data: response::MembersData =
            self.fetcher.run(&context, queries::MEMBERS, vars).await?;
        Ok(data.into_page())
    }
}
