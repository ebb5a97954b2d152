//! Typed page records.
//!
//! Every query's `data` shape is deserialised into one of these structs at
//! the fetcher boundary and converted into a domain [`Page`] here. Records
//! missing required fields are dropped during conversion; nothing loosely
//! typed travels inward.
//!
//! A vanished repository or branch (`repository`/`ref` resolving to null)
//! converts to an empty terminal page rather than an error: the walk simply
//! finds nothing there.

use serde::Deserialize;

use report::{ActivityEvent, ActivityKind, BranchName, Cursor, Page, RepoName, Timestamp, UserLogin};

// ---------------------------------------------------------------------------
// Shared connection plumbing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

impl PageInfo {
    fn next(&self) -> Option<Cursor> {
        if self.has_next_page {
            self.end_cursor.as_deref().and_then(Cursor::new)
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Connection<T> {
    // Individual nodes may be null (e.g. items deleted mid-pagination).
    nodes: Vec<Option<T>>,
    page_info: PageInfo,
}

impl<T> Connection<T> {
    fn into_page<U>(self, convert: impl Fn(T) -> Option<U>) -> Page<U> {
        let next = self.page_info.next();
        let items = self.nodes.into_iter().flatten().filter_map(convert).collect();
        Page { items, next }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedNode {
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActorNode {
    login: String,
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoriesData {
    organization: RepositoriesOrg,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoriesOrg {
    repositories: Connection<NamedNode>,
}

impl RepositoriesData {
    pub(crate) fn into_page(self) -> Page<RepoName> {
        self.organization
            .repositories
            .into_page(|node| RepoName::new(node.name))
    }
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct BranchesData {
    repository: Option<BranchesRepo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BranchesRepo {
    refs: Option<Connection<NamedNode>>,
}

impl BranchesData {
    pub(crate) fn into_page(self) -> Page<BranchName> {
        match self.repository.and_then(|r| r.refs) {
            Some(refs) => refs.into_page(|node| BranchName::new(node.name)),
            None => Page::empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Commit history
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct CommitHistoryData {
    repository: Option<CommitHistoryRepo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitHistoryRepo {
    #[serde(rename = "ref")]
    git_ref: Option<CommitHistoryRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitHistoryRef {
    target: Option<CommitHistoryTarget>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitHistoryTarget {
    // Absent when the ref points at something other than a commit.
    history: Option<Connection<CommitNode>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitNode {
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitAuthor {
    user: Option<ActorNode>,
    date: Option<String>,
}

impl CommitHistoryData {
    pub(crate) fn into_page(self) -> Page<ActivityEvent> {
        let history = self
            .repository
            .and_then(|r| r.git_ref)
            .and_then(|r| r.target)
            .and_then(|t| t.history);
        match history {
            Some(history) => history.into_page(|node| {
                // Anonymous commits (no linked account) carry no attribution.
                let author = node.author?;
                let user = UserLogin::new(author.user?.login)?;
                let timestamp = Timestamp::parse_rfc3339(author.date?.as_str())?;
                Some(ActivityEvent {
                    user,
                    timestamp,
                    kind: ActivityKind::Commit,
                })
            }),
            None => Page::empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Issues and pull requests
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdatedNode {
    author: Option<ActorNode>,
    updated_at: Option<String>,
}

impl UpdatedNode {
    fn into_event(self, kind: ActivityKind) -> Option<ActivityEvent> {
        let user = UserLogin::new(self.author?.login)?;
        let timestamp = Timestamp::parse_rfc3339(self.updated_at?.as_str())?;
        Some(ActivityEvent {
            user,
            timestamp,
            kind,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssuesData {
    repository: Option<IssuesRepo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssuesRepo {
    issues: Connection<UpdatedNode>,
}

impl IssuesData {
    pub(crate) fn into_page(self) -> Page<ActivityEvent> {
        match self.repository {
            Some(repo) => repo
                .issues
                .into_page(|node| node.into_event(ActivityKind::Issue)),
            None => Page::empty(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PullRequestsData {
    repository: Option<PullRequestsRepo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PullRequestsRepo {
    pull_requests: Connection<UpdatedNode>,
}

impl PullRequestsData {
    pub(crate) fn into_page(self) -> Page<ActivityEvent> {
        match self.repository {
            Some(repo) => repo
                .pull_requests
                .into_page(|node| node.into_event(ActivityKind::PullRequest)),
            None => Page::empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MembersData {
    organization: MembersOrg,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MembersOrg {
    members_with_role: Connection<ActorNode>,
}

impl MembersData {
    pub(crate) fn into_page(self) -> Page<UserLogin> {
        self.organization
            .members_with_role
            .into_page(|node| UserLogin::new(node.login))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_page_drops_unattributable_records() {
        let data: CommitHistoryData = serde_json::from_value(serde_json::json!({
            "repository": { "ref": { "target": { "history": {
                "nodes": [
                    { "author": { "user": { "login": "alice" }, "date": "2024-05-03T12:00:00Z" } },
                    { "author": { "user": null, "date": "2024-05-04T12:00:00Z" } },
                    { "author": null },
                    null
                ],
                "pageInfo": { "hasNextPage": false, "endCursor": null }
            }}}}
        }))
        .unwrap();

        let page = data.into_page();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].user.as_str(), "alice");
        assert_eq!(page.items[0].kind, ActivityKind::Commit);
        assert!(page.next.is_none());
    }

    #[test]
    fn vanished_branch_becomes_an_empty_page() {
        let data: CommitHistoryData =
            serde_json::from_value(serde_json::json!({ "repository": { "ref": null } })).unwrap();
        let page = data.into_page();
        assert!(page.items.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn continuation_cursor_survives_conversion() {
        let data: RepositoriesData = serde_json::from_value(serde_json::json!({
            "organization": { "repositories": {
                "nodes": [ { "name": "widgets" }, { "name": "gizmos" } ],
                "pageInfo": { "hasNextPage": true, "endCursor": "abc123" }
            }}
        }))
        .unwrap();

        let page = data.into_page();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next.unwrap().as_str(), "abc123");
    }
}
