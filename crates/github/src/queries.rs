//! GraphQL documents.
//!
//! Each document fetches one page of 100 items and the page info needed to
//! continue. Issues and pull requests are ordered by update time, newest
//! first, so callers can stop paginating once a page falls behind their
//! cutoff; commit history filters server-side via `$since`.

pub(crate) const REPOSITORIES: &str = r#"
query($org: String!, $cursor: String) {
  organization(login: $org) {
    repositories(first: 100, after: $cursor) {
      nodes { name }
      pageInfo { hasNextPage endCursor }
    }
  }
}
"#;

pub(crate) const BRANCHES: &str = r#"
query($org: String!, $repo: String!, $cursor: String) {
  repository(owner: $org, name: $repo) {
    refs(refPrefix: "refs/heads/", first: 100, after: $cursor) {
      nodes { name }
      pageInfo { hasNextPage endCursor }
    }
  }
}
"#;

pub(crate) const COMMIT_HISTORY: &str = r#"
query($org: String!, $repo: String!, $branch: String!, $since: GitTimestamp!, $cursor: String) {
  repository(owner: $org, name: $repo) {
    ref(qualifiedName: $branch) {
      target {
        ... on Commit {
          history(first: 100, after: $cursor, since: $since) {
            nodes { author { user { login } date } }
            pageInfo { hasNextPage endCursor }
          }
        }
      }
    }
  }
}
"#;

pub(crate) const ISSUES: &str = r#"
query($org: String!, $repo: String!, $cursor: String) {
  repository(owner: $org, name: $repo) {
    issues(first: 100, after: $cursor, orderBy: {field: UPDATED_AT, direction: DESC}) {
      nodes { author { login } updatedAt }
      pageInfo { hasNextPage endCursor }
    }
  }
}
"#;

pub(crate) const PULL_REQUESTS: &str = r#"
query($org: String!, $repo: String!, $cursor: String) {
  repository(owner: $org, name: $repo) {
    pullRequests(states: [OPEN, CLOSED, MERGED], first: 100, after: $cursor, orderBy: {field: UPDATED_AT, direction: DESC}) {
      nodes { author { login } updatedAt }
      pageInfo { hasNextPage endCursor }
    }
  }
}
"#;

pub(crate) const MEMBERS: &str = r#"
query($org: String!, $cursor: String) {
  organization(login: $org) {
    membersWithRole(first: 100, after: $cursor) {
      nodes { login }
      pageInfo { hasNextPage endCursor }
    }
  }
}
"#;
