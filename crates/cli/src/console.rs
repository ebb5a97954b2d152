//! Console rendering of progress events.

use report::{Progress, ProgressEvent};

/// Prints one line per progress event to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn emit(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::OrgStarted { org } => {
                println!("fetching repositories for organization '{org}'");
            }
            ProgressEvent::ReposDiscovered { org, total } => {
                println!("{total} repositories found in '{org}'");
            }
            ProgressEvent::RepoStarted { index, total, repo } => {
                println!("[{index}/{total}] {repo}");
            }
            ProgressEvent::RepoEmpty { .. } => {
                println!("  no branches, skipping");
            }
            ProgressEvent::RepoSkipped { reason, .. } => {
                println!("  skipped: {reason}");
            }
            ProgressEvent::BranchStarted { branch, .. } => {
                println!("  branch {branch}");
            }
            ProgressEvent::BranchSkipped { branch, reason, .. } => {
                println!("  skipping branch '{branch}': {reason}");
            }
            ProgressEvent::RateLimitPause { after_repos, pause } => {
                println!(
                    "pausing {}s after {after_repos} repositories to respect rate limits",
                    pause.as_secs()
                );
            }
            ProgressEvent::RosterStarted { org } => {
                println!("fetching members of '{org}' for never-active detection");
            }
            ProgressEvent::RosterFetched { org, members } => {
                println!("{members} members in '{org}'");
            }
        }
    }
}
