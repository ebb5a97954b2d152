//! Roster reconciliation.
//!
//! Turns the ledger plus the organization's member roster into the final
//! report rows. Membership is not a filter for inclusion: external
//! contributors present in the ledger are reported with their computed
//! status. Membership only drives never-active detection, since a member
//! the walk never observed must still appear in the report.

use report::{
    classify, ActivityLedger, ActivityStatus, Cursor, OrgActivitySource, OrgName, Progress,
    ProgressEvent, ReportError, ReportRow, Threshold, Timestamp, UserLogin,
};
use tracing::info;

/// Merges the member roster with the ledger and classifies every user.
pub struct RosterReconciler<'a> {
    source: &'a dyn OrgActivitySource,
    progress: &'a dyn Progress,
}

impl<'a> RosterReconciler<'a> {
    /// Creates a reconciler over an injected source and progress sink.
    pub fn new(source: &'a dyn OrgActivitySource, progress: &'a dyn Progress) -> Self {
        Self { source, progress }
    }

    /// Produces the report rows for `org`: one per user in ledger ∪ roster.
    ///
    /// Users with recorded activity come first, in ledger insertion order;
    /// never-active members follow, sorted by login. A roster fetch failure
    /// abandons this organization's report.
    pub async fn reconcile(
        &self,
        org: &OrgName,
        ledger: &ActivityLedger,
        threshold: Threshold,
        now: Timestamp,
    ) -> Result<Vec<ReportRow>, ReportError> {
        self.progress
            .emit(&ProgressEvent::RosterStarted { org: org.clone() });

        let members = self.enumerate_members(org).await.map_err(|source| {
            ReportError::RosterUnavailable {
                org: org.clone(),
                source,
            }
        })?;

        self.progress.emit(&ProgressEvent::RosterFetched {
            org: org.clone(),
            members: members.len(),
        });
        info!(org = %org, members = members.len(), tracked = ledger.len(), "roster fetched");

        let mut rows: Vec<ReportRow> = ledger
            .iter()
            .map(|(user, last)| ReportRow {
                user: user.clone(),
                last_activity: Some(last),
                status: classify(Some(last), threshold, now),
            })
            .collect();

        let mut never_active: Vec<UserLogin> = members
            .into_iter()
            .filter(|member| !ledger.contains(member))
            .collect();
        never_active.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        never_active.dedup();

        rows.extend(never_active.into_iter().map(|user| ReportRow {
            user,
            last_activity: None,
            status: ActivityStatus::NeverActive,
        }));

        Ok(rows)
    }

    async fn enumerate_members(&self, org: &OrgName) -> Result<Vec<UserLogin>, report::ApiError> {
        let mut members = Vec::new();
        let mut cursor: Option<Cursor> = None;
        loop {
            let page = self.source.members(org, cursor.as_ref()).await?;
            members.extend(page.items);
            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(members)
    }
}
