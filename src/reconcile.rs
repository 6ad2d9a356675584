//! Find-or-create reconciliation of issues and milestones.
//!
//! Identity is the exact issue title and the exact milestone title. Every
//! invocation converges the remote state towards the submission: an absent
//! issue is created, an existing one is overwritten wholesale. Nothing here
//! merges or diffs remote content.

use tracing::{info, warn};

use crate::contract::{IssueTracker, IssueUpdate, MilestoneRef, NewIssue};
use crate::error::RemoteApiError;

/// The issue now carrying the submission's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledIssue {
    pub number: u64,
    pub node_id: String,
    /// Whether this invocation created the issue (as opposed to refreshing
    /// an existing one).
    pub created: bool,
}

/// Resolve a milestone title to a milestone, creating it when absent.
///
/// Concurrent invocations can race on creation: the tracker rejects the
/// duplicate title with a validation failure (422). The loser re-lists once
/// and adopts whatever milestone now carries the title.
pub async fn get_or_create_milestone<T: IssueTracker>(
    tracker: &T,
    repo: &str,
    title: &str,
) -> Result<MilestoneRef, RemoteApiError> {
    let milestones = tracker.list_milestones(repo).await?;
    if let Some(existing) = milestones.into_iter().find(|m| m.title == title) {
        info!(number = existing.number, title, "Milestone already exists");
        return Ok(existing);
    }

    match tracker.create_milestone(repo, title).await {
        Ok(created) => Ok(created),
        Err(e @ RemoteApiError::Status { status: 422, .. }) => {
            warn!(title, "Milestone creation rejected as duplicate, re-listing");
            let milestones = tracker.list_milestones(repo).await?;
            match milestones.into_iter().find(|m| m.title == title) {
                Some(existing) => {
                    info!(
                        number = existing.number,
                        "Adopted milestone created by concurrent invocation"
                    );
                    Ok(existing)
                }
                None => Err(e),
            }
        }
        Err(e) => Err(e),
    }
}

/// Converge the tracker on one issue for this title: find-or-create, then
/// set body, labels and milestone to exactly the given values.
pub async fn reconcile_issue<T: IssueTracker>(
    tracker: &T,
    repo: &str,
    title: &str,
    body: &str,
    labels: &[String],
    milestone_title: &str,
) -> Result<ReconciledIssue, RemoteApiError> {
    let milestone = get_or_create_milestone(tracker, repo, milestone_title).await?;

    match tracker.search_issue_by_title(repo, title).await? {
        Some(existing) => {
            let node_id = tracker
                .update_issue(
                    repo,
                    existing.number,
                    IssueUpdate {
                        body,
                        labels,
                        milestone: milestone.number,
                    },
                )
                .await?;
            info!(number = existing.number, "Refreshed existing issue");
            Ok(ReconciledIssue {
                number: existing.number,
                node_id,
                created: false,
            })
        }
        None => {
            let created = tracker
                .create_issue(
                    repo,
                    NewIssue {
                        title,
                        body,
                        labels,
                        milestone: milestone.number,
                    },
                )
                .await?;
            info!(number = created.number, "Created new issue");
            Ok(ReconciledIssue {
                number: created.number,
                node_id: created.node_id,
                created: true,
            })
        }
    }
}
