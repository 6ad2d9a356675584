//! Coordinating module for the validate-route-reconcile-relocate pipeline.
//!
//! One invocation handles one uploaded file and always drives it to a
//! terminal state: skipped, success, invalid or failed. Failures after the
//! intake filter notify the channel and park the file under the invalid
//! prefix; only a broken trigger document or a failed parking relocation
//! escalates to the platform as a handler error, which is what makes
//! redelivery safe.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::contract::{IssueTracker, Notifier, ObjectStore};
use crate::error::{HandlerError, LoadError};
use crate::event::StorageEvent;
use crate::reconcile::reconcile_issue;
use crate::storage::relocate;
use crate::submission::{build_issue_body, validate, Submission};

/// Terminal outcome of one invocation, reported to the platform as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The key fell outside the intake rules; nothing was touched.
    Skipped,
    /// The submission is now a tracked issue and the file is archived.
    Success { repo: String, issue_number: u64 },
    /// The file never qualified (unreadable, invalid fields or unknown tag)
    /// and was parked.
    Invalid { error: String },
    /// The file qualified but tracker work or archiving failed; it was
    /// parked for replay.
    Failed { error: String },
}

/// Handle one trigger event end to end.
pub async fn handle_event<S, T, N>(
    settings: &Settings,
    store: &S,
    tracker: &T,
    notifier: &N,
    event: &StorageEvent,
) -> Result<Outcome, HandlerError>
where
    S: ObjectStore,
    T: IssueTracker,
    N: Notifier,
{
    let record = event.primary()?;
    let container = record.container.as_str();
    let key = record.key.as_str();

    // Step 0: intake filter. Non-matching keys are someone else's files.
    if !settings.intake.matches(key) {
        info!(key, "[INTAKE] Key outside intake rules, skipping");
        return Ok(Outcome::Skipped);
    }

    info!(container, key, "[INTAKE] Handling submission file");

    // Step 1: load and parse.
    let submission = match load_submission(store, container, key).await {
        Ok(submission) => submission,
        Err(e) => {
            error!(error = %e, key, "[INTAKE][ERROR] Submission file could not be loaded");
            let message = format!("Invalid submission file: {key}\nError: {e}");
            park(settings, store, notifier, container, key, &message).await?;
            return Ok(Outcome::Invalid {
                error: e.to_string(),
            });
        }
    };

    // Step 2: validate required fields, all at once.
    if let Err(e) = validate(&submission) {
        error!(error = %e, key, "[INTAKE][ERROR] Submission failed validation");
        let message = format!("Invalid submission file: {key}\nError: {e}");
        park(settings, store, notifier, container, key, &message).await?;
        return Ok(Outcome::Invalid {
            error: e.to_string(),
        });
    }

    // Step 3: route by normalised tag.
    let tag = submission.routing_tag();
    let target = match settings.routing.route(&tag) {
        Ok(target) => target,
        Err(e) => {
            error!(tag = %tag, key, "[INTAKE][ERROR] No route for tag");
            let message = format!("Invalid tag in submission file: {key}\nError: {e}");
            park(settings, store, notifier, container, key, &message).await?;
            return Ok(Outcome::Invalid {
                error: e.to_string(),
            });
        }
    };
    info!(
        tag = %tag,
        repo = %target.repo,
        project_id = %target.project_id,
        "[INTAKE] Routed submission"
    );

    // Step 4: reconcile issue and milestone on the tracker.
    let body = build_issue_body(&submission);
    let labels = vec![submission.author.clone(), tag.clone()];
    let issue = match reconcile_issue(
        tracker,
        &target.repo,
        &submission.title,
        &body,
        &labels,
        &submission.target_quarter,
    )
    .await
    {
        Ok(issue) => issue,
        Err(e) => {
            error!(error = %e, key, "[INTAKE][ERROR] Issue reconciliation failed");
            let message = format!("Error processing file: {key}\nError: {e}");
            park(settings, store, notifier, container, key, &message).await?;
            return Ok(Outcome::Failed {
                error: e.to_string(),
            });
        }
    };
    info!(
        number = issue.number,
        created = issue.created,
        "[INTAKE] Issue reconciled"
    );

    // Step 5: link the issue onto the project board. The issue mutation is
    // not rolled back on failure; the next replay converges it again.
    if let Err(e) = tracker.link_to_project(&issue.node_id, &target.project_id).await {
        error!(error = %e, key, "[INTAKE][ERROR] Project link failed");
        let message = format!("Error processing file: {key}\nError: {e}");
        park(settings, store, notifier, container, key, &message).await?;
        return Ok(Outcome::Failed {
            error: e.to_string(),
        });
    }
    info!(project_id = %target.project_id, "[INTAKE] Issue linked to project");

    // Step 6: archive the file. The tracker already holds the issue, so a
    // failure here still ends in the invalid area, not a crash loop.
    match relocate(store, container, key, &settings.intake.processed_prefix).await {
        Ok(dest_key) => {
            info!(dest_key = %dest_key, "[INTAKE] Submission archived as processed");
            Ok(Outcome::Success {
                repo: target.repo.clone(),
                issue_number: issue.number,
            })
        }
        Err(e) => {
            error!(error = %e, key, "[INTAKE][ERROR] Archiving processed file failed");
            let message = format!("Error processing file: {key}\nError: {e}");
            park(settings, store, notifier, container, key, &message).await?;
            Ok(Outcome::Failed {
                error: e.to_string(),
            })
        }
    }
}

async fn load_submission<S: ObjectStore>(
    store: &S,
    container: &str,
    key: &str,
) -> Result<Submission, LoadError> {
    let bytes = store.fetch(container, key).await?;
    let submission = Submission::from_slice(&bytes)?;
    Ok(submission)
}

/// Failure exit: alert the channel (best-effort), then park the file under
/// the invalid prefix. Only the parking relocation may escalate.
async fn park<S, N>(
    settings: &Settings,
    store: &S,
    notifier: &N,
    container: &str,
    key: &str,
    message: &str,
) -> Result<(), HandlerError>
where
    S: ObjectStore,
    N: Notifier,
{
    if let Err(e) = notifier.publish(message).await {
        warn!(error = %e, "[INTAKE] Failure notification could not be delivered");
    }
    relocate(store, container, key, &settings.intake.invalid_prefix).await?;
    info!(key, "[INTAKE] Parked file in invalid area");
    Ok(())
}
