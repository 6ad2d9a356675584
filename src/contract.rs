#![allow(unused)]

//! # contract: interfaces between the handler and the outside world
//!
//! The pipeline touches three remote surfaces: the object store holding the
//! submission files, the issue tracker that owns issues and milestones, and
//! the notification channel for failure alerts. Each is a trait here so the
//! orchestration logic stays testable without network access.
//!
//! ## Mocking & Testing
//! - All traits are annotated for `mockall`; with the `test-export-mocks`
//!   feature (on by default) the generated mocks are exported for use in the
//!   integration test suite.
//!
//! ## Adding New Backends
//! - Implement the trait for your backend and hand it to
//!   [`crate::handler::handle_event`]. Errors are concrete per-surface types,
//!   not boxed, so callers can branch on what went wrong.

use async_trait::async_trait;

use mockall::{automock, predicate::*};

use crate::error::{LinkError, NotifyError, RemoteApiError, StorageError};

/// An issue as the tracker reports it: the human-facing number plus the
/// opaque node id the project-board mutation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub number: u64,
    pub node_id: String,
}

/// A milestone as the tracker reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneRef {
    pub number: u64,
    pub title: String,
}

/// The data needed to open a new issue.
pub struct NewIssue<'a> {
    pub title: &'a str,
    /// Rendered issue body, already templated.
    pub body: &'a str,
    /// Label names, applied verbatim.
    pub labels: &'a [String],
    /// Milestone number the issue is filed under.
    pub milestone: u64,
}

/// A wholesale overwrite of an existing issue's content.
///
/// The title is deliberately absent: it is the identity key and never
/// rewritten.
pub struct IssueUpdate<'a> {
    pub body: &'a str,
    pub labels: &'a [String],
    pub milestone: u64,
}

/// Object storage scoped to what the pipeline needs: read a blob, copy it
/// server-side, delete it. Implemented by the real blob client and by mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full contents of an object.
    async fn fetch(&self, container: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Server-side copy of an object. Must not return before the copy is
    /// durable at the destination.
    async fn copy(
        &self,
        source_container: &str,
        source_key: &str,
        dest_container: &str,
        dest_key: &str,
    ) -> Result<(), StorageError>;

    /// Delete an object.
    async fn delete(&self, container: &str, key: &str) -> Result<(), StorageError>;
}

/// The issue tracker surface: lookups by title, milestone management, issue
/// creation and in-place update, and the project-board link.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Find an issue whose title matches exactly, searching open and closed
    /// issues alike. When several match, the first listed is canonical.
    async fn search_issue_by_title(
        &self,
        repo: &str,
        title: &str,
    ) -> Result<Option<IssueRef>, RemoteApiError>;

    /// List all milestones, open and closed.
    async fn list_milestones(&self, repo: &str) -> Result<Vec<MilestoneRef>, RemoteApiError>;

    /// Create a milestone with the given title.
    async fn create_milestone(
        &self,
        repo: &str,
        title: &str,
    ) -> Result<MilestoneRef, RemoteApiError>;

    /// Open a new issue.
    async fn create_issue<'a>(
        &self,
        repo: &str,
        issue: NewIssue<'a>,
    ) -> Result<IssueRef, RemoteApiError>;

    /// Overwrite body, labels and milestone of an existing issue, returning
    /// its node id.
    async fn update_issue<'a>(
        &self,
        repo: &str,
        number: u64,
        update: IssueUpdate<'a>,
    ) -> Result<String, RemoteApiError>;

    /// Attach an issue (by node id) to a project board.
    async fn link_to_project(&self, node_id: &str, project_id: &str) -> Result<(), LinkError>;
}

/// Failure-notification channel. One message per failure, fire-and-forget
/// from the handler's point of view.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a plain-text message to the channel.
    async fn publish(&self, message: &str) -> Result<(), NotifyError>;
}
