//! Error taxonomy for the intake pipeline.
//!
//! Each stage owns an error type, so the handler can tell a file that never
//! qualified (load, validation, routing) apart from a failure after
//! qualification (tracker calls, project link, relocation). The terminal
//! outcome depends on that distinction.

use thiserror::Error;

/// Transport and protocol failures against the object store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("storage responded {status}: {body}")]
    Status { status: u16, body: String },
    #[error("server-side copy did not complete: state {state}")]
    CopyIncomplete { state: String },
}

/// The submission file could not be fetched or is not well-formed JSON.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("object could not be fetched: {0}")]
    Fetch(#[from] StorageError),
    #[error("object is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One or more required submission fields are absent or empty.
///
/// Carries every offending field, not just the first one found, so a single
/// notification names the complete fix.
#[derive(Debug, Error)]
#[error("missing or empty required fields: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

/// The submission's normalised tag has no entry in the routing table.
#[derive(Debug, Error)]
#[error("unsupported tag: {tag}")]
pub struct RoutingError {
    pub tag: String,
}

/// Transport and protocol failures against the issue tracker's REST surface.
#[derive(Debug, Error)]
pub enum RemoteApiError {
    #[error("issue tracker transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("issue tracker responded {status}: {body}")]
    Status { status: u16, body: String },
}

/// The project-board link mutation failed.
///
/// A structurally valid response that carries GraphQL errors is a failure
/// even when the HTTP status is 200.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("project link transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("project link responded {status}: {body}")]
    Status { status: u16, body: String },
    #[error("project link mutation rejected: {detail}")]
    Mutation { detail: String },
}

/// The notification channel rejected or never received the message.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("notification channel responded {status}: {body}")]
    Status { status: u16, body: String },
}

/// A copy-then-delete relocation stopped partway.
///
/// `Delete` means the copy landed and the original is still in place, so the
/// file exists twice until an operator intervenes.
#[derive(Debug, Error)]
pub enum RelocationError {
    #[error("copy of {key} to {dest_key} failed: {source}")]
    Copy {
        key: String,
        dest_key: String,
        source: StorageError,
    },
    #[error("delete of {key} after copy to {dest_key} failed: {source}")]
    Delete {
        key: String,
        dest_key: String,
        source: StorageError,
    },
}

/// The trigger document could not be interpreted.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("trigger event is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("trigger event carries no records")]
    Empty,
}

/// Failures the handler cannot resolve to a terminal outcome.
///
/// Everything else is absorbed into an [`crate::handler::Outcome`]; only a
/// broken trigger or a failed parking relocation escalates to the platform.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error("parking the file failed: {0}")]
    Parking(#[from] RelocationError),
}
