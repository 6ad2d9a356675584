//! The trigger document the platform delivers when a blob lands.
//!
//! Only the container and key of each record matter to the pipeline; all
//! surrounding metadata is ignored on purpose, so platform-side additions to
//! the event envelope never break parsing.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EventError;

/// One blob-arrival fact inside a trigger event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlobRecord {
    pub container: String,
    pub key: String,
}

/// The trigger event envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageEvent {
    #[serde(default)]
    pub records: Vec<BlobRecord>,
}

impl StorageEvent {
    /// Parse the raw event document.
    pub fn parse(raw: &str) -> Result<Self, EventError> {
        let event = serde_json::from_str(raw)?;
        Ok(event)
    }

    /// The record this invocation handles.
    ///
    /// Delivery is one-record-per-event; should the platform ever batch,
    /// surplus records are dropped with a warning rather than half-handled.
    pub fn primary(&self) -> Result<&BlobRecord, EventError> {
        if self.records.len() > 1 {
            warn!(
                dropped = self.records.len() - 1,
                "Event carries multiple records, handling only the first"
            );
        }
        self.records.first().ok_or(EventError::Empty)
    }
}
