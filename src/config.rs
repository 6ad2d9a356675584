//! Static configuration: intake rules and the tag routing table.
//!
//! Loaded once per invocation from YAML and treated as immutable thereafter.
//! Secrets never appear here; the remote clients read those from the
//! environment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RoutingError;

/// Everything the handler needs besides credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Which keys qualify for processing and where files end up afterwards.
    #[serde(default)]
    pub intake: IntakeRules,
    /// Tag-to-destination routing. Mandatory: a deployment with no routes
    /// cannot process anything.
    pub routing: RoutingTable,
}

impl Settings {
    pub fn trace_loaded(&self) {
        info!(
            prefix = %self.intake.prefix,
            suffix = %self.intake.suffix,
            routes = self.routing.len(),
            "Loaded settings"
        );
        debug!(?self, "Settings loaded (full debug)");
    }
}

/// Key filter plus the destination prefixes for terminal relocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeRules {
    /// Keys must start with this prefix to qualify.
    pub prefix: String,
    /// Keys must end with this suffix to qualify.
    pub suffix: String,
    /// Where successfully processed files are moved.
    pub processed_prefix: String,
    /// Where rejected or failed files are parked.
    pub invalid_prefix: String,
}

impl Default for IntakeRules {
    fn default() -> Self {
        IntakeRules {
            prefix: "intake/".to_string(),
            suffix: ".json".to_string(),
            processed_prefix: "processed/".to_string(),
            invalid_prefix: "invalid/".to_string(),
        }
    }
}

impl IntakeRules {
    /// Whether a key qualifies for processing at all.
    pub fn matches(&self, key: &str) -> bool {
        key.starts_with(&self.prefix) && key.ends_with(&self.suffix)
    }
}

/// Immutable mapping from normalised tag to destination. Built from
/// configuration and handed to the handler; nothing mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingTable(HashMap<String, RouteTarget>);

impl RoutingTable {
    pub fn new(routes: HashMap<String, RouteTarget>) -> Self {
        RoutingTable(routes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve a normalised tag to its destination. Unknown tags are an
    /// error, never a fallback destination.
    pub fn route(&self, tag: &str) -> Result<&RouteTarget, RoutingError> {
        self.0.get(tag).ok_or_else(|| RoutingError {
            tag: tag.to_string(),
        })
    }
}

/// Where submissions with a given tag are tracked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteTarget {
    /// Repository in `owner/name` form.
    pub repo: String,
    /// Node id of the project board issues are linked onto.
    pub project_id: String,
}
