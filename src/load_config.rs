//! Loading and sanity-checking the static YAML configuration.
//!
//! The file carries no secrets; those stay in the environment with the
//! clients that need them.

use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing::{error, info};

use crate::config::Settings;

/// Load the settings file and refuse configurations that cannot work.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let settings: Settings = match serde_yaml::from_str(&config_content) {
        Ok(parsed) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            parsed
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if settings.routing.is_empty() {
        error!("Routing table is empty, no submission could ever be routed");
        anyhow::bail!("Routing table is empty");
    }

    settings.trace_loaded();
    Ok(settings)
}
