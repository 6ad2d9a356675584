//! Command-line surface: argument parsing and the invocation entrypoint.
//!
//! All pipeline logic lives in the library modules. This module is glue: it
//! loads configuration, reads the trigger document, wires the real clients
//! and reports the terminal outcome on stdout as a JSON document for the
//! invoking automation to consume.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Instrument;

use crate::event::StorageEvent;
use crate::github::GitHubClient;
use crate::handler::handle_event;
use crate::load_config::load_config;
use crate::notify::WebhookNotifier;
use crate::storage::BlobStore;

/// CLI for intake-bridge: turn uploaded submission files into tracked issues.
#[derive(Parser)]
#[clap(
    name = "intake-bridge",
    version,
    about = "Turn uploaded submission files into tracked issues with tag routing and failure alerts"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Handle one storage trigger event using the given config file
    Handle {
        /// Path to the trigger event JSON document
        #[clap(long)]
        event: PathBuf,
        /// Path to the YAML config file
        #[clap(long, default_value = "config.yaml")]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Handle { event, config } => {
            let settings = load_config(config)?;

            let raw_event = std::fs::read_to_string(&event)
                .with_context(|| format!("Failed to read event file {:?}", event))?;
            let event = StorageEvent::parse(&raw_event).context("Failed to parse trigger event")?;

            let store = BlobStore::new_from_env()?;
            let tracker = GitHubClient::new_from_env()?;
            let notifier = WebhookNotifier::new_from_env()?;

            let invocation = tracing::info_span!("invocation", id = %uuid::Uuid::new_v4());
            let outcome = handle_event(&settings, &store, &tracker, &notifier, &event)
                .instrument(invocation)
                .await;

            match outcome {
                Ok(outcome) => {
                    tracing::info!(?outcome, "Invocation reached a terminal state");
                    println!("{}", serde_json::to_string(&outcome)?);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(error = %e, "Invocation failed without reaching a terminal state");
                    Err(e.into())
                }
            }
        }
    }
}
