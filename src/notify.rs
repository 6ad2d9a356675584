//! Failure notifications over an incoming webhook.
//!
//! One plain-text message per failed submission. The handler treats delivery
//! as best-effort; this module still surfaces errors so the caller can log
//! that the alert itself was lost.

use std::env;

use async_trait::async_trait;
use tracing::{error, info};

use crate::contract::Notifier;
use crate::error::NotifyError;

/// Posts `{"text": ...}` documents to a single webhook URL.
pub struct WebhookNotifier {
    http: reqwest::Client,
    webhook_url: String,
}

impl WebhookNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, anyhow::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("intake-bridge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(WebhookNotifier {
            http,
            webhook_url: webhook_url.into(),
        })
    }

    /// Construct the notifier from `NOTIFY_WEBHOOK_URL`.
    pub fn new_from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok(); // loads environment variables from .env if present
        match env::var("NOTIFY_WEBHOOK_URL") {
            Ok(webhook_url) => {
                info!("Initialized WebhookNotifier from environment");
                WebhookNotifier::new(webhook_url)
            }
            Err(e) => {
                error!(error = ?e, "NOTIFY_WEBHOOK_URL missing in environment");
                Err(anyhow::anyhow!("NOTIFY_WEBHOOK_URL missing in environment"))
            }
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn publish(&self, message: &str) -> Result<(), NotifyError> {
        info!("Publishing failure notification");
        let resp = self
            .http
            .post(&self.webhook_url)
            .json(&serde_json::json!({ "text": message }))
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            info!("Notification delivered");
            Ok(())
        } else {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable response body>".to_string());
            error!(status = status.as_u16(), body = %body, "Notification channel rejected message");
            Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
