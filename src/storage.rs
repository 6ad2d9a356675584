//! Blob storage client and the copy-then-delete relocation primitive.
//!
//! Talks to an object store account over its REST surface with a bearer
//! token. Copies are requested as synchronous server-side copies, so the
//! source never streams through this process and the copy is durable before
//! the original is deleted.

use std::env;

use async_trait::async_trait;
use tracing::{error, info};

use crate::contract::ObjectStore;
use crate::error::{RelocationError, StorageError};

/// REST API version sent with every storage request.
const STORAGE_API_VERSION: &str = "2021-12-02";

/// Bearer-token client for one storage account.
pub struct BlobStore {
    http: reqwest::Client,
    account_url: String,
    token: String,
}

impl BlobStore {
    pub fn new(
        account_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, anyhow::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("intake-bridge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let account_url = account_url.into().trim_end_matches('/').to_string();
        Ok(BlobStore {
            http,
            account_url,
            token: token.into(),
        })
    }

    /// Construct the client from `STORAGE_ACCOUNT_URL` and `STORAGE_TOKEN`.
    pub fn new_from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok(); // loads environment variables from .env if present
        match (env::var("STORAGE_ACCOUNT_URL"), env::var("STORAGE_TOKEN")) {
            (Ok(account_url), Ok(token)) => {
                info!(
                    account_url = %account_url,
                    token_set = !token.is_empty(),
                    "Initialized BlobStore from environment"
                );
                BlobStore::new(account_url, token)
            }
            (Err(e), _) => {
                error!(error = ?e, "STORAGE_ACCOUNT_URL missing in environment");
                Err(anyhow::anyhow!("STORAGE_ACCOUNT_URL missing in environment"))
            }
            (_, Err(e)) => {
                error!(error = ?e, "STORAGE_TOKEN missing in environment");
                Err(anyhow::anyhow!("STORAGE_TOKEN missing in environment"))
            }
        }
    }

    fn object_url(&self, container: &str, key: &str) -> String {
        format!("{}/{}/{}", self.account_url, container, key)
    }
}

#[async_trait]
impl ObjectStore for BlobStore {
    async fn fetch(&self, container: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let url = self.object_url(container, key);
        info!(url = %url, "Fetching object");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header("x-ms-version", STORAGE_API_VERSION)
            .send()
            .await?;
        let resp = ok_or_status(resp).await?;
        let bytes = resp.bytes().await?;
        info!(url = %url, size = bytes.len(), "Fetched object");
        Ok(bytes.to_vec())
    }

    async fn copy(
        &self,
        source_container: &str,
        source_key: &str,
        dest_container: &str,
        dest_key: &str,
    ) -> Result<(), StorageError> {
        let source_url = self.object_url(source_container, source_key);
        let dest_url = self.object_url(dest_container, dest_key);
        info!(from = %source_url, to = %dest_url, "Copying object server-side");
        let resp = self
            .http
            .put(&dest_url)
            .bearer_auth(&self.token)
            .header("x-ms-version", STORAGE_API_VERSION)
            .header("x-ms-copy-source", &source_url)
            .header("x-ms-requires-sync", "true")
            .send()
            .await?;
        let resp = ok_or_status(resp).await?;
        // Synchronous copies report their final state in a header; anything
        // but success means the destination blob cannot be trusted.
        let state = resp
            .headers()
            .get("x-ms-copy-status")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("success")
            .to_string();
        if state != "success" {
            error!(state = %state, to = %dest_url, "Copy did not complete");
            return Err(StorageError::CopyIncomplete { state });
        }
        info!(to = %dest_url, "Copied object");
        Ok(())
    }

    async fn delete(&self, container: &str, key: &str) -> Result<(), StorageError> {
        let url = self.object_url(container, key);
        info!(url = %url, "Deleting object");
        let resp = self
            .http
            .delete(&url)
            .bearer_auth(&self.token)
            .header("x-ms-version", STORAGE_API_VERSION)
            .send()
            .await?;
        ok_or_status(resp).await?;
        info!(url = %url, "Deleted object");
        Ok(())
    }
}

async fn ok_or_status(resp: reqwest::Response) -> Result<reqwest::Response, StorageError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable response body>".to_string());
        error!(status = status.as_u16(), body = %body, "Storage request failed");
        Err(StorageError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Move an object under `dest_prefix` in the same container, keeping only
/// its basename: copy first, delete the original after.
///
/// A failed delete leaves the file in both places; the error spells out
/// which half completed so an operator can reconcile by hand.
pub async fn relocate<S: ObjectStore>(
    store: &S,
    container: &str,
    key: &str,
    dest_prefix: &str,
) -> Result<String, RelocationError> {
    let name = key.rsplit('/').next().unwrap_or(key);
    let dest_key = format!("{dest_prefix}{name}");

    store
        .copy(container, key, container, &dest_key)
        .await
        .map_err(|source| RelocationError::Copy {
            key: key.to_string(),
            dest_key: dest_key.clone(),
            source,
        })?;

    store
        .delete(container, key)
        .await
        .map_err(|source| RelocationError::Delete {
            key: key.to_string(),
            dest_key: dest_key.clone(),
            source,
        })?;

    info!(from = %key, to = %dest_key, "Relocated object");
    Ok(dest_key)
}
