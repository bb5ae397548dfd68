//! Dropbox uploader: bridges the core [`Uploader`] trait to the Dropbox
//! content API for real, networked uploads.
//!
//! - Construct [`DropboxClient`] from the environment (`DROPBOX_ACCESS_TOKEN`,
//!   `.env` honoured).
//! - The upload uses `/2/files/upload` in overwrite mode, so re-running inside
//!   the same trigger window just replaces the same remote file.
//! - All transport, serialization, and error handling are encapsulated here;
//!   the core pipeline only sees the trait.

use std::env;

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use songhistory_core::contract::{UploadError, UploadReceipt, UploadRequest, Uploader};

/// Base URL for Dropbox content endpoints.
pub const DROPBOX_CONTENT_URL: &str = "https://content.dropboxapi.com";

pub struct DropboxClient {
    http: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl DropboxClient {
    pub fn new(access_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token,
            base_url: DROPBOX_CONTENT_URL.to_string(),
        }
    }

    /// Construct the client from `DROPBOX_ACCESS_TOKEN` (loading `.env` if present).
    pub fn new_from_env() -> Result<Self, UploadError> {
        dotenvy::dotenv().ok();
        match env::var("DROPBOX_ACCESS_TOKEN") {
            Ok(token) if !token.is_empty() => {
                tracing::info!("Initialized Dropbox client from environment");
                Ok(Self::new(token))
            }
            Ok(_) => {
                tracing::error!("DROPBOX_ACCESS_TOKEN is set but empty");
                Err("DROPBOX_ACCESS_TOKEN is set but empty".into())
            }
            Err(e) => {
                tracing::error!(error = ?e, "DROPBOX_ACCESS_TOKEN missing in environment");
                Err(format!("DROPBOX_ACCESS_TOKEN missing in environment: {e}").into())
            }
        }
    }
}

/// The subset of Dropbox `FileMetadata` we care about.
#[derive(Debug, Deserialize)]
struct FileMetadata {
    name: String,
    path_display: Option<String>,
    size: u64,
    content_hash: Option<String>,
    server_modified: Option<String>,
}

#[async_trait]
impl Uploader for DropboxClient {
    async fn upload(&self, req: UploadRequest) -> Result<UploadReceipt, UploadError> {
        let payload_sha256 = {
            let mut hasher = Sha256::new();
            hasher.update(&req.content);
            format!("{:x}", hasher.finalize())
        };
        tracing::info!(
            remote_path = %req.remote_path,
            size = req.content.len(),
            payload_sha256 = %payload_sha256,
            "Uploading song history file to Dropbox"
        );

        let api_arg = serde_json::json!({
            "path": req.remote_path,
            "mode": "overwrite",
            "autorename": false,
            "mute": true,
        });

        let response = self
            .http
            .post(format!("{}/2/files/upload", self.base_url))
            .bearer_auth(&self.access_token)
            .header("Dropbox-API-Arg", api_arg.to_string())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(req.content)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Dropbox upload failed");
            return Err(format!("Dropbox upload failed with status {status}: {body}").into());
        }

        let meta: FileMetadata = response.json().await?;
        let remote_path = meta.path_display.unwrap_or(meta.name);
        tracing::info!(
            remote_path = %remote_path,
            size = meta.size,
            server_modified = ?meta.server_modified,
            "Dropbox upload succeeded"
        );
        Ok(UploadReceipt {
            remote_path,
            size: meta.size,
            content_hash: meta.content_hash,
            server_modified: meta.server_modified,
        })
    }
}
