//! # uploader contract: interface for publishing the song history file
//!
//! This module defines a single trait (`Uploader`) and its supporting types for
//! uploading the converted song history to a remote storage account via an
//! external API, local system, or a mock/test implementation.
//!
//! ## Interface & Extensibility
//! - Implement the [`Uploader`] trait to create new upload clients (e.g. Dropbox, file-based).
//! - The method is async and returns a boxed error type.
//! - Error handling is uniform: all API/caller errors return boxed trait objects.
//! - Meant for both production code and robust mocking in tests.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate deterministic
//!   mocks for unit/integration tests (exported behind the `test-export-mocks` feature).
//!
//! ## Adding New Upload Destinations
//! - Implement the trait for your destination.
//! - Convert all meaningful upstream errors to a boxed error with a clear message.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Error type for the upload seam (simple boxed error).
pub type UploadError = Box<dyn std::error::Error + Send + Sync>;

/// The minimal data needed to upload one file to the remote account.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Destination path in the remote account (e.g. `/Song History/songhistory.csv`).
    pub remote_path: String,
    /// The raw file contents.
    pub content: Vec<u8>,
}

/// What the remote service reported back after a successful upload.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UploadReceipt {
    pub remote_path: String,
    pub size: u64,
    pub content_hash: Option<String>,
    pub server_modified: Option<String>,
}

/// Trait for uploading the song history file to a remote storage account.
/// The implementor is responsible for authentication and transport; an existing
/// remote file at the same path is overwritten.
///
/// The trait is `Send` + `Sync` and intended for async/await usage.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload one file, overwriting any existing remote file at the same path.
    async fn upload(&self, req: UploadRequest) -> Result<UploadReceipt, UploadError>;
}
