//! Storage abstraction trait
//!
//! This module defines the Storage trait that all photo storage backends
//! must implement.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All photo storage backends must implement this trait. The intake
/// pipeline treats `upload` as the single collaborator operation
/// `store(bytes, filename, mimeType) -> URL`; each call may fail
/// independently without affecting other photos.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload a photo and return (storage_key, storage_url)
    ///
    /// The storage_key is an internal identifier used to reference the file;
    /// the storage_url is the publicly accessible URL to the file.
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)>;

    /// Delete a photo by its storage key
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a photo exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;
}
