//! Storage abstraction trait
//!
//! This module defines the Storage trait that all content store backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use pixbatch_core::{ErrorMetadata, FailureKind, StorageKey};
use serde::Serialize;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Transient: network, credentials, or a backend-side failure
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the request itself (bucket, key, options)
    #[error("Store rejected request: {0}")]
    Rejected(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ErrorMetadata for StorageError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            StorageError::Unavailable(_) | StorageError::IoError(_) => {
                FailureKind::StoreUnavailable
            }
            StorageError::Rejected(_)
            | StorageError::InvalidKey(_)
            | StorageError::ConfigError(_) => FailureKind::StoreRejected,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One entry of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectSummary {
    pub key: StorageKey,
    pub size: u64,
}

/// Storage abstraction trait
///
/// All content store backends (S3-compatible, local filesystem, memory) implement
/// this trait. A single instance is shared by every worker of a batch, so
/// implementations must be safe to call concurrently.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `storage_key`, replacing any existing object.
    async fn put(&self, storage_key: &str, data: Bytes, content_type: &str) -> StorageResult<()>;

    /// List objects whose key lies under `prefix` (segment-wise), sorted by key.
    ///
    /// An empty prefix lists the whole store.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectSummary>>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Whether `key` lies under `prefix` when both are split on `/`.
pub(crate) fn key_has_prefix(key: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_matches('/');
    prefix.is_empty()
        || key == prefix
        || key
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
