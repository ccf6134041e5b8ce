#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{MemoryStorage, Storage, StorageBackend, StorageError, StorageResult};
use pixbatch_core::StorageConfig;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    match config.backend() {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("BUCKET not configured".to_string()))?;
            let endpoint = config.s3_endpoint().ok_or_else(|| {
                StorageError::ConfigError("ACCOUNT_ID or S3_ENDPOINT not configured".to_string())
            })?;
            let access_key_id = config
                .access_key_id
                .clone()
                .ok_or_else(|| StorageError::ConfigError("ACCESS_KEY not configured".to_string()))?;
            let secret_access_key = config
                .secret_access_key
                .clone()
                .ok_or_else(|| StorageError::ConfigError("SECRET_KEY not configured".to_string()))?;

            tracing::info!(
                bucket = %bucket,
                endpoint = %endpoint,
                region = %config.region(),
                "Using S3-compatible storage"
            );

            let storage = S3Storage::new(
                bucket,
                config.region().to_string(),
                Some(endpoint),
                access_key_id,
                secret_access_key,
            )?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            tracing::info!(base_path = %base_path, "Using local storage");
            let storage = LocalStorage::new(base_path).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, uploads are discarded on exit");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
