use super::failure_from;
use bytes::Bytes;
use pixbatch_core::{StorageKey, UploadOutcome};
use pixbatch_storage::Storage;
use std::sync::Arc;

/// Pushes encoded bytes to the shared content store.
///
/// Existing objects are overwritten. Store errors come back as a failure
/// outcome, classified by the backend as unavailable or rejected.
#[derive(Clone)]
pub struct Uploader {
    storage: Arc<dyn Storage>,
}

impl Uploader {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn upload(&self, key: &StorageKey, data: Bytes, content_type: &str) -> UploadOutcome {
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        match self.storage.put(key.as_str(), data, content_type).await {
            Ok(()) => {
                tracing::info!(
                    key = %key,
                    content_type = %content_type,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Uploaded"
                );
                UploadOutcome::Success {
                    content_type: content_type.to_string(),
                    size_bytes: size,
                }
            }
            Err(e) => failure_from(&e, key.as_str()),
        }
    }
}
