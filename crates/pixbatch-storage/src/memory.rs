//! In-memory storage, for dry runs and tests.

use crate::traits::{key_has_prefix, ObjectSummary, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use pixbatch_core::StorageKey;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// An object held by [`MemoryStorage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// Storage implementation that keeps objects in a map
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn objects(&self) -> MutexGuard<'_, BTreeMap<String, StoredObject>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get an object (for inspection after a run)
    pub fn get(&self, storage_key: &str) -> Option<StoredObject> {
        self.objects().get(storage_key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects().is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(&self, storage_key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        if storage_key.is_empty() || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }

        let size = data.len();
        self.objects().insert(
            storage_key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );

        tracing::debug!(key = %storage_key, size_bytes = size, "Memory storage put");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectSummary>> {
        Ok(self
            .objects()
            .iter()
            .filter(|(key, _)| key_has_prefix(key, prefix))
            .map(|(key, object)| ObjectSummary {
                key: StorageKey::from(key.as_str()),
                size: object.data.len() as u64,
            })
            .collect())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
