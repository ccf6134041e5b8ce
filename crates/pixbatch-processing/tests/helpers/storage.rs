use async_trait::async_trait;
use bytes::Bytes;
use pixbatch_storage::{
    MemoryStorage, ObjectSummary, Storage, StorageBackend, StorageError, StorageResult,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Memory store that records upload concurrency and can delay or fail keys
#[derive(Default)]
pub struct InstrumentedStorage {
    pub inner: MemoryStorage,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    puts: AtomicUsize,
    default_delay: Duration,
    delays: HashMap<String, Duration>,
    failing: HashSet<String>,
}

impl InstrumentedStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    /// Puts to `key` fail as if the store were unreachable
    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for InstrumentedStorage {
    async fn put(&self, storage_key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .delays
            .get(storage_key)
            .copied()
            .unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let result = if self.failing.contains(storage_key) {
            Err(StorageError::Unavailable("connection reset".to_string()))
        } else {
            self.inner.put(storage_key, data, content_type).await
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectSummary>> {
        self.inner.list(prefix).await
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
