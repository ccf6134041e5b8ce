//! Raw byte sources for upload items
//!
//! A [`SourceRef`] is an opaque handle; the [`ByteSource`] handed to the
//! pipeline decides what it means (a filesystem path, a map key, ...).

use async_trait::async_trait;
use pixbatch_core::{ErrorMetadata, FailureKind, SourceRef};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source not found: {0}")]
    NotFound(String),

    #[error("Failed to read source {source_ref}: {error}")]
    Io {
        source_ref: String,
        #[source]
        error: std::io::Error,
    },
}

impl ErrorMetadata for SourceError {
    fn failure_kind(&self) -> FailureKind {
        FailureKind::SourceRead
    }
}

/// Resolves a source handle to the raw encoded bytes of an image
#[async_trait]
pub trait ByteSource: Send + Sync {
    async fn read_bytes(&self, source: &SourceRef) -> Result<Vec<u8>, SourceError>;
}

/// Reads sources as filesystem paths, optionally relative to a root directory
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
}

impl FileSource {
    /// Paths are used as given
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative paths are resolved against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, source: &SourceRef) -> PathBuf {
        match &self.root {
            Some(root) => root.join(source.as_str()),
            None => PathBuf::from(source.as_str()),
        }
    }
}

#[async_trait]
impl ByteSource for FileSource {
    async fn read_bytes(&self, source: &SourceRef) -> Result<Vec<u8>, SourceError> {
        let path = self.resolve(source);
        match tokio::fs::read(&path).await {
            Ok(data) => {
                tracing::debug!(
                    path = %path.display(),
                    size_bytes = data.len(),
                    "Source read"
                );
                Ok(data)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SourceError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(SourceError::Io {
                source_ref: path.display().to_string(),
                error: e,
            }),
        }
    }
}

/// Serves sources from an in-memory map
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, handle: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(handle.into(), data.into());
        self
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    async fn read_bytes(&self, source: &SourceRef) -> Result<Vec<u8>, SourceError> {
        self.entries
            .get(source.as_str())
            .cloned()
            .ok_or_else(|| SourceError::NotFound(source.to_string()))
    }
}
