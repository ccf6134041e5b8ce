//! Pixbatch Core Library
//!
//! This crate provides the domain models, error taxonomy and configuration
//! shared by the storage, processing and CLI crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, ConfigError, FormatPolicy, StorageConfig};
pub use error::{ErrorMetadata, FailureKind, LogLevel};
pub use models::{
    BatchSummary, Directive, ItemState, SourceRef, StorageKey, UploadItem, UploadOutcome,
    UploadResult,
};
pub use storage_types::StorageBackend;
