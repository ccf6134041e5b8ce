//! Pixbatch Storage Library
//!
//! This crate provides the content store abstraction and its backends: any
//! S3-compatible service (Cloudflare R2, AWS S3, MinIO), the local filesystem,
//! and an in-memory store.
//!
//! # Storage key format
//!
//! Keys are partitioned: `{partition}/{logical_name}`, where the partition is a
//! caller-chosen token such as `6-2025`. Keys must not contain `..` segments or a
//! leading `/`. Key generation is centralized in the `keys` module so every
//! backend sees the same layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{build_key, month_partition, validate_partition, KeyError};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use pixbatch_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectSummary, Storage, StorageError, StorageResult};
