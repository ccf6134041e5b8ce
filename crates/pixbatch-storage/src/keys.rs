//! Shared key generation for storage backends.
//!
//! Key format: `{partition}/{logical_name}`.

use chrono::Datelike;
use pixbatch_core::{ErrorMetadata, FailureKind, StorageKey};

/// Key arguments that cannot produce a safe key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("Invalid argument: {field} must not be empty")]
    Empty { field: &'static str },

    #[error("Invalid argument: {field} {value:?} must not start with '/' or end with '/'")]
    Slash { field: &'static str, value: String },

    #[error("Invalid argument: {field} {value:?} contains an empty or '..' segment")]
    BadSegment { field: &'static str, value: String },
}

impl ErrorMetadata for KeyError {
    fn failure_kind(&self) -> FailureKind {
        FailureKind::InvalidArgument
    }
}

fn validate(field: &'static str, value: &str) -> Result<(), KeyError> {
    if value.trim().is_empty() {
        return Err(KeyError::Empty { field });
    }
    if value.starts_with('/') || value.ends_with('/') {
        return Err(KeyError::Slash {
            field,
            value: value.to_string(),
        });
    }
    if value.split('/').any(|seg| seg.is_empty() || seg == "..") {
        return Err(KeyError::BadSegment {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Check a partition token on its own, before any item is processed.
pub fn validate_partition(partition: &str) -> Result<(), KeyError> {
    validate("partition", partition)
}

/// Generate a storage key for the given partition and logical name.
///
/// Pure and deterministic: the same arguments always produce the same key.
pub fn build_key(partition: &str, logical_name: &str) -> Result<StorageKey, KeyError> {
    validate("partition", partition)?;
    validate("logical name", logical_name)?;
    Ok(StorageKey::from(format!("{}/{}", partition, logical_name)))
}

/// Month partition token, `{month}-{year}` with an unpadded month (e.g. `6-2025`).
pub fn month_partition(date: &impl Datelike) -> String {
    format!("{}-{}", date.month(), date.year())
}
