//! Batch upload: transform each item, store it under a partitioned key and
//! report one terminal result per item.

pub mod pipeline;
pub mod uploader;

pub use pipeline::BatchPipeline;
pub use uploader::Uploader;

use pixbatch_core::{ErrorMetadata, LogLevel, UploadOutcome};
use thiserror::Error;

/// Errors that abort a whole batch. Item-level failures never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal pipeline error: {0}")]
    Internal(String),
}

/// Record an item-level error as a failure outcome, logging it at its level.
pub(crate) fn failure_from<E: ErrorMetadata>(err: &E, item: &str) -> UploadOutcome {
    let kind = err.failure_kind();
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(item = %item, error_code = kind.error_code(), error = %err, "Item failed")
        }
        LogLevel::Warn => {
            tracing::warn!(item = %item, error_code = kind.error_code(), error = %err, "Item failed")
        }
        LogLevel::Error => {
            tracing::error!(item = %item, error_code = kind.error_code(), error = %err, "Item failed")
        }
    }
    UploadOutcome::failure(kind, err.to_string())
}
