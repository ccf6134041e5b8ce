//! Error taxonomy module
//!
//! Every crate in the workspace defines its own `thiserror` enum. Errors that
//! can end a single item's pipeline implement [`ErrorMetadata`] so the batch
//! pipeline can record them as a [`FailureKind`] and log them at the right level
//! without knowing which crate produced them.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like bad directives
    Debug,
    /// Warning level - for per-item failures the batch recovers from
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Why a single item ended in the `Failed` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Source bytes are not a decodable image
    Decode,
    /// The encoder failed while producing output
    Encode,
    /// The directive named a format the transformer refuses to handle
    InvalidFormat,
    /// A key or directive argument was empty or malformed
    InvalidArgument,
    /// Raw bytes could not be read from the item's source
    SourceRead,
    /// The content store could not be reached or refused credentials
    StoreUnavailable,
    /// The content store rejected the request itself (bucket, key, options)
    StoreRejected,
    /// The batch was cancelled before the item reached the store
    Cancelled,
}

impl FailureKind {
    /// Machine-readable error code (e.g., "DECODE_ERROR")
    pub fn error_code(self) -> &'static str {
        match self {
            FailureKind::Decode => "DECODE_ERROR",
            FailureKind::Encode => "ENCODE_ERROR",
            FailureKind::InvalidFormat => "INVALID_FORMAT",
            FailureKind::InvalidArgument => "INVALID_ARGUMENT",
            FailureKind::SourceRead => "SOURCE_READ_ERROR",
            FailureKind::StoreUnavailable => "STORE_UNAVAILABLE",
            FailureKind::StoreRejected => "STORE_REJECTED",
            FailureKind::Cancelled => "CANCELLED",
        }
    }

    /// Whether a later run could succeed with the same input.
    ///
    /// The pipeline never retries on its own; this only informs callers.
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            FailureKind::StoreUnavailable | FailureKind::SourceRead | FailureKind::Cancelled
        )
    }
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.error_code())
    }
}

/// Metadata for item-level errors - how a failure is classified and reported
pub trait ErrorMetadata: std::error::Error {
    /// Failure classification recorded on the item's result
    fn failure_kind(&self) -> FailureKind;

    /// Log level for this error
    fn log_level(&self) -> LogLevel {
        match self.failure_kind() {
            FailureKind::InvalidArgument | FailureKind::InvalidFormat | FailureKind::Cancelled => {
                LogLevel::Debug
            }
            FailureKind::Decode | FailureKind::SourceRead | FailureKind::StoreRejected => {
                LogLevel::Warn
            }
            FailureKind::Encode | FailureKind::StoreUnavailable => LogLevel::Error,
        }
    }

    /// Machine-readable error code
    fn error_code(&self) -> &'static str {
        self.failure_kind().error_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom(FailureKind);

    impl ErrorMetadata for Boom {
        fn failure_kind(&self) -> FailureKind {
            self.0
        }
    }

    #[test]
    fn test_error_codes_are_unique() {
        let kinds = [
            FailureKind::Decode,
            FailureKind::Encode,
            FailureKind::InvalidFormat,
            FailureKind::InvalidArgument,
            FailureKind::SourceRead,
            FailureKind::StoreUnavailable,
            FailureKind::StoreRejected,
            FailureKind::Cancelled,
        ];
        let codes: std::collections::HashSet<_> = kinds.iter().map(|k| k.error_code()).collect();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_recoverable_kinds() {
        assert!(FailureKind::StoreUnavailable.is_recoverable());
        assert!(!FailureKind::StoreRejected.is_recoverable());
        assert!(!FailureKind::Decode.is_recoverable());
    }

    #[test]
    fn test_default_log_level() {
        assert_eq!(Boom(FailureKind::Encode).log_level(), LogLevel::Error);
        assert_eq!(Boom(FailureKind::Decode).log_level(), LogLevel::Warn);
        assert_eq!(Boom(FailureKind::InvalidFormat).log_level(), LogLevel::Debug);
        assert_eq!(Boom(FailureKind::StoreRejected).error_code(), "STORE_REJECTED");
    }

    #[test]
    fn test_failure_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FailureKind::StoreUnavailable).unwrap();
        assert_eq!(json, "\"store_unavailable\"");
    }
}
