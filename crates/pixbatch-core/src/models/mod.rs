//! Domain models for batch uploads.

pub mod item;
pub mod key;
pub mod result;

pub use item::{Directive, InvalidArgument, SourceRef, UploadItem};
pub use key::StorageKey;
pub use result::{BatchSummary, ItemState, UploadOutcome, UploadResult};
