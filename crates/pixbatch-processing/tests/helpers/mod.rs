#![allow(dead_code)]

pub mod fixtures;
pub mod source;
pub mod storage;

use pixbatch_core::{Directive, FormatPolicy, SourceRef, UploadItem};
use pixbatch_processing::{BatchPipeline, ImageTransformer, MemorySource, Uploader};
use pixbatch_storage::Storage;
use std::sync::Arc;

/// Item reading from `source` with the given format and optional width bound
pub fn item(name: &str, source: &str, format: &str, width: Option<u32>) -> UploadItem {
    let directive = Directive::new(format, 80)
        .unwrap()
        .with_size(width, None)
        .unwrap();
    UploadItem::new(name, SourceRef::new(source), directive).unwrap()
}

pub fn pipeline(
    source: MemorySource,
    storage: Arc<dyn Storage>,
    policy: FormatPolicy,
) -> BatchPipeline {
    BatchPipeline::new(
        Arc::new(source),
        ImageTransformer::new(policy),
        Uploader::new(storage),
    )
}
