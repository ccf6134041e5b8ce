//! Pixbatch Media Processing Library
//!
//! This crate provides image re-encoding and the bounded-concurrency batch
//! upload pipeline built on top of it.

pub mod compression;
pub mod image;
pub mod source;
pub mod upload;

// Re-export commonly used types
pub use compression::{ImageCompressor, OutputFormat};
pub use crate::image::{ImageTransformer, TransformError, TransformOutput};
pub use source::{ByteSource, FileSource, MemorySource, SourceError};
pub use upload::{BatchPipeline, PipelineError, Uploader};
