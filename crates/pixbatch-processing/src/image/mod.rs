//! Image transform module
//!
//! Decoding, fit-inside resizing and re-encoding of a single image. All of it
//! is synchronous and CPU-bound; callers run it on the blocking pool.

pub mod resize;
pub mod transformer;

pub use resize::ImageResize;
pub use transformer::{ImageTransformer, TransformError, TransformOutput};
