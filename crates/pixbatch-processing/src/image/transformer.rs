//! Image transformer - decode, resize and re-encode one image
//!
//! The transformer resolves the directive's format token against the configured
//! [`FormatPolicy`] before touching the pixels, so a rejected format never pays
//! for a decode.

use crate::compression::{ImageCompressor, OutputFormat};
use crate::image::resize::ImageResize;
use bytes::Bytes;
use image::GenericImageView;
use pixbatch_core::{Directive, ErrorMetadata, FailureKind, FormatPolicy};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Invalid format: {0:?} is not one of webp, jpeg, png, avif")]
    InvalidFormat(String),
}

impl ErrorMetadata for TransformError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            TransformError::Decode(_) => FailureKind::Decode,
            TransformError::Encode(_) => FailureKind::Encode,
            TransformError::InvalidFormat(_) => FailureKind::InvalidFormat,
        }
    }
}

/// Re-encoded image ready for upload
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub data: Bytes,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl TransformOutput {
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Stateless image transformer parameterised by the format policy
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTransformer {
    policy: FormatPolicy,
}

impl ImageTransformer {
    pub fn new(policy: FormatPolicy) -> Self {
        Self { policy }
    }

    /// Resolve a directive format token under this transformer's policy.
    pub fn resolve_format(&self, token: &str) -> Result<OutputFormat, TransformError> {
        match OutputFormat::parse(token) {
            Ok(format) => Ok(format),
            Err(e) => match self.policy {
                FormatPolicy::FallbackToWebp => {
                    tracing::warn!(
                        requested = %token,
                        fallback = %OutputFormat::WebP,
                        "Unsupported output format, falling back"
                    );
                    Ok(OutputFormat::WebP)
                }
                FormatPolicy::Reject => Err(e),
            },
        }
    }

    /// Decode `data`, apply the directive's fit-inside bounds and re-encode.
    ///
    /// Returns the complete encoded output or an error, never partial bytes.
    pub fn transform(
        &self,
        data: &[u8],
        directive: &Directive,
    ) -> Result<TransformOutput, TransformError> {
        let start = std::time::Instant::now();
        let format = self.resolve_format(directive.format())?;

        let img = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| TransformError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| TransformError::Decode(e.to_string()))?;

        let (orig_width, orig_height) = img.dimensions();

        let img = if directive.has_resize() {
            ImageResize::apply_fit_inside(img, directive.width(), directive.height())
        } else {
            img
        };
        let (width, height) = img.dimensions();

        let data = ImageCompressor::compress(&img, format, directive.quality())?;

        tracing::debug!(
            orig_width = orig_width,
            orig_height = orig_height,
            width = width,
            height = height,
            format = %format,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image transformed"
        );

        Ok(TransformOutput {
            data,
            format,
            width,
            height,
        })
    }
}
