use crate::image::TransformError;
use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat};
use pixbatch_core::constants::{MAX_QUALITY, MIN_QUALITY};
use std::io::Cursor;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Encoder speed for AVIF (0 slowest - 10 fastest)
const AVIF_SPEED: u8 = 6;

/// Output format for re-encoded images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    WebP,
    Jpeg,
    Png,
    Avif,
}

impl OutputFormat {
    /// Parse a directive format token. `jpg` is accepted as an alias of `jpeg`.
    pub fn parse(s: &str) -> Result<Self, TransformError> {
        match s.trim().to_lowercase().as_str() {
            "webp" => Ok(OutputFormat::WebP),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "avif" => Ok(OutputFormat::Avif),
            _ => Err(TransformError::InvalidFormat(s.to_string())),
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::WebP => "image/webp",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Avif => "image/avif",
        }
    }

    /// File extension without the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::WebP => "webp",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Avif => "avif",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Map the 1-100 directive scale onto a codec quality parameter.
///
/// mozjpeg, libwebp and ravif all take 0-100, so the value passes through
/// after clamping.
pub fn codec_quality(quality: u8) -> f32 {
    quality.clamp(MIN_QUALITY, MAX_QUALITY) as f32
}

/// Encoder front-end over mozjpeg, libwebp, ravif and the `image` PNG writer
pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode `img` as `format`. Quality is ignored for PNG.
    pub fn compress(
        img: &DynamicImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<Bytes, TransformError> {
        let quality = codec_quality(quality);

        let data = match format {
            OutputFormat::Jpeg => Self::compress_jpeg(img, quality)?,
            OutputFormat::Png => Self::compress_png(img)?,
            OutputFormat::WebP => Self::compress_webp(img, quality)?,
            OutputFormat::Avif => Self::compress_avif(img, quality)?,
        };

        tracing::debug!(
            format = %format,
            quality = quality,
            size_bytes = data.len(),
            "Image encoded"
        );

        Ok(data)
    }

    /// Compress to JPEG using mozjpeg
    fn compress_jpeg(img: &DynamicImage, quality: f32) -> Result<Bytes, TransformError> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        // libjpeg reports fatal errors by unwinding
        let encoded = catch_unwind(AssertUnwindSafe(|| -> std::io::Result<Vec<u8>> {
            let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
            comp.set_size(width as usize, height as usize);
            comp.set_quality(quality);
            comp.set_progressive_mode();
            comp.set_optimize_coding(true);

            let mut comp = comp.start_compress(Vec::new())?;
            comp.write_scanlines(rgb_img.as_raw())?;
            comp.finish()
        }));

        match encoded {
            Ok(Ok(jpeg_data)) => Ok(Bytes::from(jpeg_data)),
            Ok(Err(e)) => Err(TransformError::Encode(format!("jpeg: {}", e))),
            Err(_) => Err(TransformError::Encode(
                "jpeg: encoder aborted".to_string(),
            )),
        }
    }

    /// Compress to PNG (lossless, default compression level)
    fn compress_png(img: &DynamicImage) -> Result<Bytes, TransformError> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        img.write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| TransformError::Encode(format!("png: {}", e)))?;

        Ok(Bytes::from(buffer))
    }

    /// Compress to lossy WebP
    fn compress_webp(img: &DynamicImage, quality: f32) -> Result<Bytes, TransformError> {
        let (width, height) = img.dimensions();

        // Convert to RGBA for WebP encoding
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder
            .encode_simple(false, quality)
            .map_err(|e| TransformError::Encode(format!("webp: {:?}", e)))?;

        Ok(Bytes::copy_from_slice(&webp_data))
    }

    /// Compress to AVIF
    fn compress_avif(img: &DynamicImage, quality: f32) -> Result<Bytes, TransformError> {
        let (width, height) = img.dimensions();

        let rgb_img = img.to_rgb8();
        let rgb_data: Vec<rgb::RGB8> = rgb_img
            .as_raw()
            .chunks_exact(3)
            .map(|chunk| rgb::RGB8::new(chunk[0], chunk[1], chunk[2]))
            .collect();

        let img_buf = ravif::Img::new(rgb_data.as_slice(), width as usize, height as usize);

        let encoder = ravif::Encoder::new()
            .with_quality(quality)
            .with_speed(AVIF_SPEED);

        let avif_data = encoder
            .encode_rgb(img_buf)
            .map_err(|e| TransformError::Encode(format!("avif: {}", e)))?;

        Ok(Bytes::from(avif_data.avif_file))
    }
}
