use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Target size for a fit-inside resize, or `None` when the image already fits.
    ///
    /// Aspect ratio is preserved and the result never exceeds the source
    /// dimensions. A missing bound leaves that axis unconstrained.
    pub fn fit_inside(
        orig_width: u32,
        orig_height: u32,
        max_width: Option<u32>,
        max_height: Option<u32>,
    ) -> Option<(u32, u32)> {
        if orig_width == 0 || orig_height == 0 {
            return None;
        }

        let scale_width = max_width.map_or(1.0, |w| w as f64 / orig_width as f64);
        let scale_height = max_height.map_or(1.0, |h| h as f64 / orig_height as f64);
        let scale = scale_width.min(scale_height).min(1.0);

        if scale >= 1.0 {
            return None;
        }

        let width = ((orig_width as f64 * scale).round() as u32).max(1);
        let height = ((orig_height as f64 * scale).round() as u32).max(1);

        if (width, height) == (orig_width, orig_height) {
            None
        } else {
            Some((width, height))
        }
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Apply a fit-inside resize. Images that already fit are returned unchanged.
    pub fn apply_fit_inside(
        img: DynamicImage,
        max_width: Option<u32>,
        max_height: Option<u32>,
    ) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();

        match Self::fit_inside(orig_width, orig_height, max_width, max_height) {
            Some((width, height)) => {
                let filter = Self::select_filter(orig_width, orig_height, width, height);
                img.resize_exact(width, height, filter)
            }
            None => img,
        }
    }
}
