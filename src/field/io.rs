//! Convenience helpers for loading confidence maps via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Grayscale intensities
//! are scaled from `[0, 255]` to `[0, 1]`.

use crate::field::Heatmap;
use crate::util::{DetectError, DetectResult};
use std::path::Path;

/// Creates a heatmap from a grayscale image buffer.
pub fn heatmap_from_gray_image(img: &image::GrayImage) -> DetectResult<Heatmap> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data: Vec<f32> = img.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
    Heatmap::from_values(data, width, height)
}

/// Creates a heatmap from a dynamic image, converting to grayscale first.
pub fn heatmap_from_dynamic_image(img: &image::DynamicImage) -> DetectResult<Heatmap> {
    let gray = img.to_luma8();
    heatmap_from_gray_image(&gray)
}

/// Loads an image from disk and converts it to a heatmap.
pub fn load_heatmap<P: AsRef<Path>>(path: P) -> DetectResult<Heatmap> {
    let img = image::open(path).map_err(|err| DetectError::ImageIo {
        reason: err.to_string(),
    })?;
    heatmap_from_dynamic_image(&img)
}
