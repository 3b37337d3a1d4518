//! # Preview Projection
//!
//! Produces a display-sized copy of a label raster. Sampling is
//! nearest-neighbor (pixel centers) so dots stay crisp, the way they'll look
//! on the label. The print path never sees the preview.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};

use super::raster::{RasterImage, encode_png};
use crate::error::EtiquetaError;

/// Previews are never wider than this.
pub const MAX_PREVIEW_WIDTH: u32 = 400;

/// Scale factor applied to a raster of the given width. Never enlarges.
pub fn preview_scale(source_width: u32, max_width: u32) -> f64 {
    (max_width as f64 / source_width as f64).min(1.0)
}

/// Downsample a raster to fit [`MAX_PREVIEW_WIDTH`].
pub fn project_preview(raster: &RasterImage) -> GrayImage {
    project_preview_with_width(raster, MAX_PREVIEW_WIDTH)
}

/// Downsample a raster to fit `max_width`.
pub fn project_preview_with_width(raster: &RasterImage, max_width: u32) -> GrayImage {
    if raster.width() == 0 || raster.height() == 0 {
        return GrayImage::from_pixel(1, 1, Luma([255u8]));
    }

    let scale = preview_scale(raster.width(), max_width);
    let dst_w = ((raster.width() as f64 * scale).round() as u32).max(1);
    let dst_h = ((raster.height() as f64 * scale).round() as u32).max(1);

    imageops::resize(&raster.to_gray_image(), dst_w, dst_h, FilterType::Nearest)
}

/// Render the preview as PNG bytes.
pub fn preview_png(raster: &RasterImage) -> Result<Vec<u8>, EtiquetaError> {
    encode_png(&project_preview(raster))
}
