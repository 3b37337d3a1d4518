//! # Monochrome Raster Buffers
//!
//! [`Canvas`] is the mutable drawing surface used while a label is composed;
//! [`RasterImage`] is the frozen result handed to the preview or print path.
//!
//! Pixels are stored one byte each: `1` = black (burned dot), `0` = white.
//! Both dimensions are multiples of 8 so every row packs into whole bytes:
//!
//! ```text
//! pixels:  1 1 0 0 1 0 1 0  0 0 0 0 0 0 0 1
//! packed:  0b11001010       0b00000001
//! ```

use image::{GrayImage, Luma};

use crate::error::EtiquetaError;

/// A finished label bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixel bytes, one per pixel.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Whether the pixel at (x, y) is black. Out-of-range reads are white.
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.pixels[(y * self.width + x) as usize] != 0
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = (y * self.width) as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Number of black pixels.
    pub fn ink_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != 0).count()
    }

    /// Tight bounding box of black pixels as `(min_x, min_y, max_x, max_y)`, inclusive.
    ///
    /// Returns `None` for an all-white raster.
    pub fn ink_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..self.height {
            for (x, &p) in self.row(y).iter().enumerate() {
                if p == 0 {
                    continue;
                }
                let x = x as u32;
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        bounds
    }

    /// Rows packed MSB-first, `width / 8` bytes each.
    pub fn packed_rows(&self) -> Vec<Vec<u8>> {
        (0..self.height).map(|y| pack_row(self.row(y))).collect()
    }

    /// Convert to an 8-bit grayscale image (black = 0, white = 255).
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.is_black(x, y) {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        })
    }

    /// Encode as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, EtiquetaError> {
        encode_png(&self.to_gray_image())
    }
}

/// Pack a row of 0/1 pixels into bytes, MSB first. A trailing partial byte
/// is padded with white.
pub fn pack_row(row: &[u8]) -> Vec<u8> {
    row.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &p)| if p != 0 { byte | (0x80 >> i) } else { byte })
        })
        .collect()
}

/// Encode a grayscale image as PNG bytes.
pub fn encode_png(img: &GrayImage) -> Result<Vec<u8>, EtiquetaError> {
    use image::ImageEncoder;

    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::L8,
        )
        .map_err(|e: image::ImageError| EtiquetaError::Image(e.to_string()))?;

    Ok(png_bytes)
}

/// Mutable drawing surface. Writes outside the buffer are clipped.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Allocate a white canvas.
    ///
    /// Callers pass byte-aligned dimensions (see
    /// [`units::align_to_byte_boundary`](crate::units::align_to_byte_boundary)).
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width % 8 == 0, "width {} not byte aligned", width);
        debug_assert!(height % 8 == 0, "height {} not byte aligned", height);
        Self {
            width,
            height,
            pixels: vec![0u8; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill the whole canvas.
    pub fn fill(&mut self, black: bool) {
        self.pixels.fill(black as u8);
    }

    /// Set a pixel (signed coordinates so glyphs may hang off any edge).
    #[inline]
    pub fn set_pixel(&mut self, x: i64, y: i64, black: bool) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels[idx] = black as u8;
    }

    /// Freeze into an immutable raster.
    pub fn finish(self) -> RasterImage {
        RasterImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_row() {
        assert_eq!(pack_row(&[1, 1, 0, 0, 1, 0, 1, 0]), vec![0b11001010]);
        assert_eq!(
            pack_row(&[0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1]),
            vec![0x00, 0x81]
        );
        // Partial trailing byte is padded with white
        assert_eq!(pack_row(&[1, 1, 1]), vec![0b11100000]);
    }

    #[test]
    fn test_new_canvas_is_white() {
        let raster = Canvas::new(16, 8).finish();
        assert_eq!(raster.ink_count(), 0);
        assert_eq!(raster.ink_bounds(), None);
        assert_eq!(raster.pixels().len(), 16 * 8);
    }

    #[test]
    fn test_set_pixel_clips() {
        let mut canvas = Canvas::new(8, 8);
        canvas.set_pixel(-1, 0, true);
        canvas.set_pixel(0, -1, true);
        canvas.set_pixel(8, 0, true);
        canvas.set_pixel(0, 8, true);
        canvas.set_pixel(3, 4, true);
        let raster = canvas.finish();
        assert_eq!(raster.ink_count(), 1);
        assert!(raster.is_black(3, 4));
        assert!(!raster.is_black(100, 100));
    }

    #[test]
    fn test_ink_bounds() {
        let mut canvas = Canvas::new(16, 16);
        canvas.set_pixel(2, 5, true);
        canvas.set_pixel(9, 3, true);
        canvas.set_pixel(4, 11, true);
        assert_eq!(canvas.finish().ink_bounds(), Some((2, 3, 9, 11)));
    }

    #[test]
    fn test_packed_rows() {
        let mut canvas = Canvas::new(16, 8);
        canvas.set_pixel(0, 0, true);
        canvas.set_pixel(15, 7, true);
        let rows = canvas.finish().packed_rows();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0], vec![0x80, 0x00]);
        assert_eq!(rows[7], vec![0x00, 0x01]);
    }

    #[test]
    fn test_gray_image_and_png() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill(true);
        canvas.set_pixel(0, 0, false);
        let raster = canvas.finish();
        let img = raster.to_gray_image();
        assert_eq!(img.get_pixel(0, 0).0, [255]);
        assert_eq!(img.get_pixel(1, 0).0, [0]);

        let png = raster.to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
