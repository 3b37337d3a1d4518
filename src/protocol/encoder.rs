//! # Packed Row Encoding
//!
//! ## Bit Packing
//!
//! Each row is packed MSB-first, 1 = black:
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0x0F = 00001111 = ░░░░████
//! ```
//!
//! ## Anchor Side
//!
//! Narrow label printers feed the label sideways: the printhead spans the
//! label's height and the label's left edge comes out first.
//!
//! ```text
//!  Top (as drawn)             Left (rotated 90° clockwise)
//!  ┌──────────────┐           ┌──────┐
//!  │ A ──────► B  │           │ C  A │  row 0 = label column 0
//!  │              │           │ │  │ │
//!  │ C ──────► D  │           │ ▼  ▼ │
//!  └──────────────┘           │ D  B │
//!                             └──────┘
//! ```

use crate::error::EtiquetaError;
use crate::render::RasterImage;
use crate::render::raster::pack_row;

/// Which edge of the label leads through the printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorSide {
    /// Label is printed sideways; its left edge leads
    #[default]
    Left,
    /// Label is printed as drawn; its top edge leads
    Top,
}

/// A raster in device orientation, ready for a print task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Dots per row (across the printhead)
    pub cols: u32,
    /// Packed rows in feed order, `cols / 8` bytes each
    pub rows: Vec<Vec<u8>>,
}

impl EncodedImage {
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Bytes per row.
    pub fn row_bytes(&self) -> usize {
        self.cols.div_ceil(8) as usize
    }

    /// Whether a row carries no black dots (devices can skip these).
    pub fn is_blank_row(&self, index: usize) -> bool {
        self.rows
            .get(index)
            .is_none_or(|row| row.iter().all(|&b| b == 0))
    }
}

/// Converts a raster to the device's page representation.
pub trait ImageEncoder: Send + Sync {
    fn encode(&self, raster: &RasterImage, anchor: AnchorSide) -> Result<EncodedImage, EtiquetaError>;
}

/// Packs rows 8 dots per byte, rotating for [`AnchorSide::Left`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PackedRowEncoder;

impl ImageEncoder for PackedRowEncoder {
    fn encode(&self, raster: &RasterImage, anchor: AnchorSide) -> Result<EncodedImage, EtiquetaError> {
        let (width, height) = (raster.width(), raster.height());
        if width == 0 || height == 0 {
            return Err(EtiquetaError::Encode(format!(
                "empty raster {}x{}",
                width, height
            )));
        }

        match anchor {
            AnchorSide::Top => Ok(EncodedImage {
                cols: width,
                rows: raster.packed_rows(),
            }),
            AnchorSide::Left => {
                // Output row r is source column r read bottom to top.
                let rows = (0..width)
                    .map(|x| {
                        let column: Vec<u8> = (0..height)
                            .rev()
                            .map(|y| raster.is_black(x, y) as u8)
                            .collect();
                        pack_row(&column)
                    })
                    .collect();
                Ok(EncodedImage { cols: height, rows })
            }
        }
    }
}
