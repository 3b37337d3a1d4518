//! # Device Image Encoding
//!
//! The label printer's wire protocol lives in its driver. This module only
//! defines the hand-off: a finished [`RasterImage`](crate::render::RasterImage)
//! goes through an [`ImageEncoder`] and comes out as packed rows in the
//! orientation the printhead expects.
//!
//! ## Module Structure
//!
//! - [`encoder`]: `ImageEncoder` trait, `AnchorSide` and the default packed-row encoder
//!
//! ## Usage Example
//!
//! ```
//! use etiqueta::protocol::{AnchorSide, ImageEncoder, PackedRowEncoder};
//! use etiqueta::render::raster::Canvas;
//!
//! let raster = Canvas::new(160, 80).finish();
//! let encoded = PackedRowEncoder.encode(&raster, AnchorSide::Left).unwrap();
//!
//! // Rotated: one row per label column, 80 dots = 10 bytes across
//! assert_eq!(encoded.rows.len(), 160);
//! assert_eq!(encoded.rows[0].len(), 10);
//! ```

pub mod encoder;

pub use encoder::{AnchorSide, EncodedImage, ImageEncoder, PackedRowEncoder};
