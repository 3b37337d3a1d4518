//! # Rendering Module
//!
//! Turns a [`LabelConfig`] into device-ready pixels.
//!
//! ```text
//! LabelConfig ─► units (mm/pt → dots, byte align)
//!             ─► wrap   (lines, measured by a TextBackend)
//!             ─► compose (white raster, centered text)
//!             ─► RasterImage ─┬─► preview (display copy)
//!                             └─► print session
//! ```
//!
//! ## Modules
//!
//! - [`font`]: Measurement trait and the Spleen bitmap backend
//! - [`wrap`]: Greedy word wrapping
//! - [`raster`]: Canvas and frozen raster buffers
//! - [`compose`]: Padding, alignment and vertical centering
//! - [`preview`]: Nearest-neighbor display previews
//!
//! ## Usage Example
//!
//! ```
//! use etiqueta::label::LabelConfig;
//! use etiqueta::printer::PrinterConfig;
//! use etiqueta::render;
//!
//! let config = LabelConfig {
//!     text: "2024-01-01".to_string(),
//!     width_mm: 20.0,
//!     height_mm: 10.0,
//!     ..Default::default()
//! };
//!
//! let label = render::render_label(&config, &PrinterConfig::D110);
//! assert_eq!(label.raster.width(), 160);
//! assert_eq!(label.raster.height(), 80);
//! ```

pub mod compose;
pub mod font;
pub mod preview;
pub mod raster;
pub mod wrap;

pub use compose::{Composition, PlacedLine};
pub use font::{SpleenFont, TextBackend, TextMetrics};
pub use raster::RasterImage;

use crate::label::LabelConfig;
use crate::printer::PrinterConfig;
use crate::units;

/// Raster dimensions for a label at the given density, byte aligned.
pub fn label_dimensions(config: &LabelConfig, dpi: u16) -> (u32, u32) {
    let width = units::align_to_byte_boundary(units::mm_to_px(config.width_mm, dpi));
    let height = units::align_to_byte_boundary(units::mm_to_px(config.height_mm, dpi));
    (width, height)
}

/// The Spleen font sized and weighted for a label.
pub fn font_for_label(config: &LabelConfig, dpi: u16) -> SpleenFont {
    SpleenFont::new(units::pt_to_px(config.font_size, dpi), config.bold)
}

/// Render a label with the built-in bitmap font.
pub fn render_label(config: &LabelConfig, printer: &PrinterConfig) -> Composition {
    let font = font_for_label(config, printer.dpi);
    render_label_with(config, printer.dpi, &font)
}

/// Render a label with a caller-supplied text backend.
///
/// The backend is used as-is; `font_size` and `bold` are the backend's concern.
pub fn render_label_with<B: TextBackend + ?Sized>(
    config: &LabelConfig,
    dpi: u16,
    backend: &B,
) -> Composition {
    let (width, height) = label_dimensions(config, dpi);
    let composition = compose::compose(width, height, &config.text, config.align, backend);

    tracing::debug!(
        width,
        height,
        lines = composition.lines.len(),
        truncated = composition.truncated,
        "label rendered"
    );

    composition
}
