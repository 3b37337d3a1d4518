//! # Unit Conversion
//!
//! Maps physical label measurements to device dots.
//!
//! ```text
//! dots = mm * dpi / 25.4
//! dots = pt * dpi / 72
//! ```
//!
//! All conversions round half away from zero. Raster rows sent to the
//! printer are packed 8 dots per byte, so every raster dimension goes
//! through [`align_to_byte_boundary`] before a buffer is allocated.
//!
//! ## Example
//!
//! ```
//! use etiqueta::units;
//!
//! let dots = units::mm_to_px(12.7, 203);
//! assert_eq!(dots, 102);
//! assert_eq!(units::align_to_byte_boundary(dots), 104);
//! ```
//!
//! Inputs are not validated here: a non-positive length is a caller bug.

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Typographic points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert a length in millimeters to dots at the given density.
#[inline]
pub fn mm_to_px(length_mm: f64, dpi: u16) -> u32 {
    round_to_dots(length_mm * dpi as f64 / MM_PER_INCH)
}

/// Convert a font size in points to dots at the given density.
#[inline]
pub fn pt_to_px(size_pt: f64, dpi: u16) -> u32 {
    round_to_dots(size_pt * dpi as f64 / POINTS_PER_INCH)
}

/// Round a dot count up to the next multiple of 8.
///
/// The result is never smaller than the input and never more than 7 larger.
#[inline]
pub fn align_to_byte_boundary(px: u32) -> u32 {
    px.div_ceil(8) * 8
}

/// `f64::round` already rounds half away from zero; negative lengths clamp to 0.
#[inline]
fn round_to_dots(value: f64) -> u32 {
    value.round().max(0.0) as u32
}
