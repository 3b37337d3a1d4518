//! # Label Compositing
//!
//! Lays wrapped text onto a white raster.
//!
//! ## Geometry
//!
//! ```text
//!  ├pad┤                                   ├pad┤
//!  ┌───────────────────────────────────────────┐ ─┬─
//!  │                                           │  │ (height - text)/2, at least pad
//!  │    ┌─────────────────────────────────┐    │ ─┴─
//!  │    │ line 0        (cap height)      │    │
//!  │    │ ...           (line height)     │    │
//!  │    │ line n-1                        │    │
//!  │    └─────────────────────────────────┘    │
//!  │                                           │
//!  └───────────────────────────────────────────┘
//!       ├──────────── max width ──────────┤
//! ```
//!
//! - `pad = round(width * 0.04)`
//! - `line height = (cap height + descent) * 1.3`
//! - `text height = (lines - 1) * line height + cap height`
//!
//! Cap height is the ascent of `H`, descent is the descent of `g`.
//!
//! Lines whose descenders would fall below the bottom edge are dropped.
//! There is no error and no scrolling; [`Composition::truncated`] reports
//! how many lines were cut.

use crate::label::Alignment;

use super::font::TextBackend;
use super::raster::{Canvas, RasterImage};
use super::wrap::wrap_text;

/// Line spacing multiplier over cap height + descent.
pub const LEADING: f64 = 1.3;

/// Horizontal padding as a fraction of label width.
pub const PADDING_RATIO: f64 = 0.04;

/// Horizontal layout of a label of a given pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub padding: f64,
    pub max_width: f64,
}

impl Geometry {
    pub fn new(width: u32, height: u32) -> Self {
        let padding = (width as f64 * PADDING_RATIO).round();
        Self {
            width,
            height,
            padding,
            max_width: width as f64 - 2.0 * padding,
        }
    }

    /// X coordinate each line is aligned against.
    pub fn anchor_x(&self, align: Alignment) -> f64 {
        match align {
            Alignment::Left => self.padding,
            Alignment::Center => self.width as f64 / 2.0,
            Alignment::Right => self.width as f64 - self.padding,
        }
    }
}

/// Vertical metrics derived from the font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub cap_height: f64,
    pub descent: f64,
    pub line_height: f64,
}

impl LineMetrics {
    pub fn measure<B: TextBackend + ?Sized>(backend: &B) -> Self {
        let cap_height = backend.measure("H").ascent;
        let descent = backend.measure("g").descent;
        Self {
            cap_height,
            descent,
            line_height: (cap_height + descent) * LEADING,
        }
    }

    /// Height of a block of `lines` lines, from the top of the first cap to
    /// the last baseline.
    pub fn block_height(&self, lines: usize) -> f64 {
        lines.saturating_sub(1) as f64 * self.line_height + self.cap_height
    }
}

/// A line that made it onto the raster.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Left edge of the drawn line
    pub left: f64,
    pub baseline: f64,
    /// Drawn width, after squeezing to the max width
    pub width: f64,
}

/// Output of [`compose`].
#[derive(Debug, Clone)]
pub struct Composition {
    pub raster: RasterImage,
    pub geometry: Geometry,
    pub metrics: LineMetrics,
    /// Lines drawn, top to bottom
    pub lines: Vec<PlacedLine>,
    /// Lines that did not fit below the last drawn one
    pub truncated: usize,
}

impl Composition {
    /// Whether any line was dropped for lack of vertical space.
    pub fn overflowed(&self) -> bool {
        self.truncated > 0
    }
}

/// Wrap `text` and draw it centered vertically on a `width × height` raster.
///
/// Both dimensions must already be byte aligned.
pub fn compose<B: TextBackend + ?Sized>(
    width: u32,
    height: u32,
    text: &str,
    align: Alignment,
    backend: &B,
) -> Composition {
    let mut canvas = Canvas::new(width, height);
    canvas.fill(false);

    let geometry = Geometry::new(width, height);
    let metrics = LineMetrics::measure(backend);
    let anchor_x = geometry.anchor_x(align);

    let wrapped = wrap_text(backend, text, geometry.max_width);
    let block = metrics.block_height(wrapped.len());
    let mut y = geometry.padding.max((height as f64 - block) / 2.0) + metrics.cap_height;

    let mut lines = Vec::with_capacity(wrapped.len());
    let mut truncated = 0;

    for (i, line) in wrapped.iter().enumerate() {
        if y + metrics.descent > height as f64 {
            truncated = wrapped.len() - i;
            break;
        }

        let drawn = backend.measure(line).width.min(geometry.max_width);
        let left = match align {
            Alignment::Left => anchor_x,
            Alignment::Center => anchor_x - drawn / 2.0,
            Alignment::Right => anchor_x - drawn,
        };

        if !line.is_empty() {
            backend.draw(&mut canvas, line, left, y, geometry.max_width);
        }
        lines.push(PlacedLine {
            text: line.clone(),
            left,
            baseline: y,
            width: drawn,
        });

        y += metrics.line_height;
    }

    Composition {
        raster: canvas.finish(),
        geometry,
        metrics,
        lines,
        truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::font::TextMetrics;

    /// 8px per character; draws each non-space char as a solid block from
    /// cap top to baseline.
    struct BlockFont;

    impl TextBackend for BlockFont {
        fn measure(&self, text: &str) -> TextMetrics {
            TextMetrics {
                width: text.chars().count() as f64 * 8.0,
                ascent: if text.contains('H') { 10.0 } else { 6.0 },
                descent: if text.contains('g') { 4.0 } else { 0.0 },
            }
        }

        fn draw(&self, canvas: &mut Canvas, text: &str, left: f64, baseline: f64, max_width: f64) {
            let width = (text.chars().count() as f64 * 8.0).min(max_width);
            let left = left.round() as i64;
            let baseline = baseline.round() as i64;
            for x in left..left + width as i64 {
                for y in baseline - 10..baseline {
                    canvas.set_pixel(x, y, true);
                }
            }
        }
    }

    #[test]
    fn test_geometry() {
        let g = Geometry::new(160, 80);
        assert_eq!(g.padding, 6.0);
        assert_eq!(g.max_width, 148.0);
        assert_eq!(g.anchor_x(Alignment::Left), 6.0);
        assert_eq!(g.anchor_x(Alignment::Center), 80.0);
        assert_eq!(g.anchor_x(Alignment::Right), 154.0);
    }

    #[test]
    fn test_line_metrics() {
        let m = LineMetrics::measure(&BlockFont);
        assert_eq!(m.cap_height, 10.0);
        assert_eq!(m.descent, 4.0);
        assert!((m.line_height - 18.2).abs() < 1e-9);
        assert_eq!(m.block_height(1), 10.0);
        assert!((m.block_height(3) - 46.4).abs() < 1e-9);
    }

    #[test]
    fn test_single_line_centered() {
        let c = compose(160, 80, "HELLO", Alignment::Center, &BlockFont);
        assert_eq!(c.lines.len(), 1);
        assert!(!c.overflowed());

        let line = &c.lines[0];
        // (80 - 10) / 2 + 10
        assert_eq!(line.baseline, 45.0);
        assert_eq!(line.left, 80.0 - 20.0);

        let (min_x, min_y, max_x, max_y) = c.raster.ink_bounds().unwrap();
        assert_eq!((min_x, max_x), (60, 99));
        assert_eq!((min_y, max_y), (35, 44));
    }

    #[test]
    fn test_left_and_right_alignment() {
        let left = compose(160, 80, "AB", Alignment::Left, &BlockFont);
        assert_eq!(left.lines[0].left, 6.0);
        assert_eq!(left.raster.ink_bounds().unwrap().0, 6);

        let right = compose(160, 80, "AB", Alignment::Right, &BlockFont);
        assert_eq!(right.lines[0].left, 154.0 - 16.0);
        assert_eq!(right.raster.ink_bounds().unwrap().2, 153);
    }

    #[test]
    fn test_background_is_white() {
        let c = compose(64, 32, "", Alignment::Center, &BlockFont);
        assert_eq!(c.raster.ink_count(), 0);
        assert_eq!(c.lines.len(), 1);
    }

    #[test]
    fn test_tall_block_starts_at_padding() {
        // 5 lines: block = 4 * 18.2 + 10 = 82.8 > height, so top is clamped to padding
        let c = compose(64, 80, "A\nB\nC\nD\nE", Alignment::Left, &BlockFont);
        let pad = c.geometry.padding;
        assert_eq!(pad, 3.0);
        assert_eq!(c.lines[0].baseline, pad + 10.0);
    }

    #[test]
    fn test_overflow_truncates_silently() {
        // Baselines at 13, 31.2, 49.4, 67.6 (+4 descent fits in 80), 85.8 does not
        let c = compose(64, 80, "A\nB\nC\nD\nE\nF", Alignment::Left, &BlockFont);
        assert_eq!(c.lines.len(), 4);
        assert_eq!(c.truncated, 2);
        assert!(c.overflowed());
        assert_eq!(
            c.lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>(),
            vec!["A", "B", "C", "D"]
        );
    }

    #[test]
    fn test_oversized_line_is_squeezed() {
        let text = "X".repeat(30); // 240px natural width
        let c = compose(160, 80, &text, Alignment::Center, &BlockFont);
        assert_eq!(c.lines[0].width, 148.0);
        let (min_x, _, max_x, _) = c.raster.ink_bounds().unwrap();
        assert_eq!((min_x, max_x), (6, 153));
    }

    #[test]
    fn test_raster_dimensions_preserved() {
        let c = compose(104, 24, "tiny", Alignment::Center, &BlockFont);
        assert_eq!(c.raster.width(), 104);
        assert_eq!(c.raster.height(), 24);
    }
}
