//! # Text Measurement and Glyph Drawing
//!
//! Layout and compositing only need two things from a font: how big a run
//! of text is, and a way to put it on a [`Canvas`]. Both go through the
//! [`TextBackend`] trait so the pipeline can run headless with any font.
//!
//! [`SpleenFont`] is the built-in backend: the Spleen monospace bitmap
//! family, scaled nearest-neighbor to the requested pixel size.
//!
//! ## Metrics
//!
//! ```text
//!         ┌──────┐  ─┬─ top of ink
//!         │ H  g │   │ ascent
//!  ───────┼──────┼──-┴─ baseline
//!         │    g │   │ descent
//!         └──────┘  ─┴─ bottom of ink
//! ```
//!
//! Ascent and descent are measured from inked pixels of the given text,
//! not from the font's declared line height. A character missing from the
//! face measures as the full-height box it is drawn with.

use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};

use super::raster::Canvas;

/// Measured extent of a run of text, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    /// Advance width of the run
    pub width: f64,
    /// Height of ink above the baseline
    pub ascent: f64,
    /// Depth of ink below the baseline
    pub descent: f64,
}

/// A sized, styled font that can measure and draw single lines.
pub trait TextBackend {
    /// Measure a run of text.
    fn measure(&self, text: &str) -> TextMetrics;

    /// Draw `text` with its left edge at `left` and its baseline at `baseline`.
    ///
    /// Lines wider than `max_width` are squeezed horizontally to fit.
    fn draw(&self, canvas: &mut Canvas, text: &str, left: f64, baseline: f64, max_width: f64);
}

/// Spleen source faces, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Spleen6x12,
    Spleen8x16,
    Spleen12x24,
}

impl Face {
    const ALL: [Face; 3] = [Face::Spleen6x12, Face::Spleen8x16, Face::Spleen12x24];

    fn cell(self) -> (u32, u32) {
        match self {
            Face::Spleen6x12 => (6, 12),
            Face::Spleen8x16 => (8, 16),
            Face::Spleen12x24 => (12, 24),
        }
    }

    fn data(self) -> &'static [u8] {
        match self {
            Face::Spleen6x12 => FONT_6X12,
            Face::Spleen8x16 => FONT_8X16,
            Face::Spleen12x24 => FONT_12X24,
        }
    }

    /// Largest face not taller than the target, so scaling mostly enlarges.
    fn for_pixel_size(pixel_size: u32) -> Face {
        Face::ALL
            .iter()
            .rev()
            .copied()
            .find(|face| face.cell().1 <= pixel_size)
            .unwrap_or(Face::Spleen6x12)
    }
}

/// Monospace bitmap font backend.
#[derive(Debug, Clone)]
pub struct SpleenFont {
    face: Face,
    pixel_size: u32,
    cell_width: u32,
    /// Baseline row within a scaled cell
    baseline_row: u32,
    /// Extra columns painted to the right of each ink pixel when bold
    overstrike: u32,
    /// Inked rows of each printable ASCII cell, `' '` through `'~'`
    ascii_ink: Vec<Option<(u32, u32)>>,
}

const ASCII_FIRST: char = ' ';
const ASCII_LAST: char = '~';

impl SpleenFont {
    /// A font whose cells are `pixel_size` pixels tall.
    pub fn new(pixel_size: u32, bold: bool) -> Self {
        let pixel_size = pixel_size.max(1);
        let face = Face::for_pixel_size(pixel_size);
        let (src_w, src_h) = face.cell();
        let cell_width = ((src_w * pixel_size) as f64 / src_h as f64).round().max(1.0) as u32;

        let mut font = Self {
            face,
            pixel_size,
            cell_width,
            baseline_row: pixel_size,
            overstrike: if bold { (pixel_size / 16).max(1) } else { 0 },
            ascii_ink: Vec::new(),
        };

        let ascii: String = (ASCII_FIRST..=ASCII_LAST).collect();
        let ascii_ink = font
            .glyph_cells(&ascii)
            .iter()
            .map(|cell| font.cell_ink(cell.as_deref()))
            .collect();
        font.ascii_ink = ascii_ink;

        // Baseline sits directly under the capital H.
        font.baseline_row = font
            .char_ink('H')
            .map(|(_, bottom)| bottom + 1)
            .unwrap_or((pixel_size as f64 * 0.8).round() as u32);

        font
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// Advance per character.
    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    pub fn is_bold(&self) -> bool {
        self.overstrike > 0
    }

    fn line_width(&self, chars: usize) -> u32 {
        if chars == 0 {
            return 0;
        }
        chars as u32 * self.cell_width + self.overstrike
    }

    /// Scaled cell bitmaps for each character; `None` where the face has no glyph.
    fn glyph_cells(&self, text: &str) -> Vec<Option<Vec<u8>>> {
        let Ok(mut font) = PSF2Font::new(self.face.data()) else {
            return text.chars().map(|_| None).collect();
        };
        let (src_w, src_h) = self.face.cell();

        text.chars()
            .map(|ch| {
                let utf8 = ch.to_string();
                let glyph = font.glyph_for_utf8(utf8.as_bytes())?;

                let mut src = vec![0u8; (src_w * src_h) as usize];
                for (row_y, row) in glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        if (row_y as u32) < src_h && (col_x as u32) < src_w && on {
                            src[row_y * src_w as usize + col_x] = 1;
                        }
                    }
                }

                let mut cell = vec![0u8; (self.cell_width * self.pixel_size) as usize];
                scale_bitmap(&src, src_w, src_h, &mut cell, self.cell_width, self.pixel_size);
                Some(cell)
            })
            .collect()
    }

    /// Inked rows of a cell, counting a missing glyph as its box.
    fn cell_ink(&self, cell: Option<&[u8]>) -> Option<(u32, u32)> {
        match cell {
            Some(cell) => self.ink_rows(cell),
            None => Some((0, self.pixel_size - 1)),
        }
    }

    fn char_ink(&self, ch: char) -> Option<(u32, u32)> {
        if (ASCII_FIRST..=ASCII_LAST).contains(&ch) {
            let index = ch as usize - ASCII_FIRST as usize;
            if let Some(ink) = self.ascii_ink.get(index) {
                return *ink;
            }
        }
        let mut buf = [0u8; 4];
        let cells = self.glyph_cells(ch.encode_utf8(&mut buf));
        self.cell_ink(cells.first().and_then(|cell| cell.as_deref()))
    }

    /// First and last inked rows of a scaled cell.
    fn ink_rows(&self, cell: &[u8]) -> Option<(u32, u32)> {
        let w = self.cell_width as usize;
        let mut rows = cell
            .chunks(w)
            .enumerate()
            .filter(|(_, row)| row.iter().any(|&p| p != 0))
            .map(|(y, _)| y as u32);
        let top = rows.next()?;
        let bottom = rows.last().unwrap_or(top);
        Some((top, bottom))
    }

    /// Render a line into a `width × pixel_size` buffer at natural size.
    fn render_line(&self, text: &str) -> (u32, Vec<u8>) {
        let chars = text.chars().count();
        let width = self.line_width(chars);
        let mut buffer = vec![0u8; (width * self.pixel_size) as usize];

        for (i, cell) in self.glyph_cells(text).into_iter().enumerate() {
            let origin = i as u32 * self.cell_width;
            let cell = cell.unwrap_or_else(|| box_cell(self.cell_width, self.pixel_size));

            for y in 0..self.pixel_size {
                for x in 0..self.cell_width {
                    if cell[(y * self.cell_width + x) as usize] == 0 {
                        continue;
                    }
                    for dx in 0..=self.overstrike {
                        let bx = origin + x + dx;
                        if bx < width {
                            buffer[(y * width + bx) as usize] = 1;
                        }
                    }
                }
            }
        }

        (width, buffer)
    }
}

impl TextBackend for SpleenFont {
    fn measure(&self, text: &str) -> TextMetrics {
        let chars = text.chars().count();
        let ink = text
            .chars()
            .filter_map(|ch| self.char_ink(ch))
            .fold(None, |acc: Option<(u32, u32)>, (top, bottom)| match acc {
                None => Some((top, bottom)),
                Some((t, b)) => Some((t.min(top), b.max(bottom))),
            });

        let (ascent, descent) = match ink {
            Some((top, bottom)) => (
                self.baseline_row.saturating_sub(top),
                (bottom + 1).saturating_sub(self.baseline_row),
            ),
            None => (0, 0),
        };

        TextMetrics {
            width: self.line_width(chars) as f64,
            ascent: ascent as f64,
            descent: descent as f64,
        }
    }

    fn draw(&self, canvas: &mut Canvas, text: &str, left: f64, baseline: f64, max_width: f64) {
        let (width, buffer) = self.render_line(text);
        if width == 0 {
            return;
        }

        let target_width = (max_width.floor().max(1.0) as u32).min(width);
        let left = left.round() as i64;
        let top = baseline.round() as i64 - self.baseline_row as i64;

        for y in 0..self.pixel_size {
            for tx in 0..target_width {
                let sx = tx * width / target_width;
                if buffer[(y * width + sx) as usize] != 0 {
                    canvas.set_pixel(left + tx as i64, top + y as i64, true);
                }
            }
        }
    }
}

/// Scale a bitmap from src dimensions to dst dimensions using nearest neighbor.
fn scale_bitmap(src: &[u8], src_w: u32, src_h: u32, dst: &mut [u8], dst_w: u32, dst_h: u32) {
    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = dx * src_w / dst_w;
            let sy = dy * src_h / dst_h;
            let src_idx = (sy * src_w + sx) as usize;
            let dst_idx = (dy * dst_w + dx) as usize;
            if src_idx < src.len() && dst_idx < dst.len() {
                dst[dst_idx] = src[src_idx];
            }
        }
    }
}

/// Outline box drawn for characters missing from the face.
fn box_cell(width: u32, height: u32) -> Vec<u8> {
    let mut cell = vec![0u8; (width * height) as usize];
    for x in 0..width {
        cell[x as usize] = 1;
        cell[((height - 1) * width + x) as usize] = 1;
    }
    for y in 0..height {
        cell[(y * width) as usize] = 1;
        cell[(y * width + width - 1) as usize] = 1;
    }
    cell
}
