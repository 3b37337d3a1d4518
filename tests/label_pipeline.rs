//! # Label Pipeline Tests
//!
//! End-to-end checks from `LabelConfig` to raster, encoded rows and preview,
//! using the built-in bitmap font.

use etiqueta::label::{Alignment, LabelConfig};
use etiqueta::printer::PrinterConfig;
use etiqueta::protocol::{AnchorSide, ImageEncoder, PackedRowEncoder};
use etiqueta::render::{self, preview};

fn date_label() -> LabelConfig {
    LabelConfig {
        text: "2024-01-01".to_string(),
        font_size: 12.0,
        bold: false,
        align: Alignment::Center,
        width_mm: 20.0,
        height_mm: 10.0,
    }
}

#[test]
fn test_date_label_geometry() {
    let label = render::render_label(&date_label(), &PrinterConfig::D110);

    assert_eq!(label.raster.width(), 160);
    assert_eq!(label.raster.height(), 80);
    assert_eq!(label.geometry.padding, 6.0);
    assert_eq!(label.geometry.max_width, 148.0);

    // One word, wider than the max width: kept on one line and squeezed
    assert_eq!(label.lines.len(), 1);
    assert_eq!(label.truncated, 0);
    let line = &label.lines[0];
    assert_eq!(line.text, "2024-01-01");
    assert_eq!(line.width, 148.0);
    assert_eq!(line.left, 6.0);

    let top = label
        .geometry
        .padding
        .max((80.0 - label.metrics.cap_height) / 2.0);
    assert_eq!(line.baseline, top + label.metrics.cap_height);
}

#[test]
fn test_date_label_ink_is_centered() {
    let label = render::render_label(&date_label(), &PrinterConfig::D110);
    let (min_x, min_y, max_x, max_y) = label.raster.ink_bounds().expect("label has ink");

    assert!(min_x >= 6, "ink starts inside the left padding at {}", min_x);
    assert!(max_x < 154, "ink ends inside the right padding at {}", max_x);

    let center_x = (min_x + max_x) as f64 / 2.0;
    assert!((center_x - 80.0).abs() <= 8.0, "horizontal center {}", center_x);

    let center_y = (min_y + max_y) as f64 / 2.0;
    assert!((center_y - 40.0).abs() <= 8.0, "vertical center {}", center_y);
}

#[test]
fn test_every_alignment_stays_inside_padding() {
    for align in [Alignment::Left, Alignment::Center, Alignment::Right] {
        let config = LabelConfig {
            text: "AB".to_string(),
            align,
            ..date_label()
        };
        let label = render::render_label(&config, &PrinterConfig::D110);
        let (min_x, _, max_x, _) = label.raster.ink_bounds().expect("label has ink");
        assert!(min_x >= 6, "{:?} starts at {}", align, min_x);
        assert!(max_x < 154, "{:?} ends at {}", align, max_x);
    }
}

#[test]
fn test_left_and_right_anchor_to_padding() {
    let left = render::render_label(
        &LabelConfig {
            text: "AB".to_string(),
            align: Alignment::Left,
            ..date_label()
        },
        &PrinterConfig::D110,
    );
    assert_eq!(left.lines[0].left, 6.0);

    let right = render::render_label(
        &LabelConfig {
            text: "AB".to_string(),
            align: Alignment::Right,
            ..date_label()
        },
        &PrinterConfig::D110,
    );
    let line = &right.lines[0];
    assert_eq!(line.left + line.width, 154.0);
}

#[test]
fn test_wrapping_keeps_words_whole() {
    let config = LabelConfig {
        text: "Best before end of March".to_string(),
        font_size: 6.0,
        width_mm: 20.0,
        height_mm: 20.0,
        ..Default::default()
    };
    let label = render::render_label(&config, &PrinterConfig::D110);

    assert!(label.lines.len() > 1);
    let joined: Vec<&str> = label
        .lines
        .iter()
        .flat_map(|line| line.text.split(' '))
        .collect();
    assert_eq!(joined, vec!["Best", "before", "end", "of", "March"]);
    for line in &label.lines {
        assert!(line.width <= label.geometry.max_width);
    }
}

#[test]
fn test_overflow_drops_bottom_lines() {
    let config = LabelConfig {
        text: "one\ntwo\nthree\nfour\nfive\nsix".to_string(),
        font_size: 14.0,
        width_mm: 40.0,
        height_mm: 6.0,
        ..Default::default()
    };
    let label = render::render_label(&config, &PrinterConfig::D110);

    assert!(label.overflowed());
    assert_eq!(label.lines.len() + label.truncated, 6);
    for line in &label.lines {
        assert!(line.baseline + label.metrics.descent <= label.raster.height() as f64);
    }
}

#[test]
fn test_blank_paragraph_keeps_its_row() {
    let config = LabelConfig {
        text: "A\n\nB".to_string(),
        width_mm: 40.0,
        height_mm: 30.0,
        ..Default::default()
    };
    let label = render::render_label(&config, &PrinterConfig::D110);

    let texts: Vec<&str> = label.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["A", "", "B"]);
    let gap = label.lines[2].baseline - label.lines[0].baseline;
    assert!((gap - 2.0 * label.metrics.line_height).abs() < 1e-9);
}

#[test]
fn test_empty_text_is_white() {
    let label = render::render_label(&LabelConfig::new(""), &PrinterConfig::D110);
    assert_eq!(label.raster.ink_count(), 0);
    assert_eq!(label.raster.ink_bounds(), None);
}

#[test]
fn test_bold_adds_ink() {
    let regular = render::render_label(&date_label(), &PrinterConfig::D110);
    let bold = render::render_label(
        &LabelConfig {
            bold: true,
            ..date_label()
        },
        &PrinterConfig::D110,
    );
    assert!(bold.raster.ink_count() > regular.raster.ink_count());
}

#[test]
fn test_raster_encodes_for_left_anchor() {
    let label = render::render_label(&date_label(), &PrinterConfig::D110);
    let encoded = PackedRowEncoder
        .encode(&label.raster, AnchorSide::Left)
        .unwrap();

    // Rotated: one output row per source column, one bit per source row
    assert_eq!(encoded.row_count(), 160);
    assert_eq!(encoded.cols, 80);
    assert_eq!(encoded.row_bytes(), 10);
    assert!(encoded.is_blank_row(0));
    assert!((0..160).any(|row| !encoded.is_blank_row(row)));
}

#[test]
fn test_preview_of_date_label() {
    let label = render::render_label(&date_label(), &PrinterConfig::D110);
    let image = preview::project_preview(&label.raster);

    // Narrower than the preview limit: copied at 1:1
    assert_eq!(image.dimensions(), (160, 80));
    for (x, y, pixel) in image.enumerate_pixels() {
        let expected = if label.raster.is_black(x, y) { 0 } else { 255 };
        assert_eq!(pixel.0[0], expected);
    }

    let png = preview::preview_png(&label.raster).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}

#[test]
fn test_wide_label_preview_is_downscaled() {
    let config = LabelConfig {
        text: "Shelf 12".to_string(),
        width_mm: 75.0,
        height_mm: 12.0,
        ..Default::default()
    };
    let label = render::render_label(&config, &PrinterConfig::B1);
    assert!(label.raster.width() > preview::MAX_PREVIEW_WIDTH);

    let image = preview::project_preview(&label.raster);
    assert_eq!(image.width(), preview::MAX_PREVIEW_WIDTH);
    assert!(image.pixels().any(|p| p.0[0] == 0));
}
