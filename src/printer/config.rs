//! # Printer Configuration
//!
//! This module defines hardware profiles for supported label printers.
//!
//! ## Supported Printers
//!
//! | Model | Printhead (dots) | Resolution | Density | Task kind |
//! |-------|------------------|------------|---------|-----------|
//! | D110 | 96 | 203 DPI | 2 | D110 |
//! | D11 | 96 | 203 DPI | 2 | D11 |
//! | B1 | 384 | 203 DPI | 3 | B1 |
//!
//! ## Usage
//!
//! ```
//! use etiqueta::printer::PrinterConfig;
//!
//! let config = PrinterConfig::D110;
//! println!("{} prints at {} dpi", config.name, config.dpi);
//! assert_eq!(config.mm_to_dots(20.0), 160);
//! ```

use serde::{Deserialize, Serialize};

use crate::units;

/// Label media loaded in the printer.
///
/// Discriminants are the values the device expects in its print task header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelType {
    WithGaps = 1,
    Black = 2,
    Continuous = 3,
    Perforated = 4,
    Transparent = 5,
}

impl LabelType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// # Printer Configuration
///
/// Defines the hardware characteristics of a label printer.
///
/// - **dpi**: Raster resolution in dots per inch
/// - **printhead_dots**: Width of the printhead in dots
/// - **density**: Burn density used for every job (1-5)
/// - **label_type**: Media the printer is loaded with by default
/// - **task_kind**: Print task flavour used when the driver doesn't report one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Printer model name
    pub name: &'static str,

    /// Resolution in dots per inch
    pub dpi: u16,

    /// Printhead width in dots
    pub printhead_dots: u16,

    /// Print density level
    pub density: u8,

    /// Default label media
    pub label_type: LabelType,

    /// Fallback print task kind
    pub task_kind: &'static str,
}

impl PrinterConfig {
    /// # NIIMBOT D110
    ///
    /// 12mm printhead handheld label maker, the default target.
    pub const D110: Self = Self {
        name: "NIIMBOT D110",
        dpi: 203,
        printhead_dots: 96,
        density: 2,
        label_type: LabelType::WithGaps,
        task_kind: "D110",
    };

    /// # NIIMBOT D11
    pub const D11: Self = Self {
        name: "NIIMBOT D11",
        dpi: 203,
        printhead_dots: 96,
        density: 2,
        label_type: LabelType::WithGaps,
        task_kind: "D11",
    };

    /// # NIIMBOT B1
    ///
    /// 48mm printhead desktop printer. Needs a higher density for the same darkness.
    pub const B1: Self = Self {
        name: "NIIMBOT B1",
        dpi: 203,
        printhead_dots: 384,
        density: 3,
        label_type: LabelType::WithGaps,
        task_kind: "B1",
    };

    /// Calculate dots per millimeter
    #[inline]
    pub fn dots_per_mm(&self) -> f64 {
        self.dpi as f64 / units::MM_PER_INCH
    }

    /// Printhead width in millimeters
    #[inline]
    pub fn printhead_mm(&self) -> f64 {
        self.printhead_dots as f64 / self.dots_per_mm()
    }

    /// Convert millimeters to dots
    #[inline]
    pub fn mm_to_dots(&self, mm: f64) -> u32 {
        units::mm_to_px(mm, self.dpi)
    }

    /// Convert a font size in points to dots
    #[inline]
    pub fn pt_to_dots(&self, pt: f64) -> u32 {
        units::pt_to_px(pt, self.dpi)
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::D110
    }
}

/// All built-in profiles, in display order.
pub const MODELS: &[PrinterConfig] = &[PrinterConfig::D110, PrinterConfig::D11, PrinterConfig::B1];

/// Look up a built-in profile by task kind or display name (case-insensitive).
pub fn by_name(name: &str) -> Option<PrinterConfig> {
    MODELS.iter().copied().find(|config| {
        config.task_kind.eq_ignore_ascii_case(name) || config.name.eq_ignore_ascii_case(name)
    })
}

/// Task kinds of all built-in profiles.
pub fn list_models() -> Vec<&'static str> {
    MODELS.iter().map(|config| config.task_kind).collect()
}

// ============================================================================
// TESTS
// ============================================================================
