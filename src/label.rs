//! # Label Configuration
//!
//! The caller-owned description of one label: text, font, alignment and the
//! physical size of the media. A `LabelConfig` is read-only input to
//! [`render_label`](crate::render::render_label).
//!
//! Field names serialize in camelCase so label files look like:
//!
//! ```json
//! { "text": "2024-01-01", "fontSize": 12, "bold": false,
//!   "align": "center", "widthMm": 20, "heightMm": 10 }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::EtiquetaError;

/// Horizontal text alignment. The anchor x is the left edge, the center or
/// the right edge of each line respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl std::str::FromStr for Alignment {
    type Err = EtiquetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" | "centre" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            other => Err(EtiquetaError::InvalidLabel(format!(
                "unknown alignment '{}'",
                other
            ))),
        }
    }
}

/// Text and geometry for one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelConfig {
    /// Label text; `\n` starts a new paragraph
    pub text: String,
    /// Font size in points
    pub font_size: f64,
    pub bold: bool,
    pub align: Alignment,
    /// Label width in millimeters
    pub width_mm: f64,
    /// Label height in millimeters
    pub height_mm: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 12.0,
            bold: false,
            align: Alignment::Center,
            width_mm: 40.0,
            height_mm: 12.0,
        }
    }
}

impl LabelConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Reject sizes the renderer has no defined behavior for.
    ///
    /// Rendering itself never validates; this is for callers that take
    /// configuration from users.
    pub fn validate(&self) -> Result<(), EtiquetaError> {
        for (name, value) in [
            ("fontSize", self.font_size),
            ("widthMm", self.width_mm),
            ("heightMm", self.height_mm),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EtiquetaError::InvalidLabel(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Text templates for quick labels.
pub mod templates {
    use chrono::{Local, NaiveDate};

    /// Today's date as `YYYY-MM-DD`.
    pub fn today() -> String {
        date(Local::now().date_naive())
    }

    pub fn date(day: NaiveDate) -> String {
        day.format("%Y-%m-%d").to_string()
    }

    /// Names of the available templates.
    pub fn list_templates() -> &'static [&'static str] {
        &["date"]
    }

    /// Expand a template by name.
    pub fn by_name(name: &str) -> Option<String> {
        match name {
            "date" => Some(today()),
            _ => None,
        }
    }
}
