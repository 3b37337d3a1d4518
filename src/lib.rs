//! # Etiqueta - Label Printer Library
//!
//! Etiqueta renders text labels for small thermal label printers and drives
//! the print job. It provides:
//!
//! - **Rendering**: Word-wrapped, centered text on a 1-bit raster
//! - **Preview**: Scaled grayscale copies for display or PNG export
//! - **Session**: Connection state machine with observer callbacks
//! - **Jobs**: Encode, init, page, wait, end against a device driver
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use etiqueta::{
//!     label::LabelConfig,
//!     printer::PrinterConfig,
//!     render,
//!     session::{PrintSession, SessionConfig},
//!     transport::{MockDriver, MockScript},
//! };
//!
//! let printer = PrinterConfig::D110;
//! let label = render::render_label(&LabelConfig::new("2024-01-01"), &printer);
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let (driver, _events) = MockDriver::new(MockScript::default());
//! let session = PrintSession::new(Arc::new(driver), Arc::new(()), SessionConfig::for_printer(&printer));
//! session.connect().await;
//! session.print(label.raster).await;
//! # });
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`units`] | Millimeter and point conversion to dots |
//! | [`label`] | Label content and layout settings |
//! | [`render`] | Wrapping, composition and previews |
//! | [`protocol`] | Raster to device row encoding |
//! | [`session`] | Print session and job driver |
//! | [`transport`] | Device driver contract and mock driver |
//! | [`printer`] | Printer model configurations |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Configured for NIIMBOT D110, D11 and B1 (203 DPI). Other models work
//! with a matching [`PrinterConfig`].

pub mod error;
pub mod label;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod session;
pub mod transport;
pub mod units;

// Re-exports for convenience
pub use error::EtiquetaError;
pub use label::LabelConfig;
pub use printer::PrinterConfig;
pub use session::PrintSession;
