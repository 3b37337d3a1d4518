//! # Printer Module
//!
//! This module provides printer-specific configurations.
//!
//! ## Modules
//!
//! - [`config`]: Printer hardware profiles and label media types

pub mod config;

pub use config::{LabelType, PrinterConfig};
