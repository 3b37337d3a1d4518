//! # Printer Driver Contract
//!
//! The wireless link and the printer's binary protocol belong to a device
//! driver. This module defines what the session needs from one:
//!
//! - [`DeviceDriver`]: connect, disconnect, and create print tasks
//! - [`PrintTask`]: the four device-side steps of one job
//!
//! Drivers report unsolicited traffic (disconnects, printer info,
//! heartbeats, print progress) as [`DeviceEvent`]s on a channel that the
//! session drains with
//! [`PrintSession::run_event_loop`](crate::session::PrintSession::run_event_loop).
//!
//! ## Available Drivers
//!
//! - [`mock`]: Scripted in-memory driver for tests and dry runs

pub mod mock;

use async_trait::async_trait;

use crate::error::EtiquetaError;
use crate::printer::LabelType;
use crate::protocol::EncodedImage;

pub use crate::session::events::DeviceEvent;
pub use mock::{FailingEncoder, MockDriver, MockScript};

/// Job header sent when a print task starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintTaskOptions {
    pub total_pages: u32,
    pub density: u8,
    pub label_type: LabelType,
}

/// Connection-level operations of a label printer driver.
#[async_trait]
pub trait DeviceDriver: Send + Sync {
    /// Open the link and handshake with the printer.
    async fn connect(&self) -> Result<(), EtiquetaError>;

    /// Tear the link down.
    async fn disconnect(&self) -> Result<(), EtiquetaError>;

    /// Print task kind of the connected model, when the driver could detect it.
    fn print_task_kind(&self) -> Option<String> {
        None
    }

    /// Start a new device-side print task.
    fn new_print_task(&self, kind: &str, options: PrintTaskOptions) -> Box<dyn PrintTask>;
}

/// One device-side print job, bounded by `print_init` and `print_end`.
#[async_trait]
pub trait PrintTask: Send {
    async fn print_init(&mut self) -> Result<(), EtiquetaError>;

    async fn print_page(&mut self, image: &EncodedImage, copies: u32) -> Result<(), EtiquetaError>;

    /// Resolves once the device reports every page printed.
    async fn wait_for_finished(&mut self) -> Result<(), EtiquetaError>;

    async fn print_end(&mut self) -> Result<(), EtiquetaError>;
}
