//! # Print Session
//!
//! Connection lifecycle and job orchestration on top of a
//! [`DeviceDriver`](crate::transport::DeviceDriver).
//!
//! - [`machine`]: The `PrintSession` state machine
//! - [`job`]: One print job, step by step
//! - [`events`]: Typed events a driver reports
//! - [`observer`]: Notification callbacks
//!
//! ## Usage Example
//!
//! ```
//! use std::sync::Arc;
//! use etiqueta::printer::PrinterConfig;
//! use etiqueta::render::raster::Canvas;
//! use etiqueta::session::{PrintSession, PrinterState, RecordingObserver, SessionConfig};
//! use etiqueta::transport::{MockDriver, MockScript};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let (driver, _events) = MockDriver::new(MockScript::default());
//! let observer = Arc::new(RecordingObserver::new());
//! let session = PrintSession::new(
//!     Arc::new(driver),
//!     observer.clone(),
//!     SessionConfig::for_printer(&PrinterConfig::D110),
//! );
//!
//! session.connect().await;
//! session.print(Canvas::new(160, 80).finish()).await;
//!
//! assert_eq!(session.state(), PrinterState::Connected);
//! assert!(observer.errors().is_empty());
//! # });
//! ```

pub mod events;
pub mod job;
pub mod machine;
pub mod observer;

pub use events::{DeviceEvent, HeartbeatData, PrintProgress, PrinterInfo};
pub use job::{JobParams, run_print_job};
pub use machine::{PrintSession, PrinterState, SessionConfig};
pub use observer::{Notification, RecordingObserver, SessionObserver};
