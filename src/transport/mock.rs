//! # Scripted Mock Driver
//!
//! An in-memory [`DeviceDriver`] whose behavior is fixed up front by a
//! [`MockScript`]: connect can succeed, fail, be slow or never return, and
//! any job step can fail or hang. Encode failures go through
//! [`MockScript::encoder`], since encoding runs before the driver is involved. Every driver call is recorded so tests can check
//! the exact sequence the session issued.
//!
//! ```
//! use etiqueta::transport::{MockDriver, MockScript};
//!
//! let (driver, _events) = MockDriver::new(MockScript::default().fail_connect("out of range"));
//! assert!(driver.calls().is_empty());
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{DeviceDriver, PrintTask, PrintTaskOptions};
use crate::error::{EtiquetaError, JobStep};
use crate::protocol::{AnchorSide, EncodedImage, ImageEncoder, PackedRowEncoder};
use crate::render::RasterImage;
use crate::session::events::{DeviceEvent, HeartbeatData, PrintProgress, PrinterInfo};

/// What the mock driver will do.
#[derive(Debug, Clone, Default)]
pub struct MockScript {
    connect_error: Option<String>,
    hang_connect: bool,
    connect_delay: Option<Duration>,
    fail_at: Option<(JobStep, String)>,
    hang_at: Option<JobStep>,
    task_kind: Option<String>,
    info: Option<PrinterInfo>,
    heartbeat: Option<HeartbeatData>,
}

impl MockScript {
    pub fn fail_connect(mut self, message: impl Into<String>) -> Self {
        self.connect_error = Some(message.into());
        self
    }

    /// `connect` never resolves.
    pub fn hang_connect(mut self) -> Self {
        self.hang_connect = true;
        self
    }

    /// `connect` takes this long before returning its result.
    pub fn connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    /// The given job step fails: a transport error for device steps, an
    /// encode error from [`MockScript::encoder`] for [`JobStep::Encode`].
    pub fn fail_at(mut self, step: JobStep, message: impl Into<String>) -> Self {
        self.fail_at = Some((step, message.into()));
        self
    }

    /// The given device step never resolves. Has no effect on encoding.
    pub fn hang_at(mut self, step: JobStep) -> Self {
        self.hang_at = Some(step);
        self
    }

    /// Task kind reported by `print_task_kind`.
    pub fn task_kind(mut self, kind: impl Into<String>) -> Self {
        self.task_kind = Some(kind.into());
        self
    }

    /// Printer info emitted after a successful connect.
    pub fn printer_info(mut self, info: PrinterInfo) -> Self {
        self.info = Some(info);
        self
    }

    /// Heartbeat emitted after a successful connect.
    pub fn heartbeat(mut self, charge_level: u8) -> Self {
        self.heartbeat = Some(HeartbeatData {
            charge_level: Some(charge_level),
        });
        self
    }

    /// Encoder to pair with this script's driver.
    pub fn encoder(&self) -> Arc<dyn ImageEncoder> {
        match &self.fail_at {
            Some((JobStep::Encode, message)) => Arc::new(FailingEncoder {
                message: message.clone(),
            }),
            _ => Arc::new(PackedRowEncoder),
        }
    }
}

/// Encoder that rejects every raster.
#[derive(Debug, Clone)]
pub struct FailingEncoder {
    pub message: String,
}

impl ImageEncoder for FailingEncoder {
    fn encode(&self, _raster: &RasterImage, _anchor: AnchorSide) -> Result<EncodedImage, EtiquetaError> {
        Err(EtiquetaError::Encode(self.message.clone()))
    }
}

type CallLog = Arc<Mutex<Vec<String>>>;

fn record(log: &CallLog, call: impl Into<String>) {
    log.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(call.into());
}

/// In-memory driver following a [`MockScript`].
#[derive(Debug)]
pub struct MockDriver {
    script: MockScript,
    calls: CallLog,
    events: mpsc::UnboundedSender<DeviceEvent>,
}

impl MockDriver {
    /// Create a driver and the receiving end of its event channel.
    pub fn new(script: MockScript) -> (Self, mpsc::UnboundedReceiver<DeviceEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let driver = Self {
            script,
            calls: Arc::new(Mutex::new(Vec::new())),
            events,
        };
        (driver, receiver)
    }

    /// Driver calls so far, e.g. `["connect", "new_print_task D110", "print_init"]`.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Push an unsolicited event, as the device would.
    pub fn emit(&self, event: DeviceEvent) {
        // A closed channel means nobody is listening any more.
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl DeviceDriver for MockDriver {
    async fn connect(&self) -> Result<(), EtiquetaError> {
        record(&self.calls, "connect");
        if self.script.hang_connect {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.script.connect_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.script.connect_error {
            return Err(EtiquetaError::Connection(message.clone()));
        }

        if let Some(info) = &self.script.info {
            self.emit(DeviceEvent::PrinterInfo(info.clone()));
        }
        if let Some(heartbeat) = self.script.heartbeat {
            self.emit(DeviceEvent::Heartbeat(heartbeat));
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), EtiquetaError> {
        record(&self.calls, "disconnect");
        self.emit(DeviceEvent::Disconnected);
        Ok(())
    }

    fn print_task_kind(&self) -> Option<String> {
        self.script.task_kind.clone()
    }

    fn new_print_task(&self, kind: &str, options: PrintTaskOptions) -> Box<dyn PrintTask> {
        record(&self.calls, format!("new_print_task {}", kind));
        Box::new(MockPrintTask {
            options,
            fail_at: self.script.fail_at.clone(),
            hang_at: self.script.hang_at,
            calls: Arc::clone(&self.calls),
            events: self.events.clone(),
        })
    }
}

struct MockPrintTask {
    options: PrintTaskOptions,
    fail_at: Option<(JobStep, String)>,
    hang_at: Option<JobStep>,
    calls: CallLog,
    events: mpsc::UnboundedSender<DeviceEvent>,
}

impl MockPrintTask {
    async fn step(&self, step: JobStep) -> Result<(), EtiquetaError> {
        record(&self.calls, step.as_str());
        if self.hang_at == Some(step) {
            std::future::pending::<()>().await;
        }
        match &self.fail_at {
            Some((failing, message)) if *failing == step => {
                Err(EtiquetaError::Transport(message.clone()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl PrintTask for MockPrintTask {
    async fn print_init(&mut self) -> Result<(), EtiquetaError> {
        self.step(JobStep::PrintInit).await
    }

    async fn print_page(&mut self, image: &EncodedImage, copies: u32) -> Result<(), EtiquetaError> {
        record(
            &self.calls,
            format!("page {}x{} copies={}", image.cols, image.row_count(), copies),
        );
        self.step(JobStep::PrintPage).await
    }

    async fn wait_for_finished(&mut self) -> Result<(), EtiquetaError> {
        for (print, feed) in [(50, 0), (100, 0), (100, 100)] {
            let _ = self.events.send(DeviceEvent::PrintProgress(PrintProgress {
                page: 0,
                pages_total: self.options.total_pages,
                page_print_progress: print,
                page_feed_progress: feed,
            }));
            tokio::task::yield_now().await;
        }
        self.step(JobStep::WaitForFinished).await
    }

    async fn print_end(&mut self) -> Result<(), EtiquetaError> {
        self.step(JobStep::PrintEnd).await
    }
}
