//! # Print Session State Machine
//!
//! ```text
//!                connect()               connect ok
//!  ┌──────────────┐ ───────► ┌────────────┐ ───────► ┌───────────┐
//!  │ Disconnected │          │ Connecting │          │ Connected │◄─┐
//!  └──────────────┘ ◄─────── └────────────┘          └───────────┘  │ job ok / job failed
//!     ▲    ▲        connect failed          disconnect() │   │      │
//!     │    └─────────────────────────────────────────────┘   │print()
//!     │                                                ┌──────────┐
//!     └──────────── link dropped (any state) ──────────│ Printing │
//!                                                      └──────────┘
//! ```
//!
//! Operations called in the wrong state are ignored: `connect()` only acts
//! when disconnected, `print()` only when connected, `disconnect()` only
//! when connected. In particular a disconnect request during a job is
//! refused; a stuck job is ended by `job_timeout` or by the link dropping.
//! Only one job is outstanding at a time: after a link drop and reconnect,
//! `print()` stays ignored until the earlier job has returned.
//!
//! Failures never leave the session in a transient state. A failed connect
//! returns to `Disconnected`, a failed job returns to `Connected`, and each
//! failure is reported exactly once through
//! [`SessionObserver::on_error`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::events::{DeviceEvent, HeartbeatData, PrinterInfo};
use super::job::{JobParams, run_print_job};
use super::observer::SessionObserver;
use crate::error::EtiquetaError;
use crate::printer::PrinterConfig;
use crate::protocol::{ImageEncoder, PackedRowEncoder};
use crate::render::RasterImage;
use crate::transport::DeviceDriver;

/// Connection lifecycle of a printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Printing,
}

impl PrinterState {
    pub fn as_str(self) -> &'static str {
        match self {
            PrinterState::Disconnected => "disconnected",
            PrinterState::Connecting => "connecting",
            PrinterState::Connected => "connected",
            PrinterState::Printing => "printing",
        }
    }
}

impl std::fmt::Display for PrinterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionConfig {
    pub job: JobParams,
    /// Give up on `connect()` after this long. `None` waits forever.
    pub connect_timeout: Option<Duration>,
    /// Give up on a print job after this long. `None` waits forever.
    pub job_timeout: Option<Duration>,
}

impl SessionConfig {
    pub fn for_printer(printer: &PrinterConfig) -> Self {
        Self {
            job: JobParams::for_printer(printer),
            ..Default::default()
        }
    }

    pub fn connect_timeout(mut self, limit: Duration) -> Self {
        self.connect_timeout = Some(limit);
        self
    }

    pub fn job_timeout(mut self, limit: Duration) -> Self {
        self.job_timeout = Some(limit);
        self
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: PrinterState,
    printer_info: Option<PrinterInfo>,
    heartbeat: Option<HeartbeatData>,
    /// Set while a `print()` call is running its job. Survives a link drop.
    job_active: bool,
}

/// A printer connection and the jobs run over it.
///
/// All methods take `&self`; share the session with `Arc` to run the event
/// loop next to connect/print calls.
pub struct PrintSession {
    driver: Arc<dyn DeviceDriver>,
    encoder: Arc<dyn ImageEncoder>,
    observer: Arc<dyn SessionObserver>,
    config: SessionConfig,
    inner: Mutex<Inner>,
}

impl PrintSession {
    /// A disconnected session using the packed-row encoder.
    pub fn new(
        driver: Arc<dyn DeviceDriver>,
        observer: Arc<dyn SessionObserver>,
        config: SessionConfig,
    ) -> Self {
        Self {
            driver,
            encoder: Arc::new(PackedRowEncoder),
            observer,
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Replace the image encoder.
    pub fn with_encoder(mut self, encoder: Arc<dyn ImageEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> PrinterState {
        self.lock().state
    }

    pub fn is_connected(&self) -> bool {
        self.state() == PrinterState::Connected
    }

    /// Last printer info reported since connecting.
    pub fn printer_info(&self) -> Option<PrinterInfo> {
        self.lock().printer_info.clone()
    }

    /// Whether a print job is still running, even if the link has dropped.
    pub fn job_in_progress(&self) -> bool {
        self.lock().job_active
    }

    /// Model name from the printer info, if reported.
    pub fn device_name(&self) -> Option<String> {
        self.lock()
            .printer_info
            .as_ref()
            .and_then(|info| info.model.clone())
    }

    /// Last heartbeat received since connecting.
    pub fn heartbeat(&self) -> Option<HeartbeatData> {
        self.lock().heartbeat
    }

    /// Battery charge from the last heartbeat, in percent.
    pub fn charge_percent(&self) -> Option<u8> {
        self.heartbeat().and_then(|h| h.charge_percent())
    }

    /// Connect to the printer. Ignored unless disconnected.
    pub async fn connect(&self) {
        if !self.transition(PrinterState::Disconnected, PrinterState::Connecting) {
            debug!(state = %self.state(), "connect ignored");
            return;
        }

        let result = match self.config.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, self.driver.connect())
                .await
                .unwrap_or(Err(EtiquetaError::Timeout("connection"))),
            None => self.driver.connect().await,
        };

        match result {
            Ok(()) => {
                if !self.transition(PrinterState::Connecting, PrinterState::Connected) {
                    debug!(state = %self.state(), "link dropped while connecting");
                }
            }
            Err(e) => {
                warn!(error = %e, "connect failed");
                self.transition(PrinterState::Connecting, PrinterState::Disconnected);
                self.observer.on_error(&e.to_string());
            }
        }
    }

    /// Disconnect from the printer. Ignored unless connected.
    pub async fn disconnect(&self) {
        let state = self.state();
        if state != PrinterState::Connected {
            debug!(state = %state, "disconnect ignored");
            return;
        }

        let result = self.driver.disconnect().await;
        self.reset();
        if let Err(e) = result {
            warn!(error = %e, "disconnect failed");
            self.observer.on_error(&e.to_string());
        }
    }

    /// Print a finished raster. Ignored unless connected with no job running.
    ///
    /// The job runs once; a failure is reported through `on_error` and the
    /// session goes back to `Connected`.
    pub async fn print(&self, raster: RasterImage) {
        {
            let mut inner = self.lock();
            if inner.state != PrinterState::Connected || inner.job_active {
                debug!(state = %inner.state, job_active = inner.job_active, "print ignored");
                return;
            }
            inner.state = PrinterState::Printing;
            inner.job_active = true;
        }
        self.notify_state(PrinterState::Connected, PrinterState::Printing);

        let job = run_print_job(&*self.driver, &*self.encoder, &raster, &self.config.job);
        let result = match self.config.job_timeout {
            Some(limit) => tokio::time::timeout(limit, job)
                .await
                .unwrap_or(Err(EtiquetaError::Timeout("print job"))),
            None => job.await,
        };

        if let Err(e) = &result {
            warn!(error = %e, "print job failed");
        }
        self.lock().job_active = false;
        if !self.transition(PrinterState::Printing, PrinterState::Connected) {
            debug!(state = %self.state(), "job ended after link dropped");
        }
        if let Err(e) = result {
            self.observer.on_error(&e.to_string());
        }
    }

    /// Apply one driver event.
    pub fn handle_event(&self, event: DeviceEvent) {
        match event {
            DeviceEvent::Disconnected => {
                if self.state() == PrinterState::Printing {
                    warn!("link dropped during print job");
                }
                self.reset();
            }
            DeviceEvent::PrinterInfo(info) => {
                {
                    let mut inner = self.lock();
                    if inner.state == PrinterState::Disconnected {
                        debug!("printer info ignored while disconnected");
                        return;
                    }
                    inner.printer_info = Some(info.clone());
                }
                info!(summary = %info.summary(), "printer info");
                self.observer.on_printer_info(&info);
            }
            DeviceEvent::Heartbeat(data) => {
                {
                    let mut inner = self.lock();
                    if inner.state == PrinterState::Disconnected {
                        debug!("heartbeat ignored while disconnected");
                        return;
                    }
                    inner.heartbeat = Some(data);
                }
                debug!(charge = ?data.charge_percent(), "heartbeat");
                self.observer.on_heartbeat(&data);
            }
            DeviceEvent::PrintProgress(progress) => {
                if self.state() != PrinterState::Printing {
                    debug!("print progress ignored outside a job");
                    return;
                }
                self.observer.on_print_progress(&progress);
            }
        }
    }

    /// Dispatch driver events until the channel closes.
    pub async fn run_event_loop(&self, mut events: mpsc::UnboundedReceiver<DeviceEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        debug!("driver event channel closed");
    }

    /// Move `from` → `to`. Returns false, changing nothing, if the session
    /// isn't in `from`.
    fn transition(&self, from: PrinterState, to: PrinterState) -> bool {
        {
            let mut inner = self.lock();
            if inner.state != from {
                return false;
            }
            inner.state = to;
        }
        self.notify_state(from, to);
        true
    }

    fn notify_state(&self, from: PrinterState, to: PrinterState) {
        info!(from = %from, to = %to, "printer state changed");
        self.observer.on_state_change(to);
    }

    /// Back to `Disconnected` with telemetry cleared. A running job keeps its
    /// flag until it returns.
    fn reset(&self) {
        let previous = {
            let mut inner = self.lock();
            let previous = inner.state;
            let job_active = inner.job_active;
            *inner = Inner {
                job_active,
                ..Inner::default()
            };
            previous
        };
        if previous != PrinterState::Disconnected {
            self.notify_state(previous, PrinterState::Disconnected);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for PrintSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintSession")
            .field("state", &self.state())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
