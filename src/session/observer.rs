//! Session observer callbacks.

use std::sync::{Mutex, PoisonError};

use super::events::{HeartbeatData, PrintProgress, PrinterInfo};
use super::machine::PrinterState;

/// Receives session notifications. Every method defaults to a no-op.
///
/// Callbacks run synchronously on the task that caused them and must not
/// block.
pub trait SessionObserver: Send + Sync {
    fn on_state_change(&self, _state: PrinterState) {}

    fn on_printer_info(&self, _info: &PrinterInfo) {}

    /// Use [`HeartbeatData::charge_percent`] for display.
    fn on_heartbeat(&self, _data: &HeartbeatData) {}

    fn on_print_progress(&self, _progress: &PrintProgress) {}

    fn on_error(&self, _message: &str) {}
}

/// Observer that ignores everything.
impl SessionObserver for () {}

/// One observed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    State(PrinterState),
    PrinterInfo(PrinterInfo),
    Heartbeat(HeartbeatData),
    Progress(PrintProgress),
    Error(String),
}

/// Observer that keeps every notification, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn states(&self) -> Vec<PrinterState> {
        self.lock()
            .iter()
            .filter_map(|n| match n {
                Notification::State(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|n| match n {
                Notification::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<PrintProgress> {
        self.lock()
            .iter()
            .filter_map(|n| match n {
                Notification::Progress(progress) => Some(*progress),
                _ => None,
            })
            .collect()
    }

    fn push(&self, notification: Notification) {
        self.lock().push(notification);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionObserver for RecordingObserver {
    fn on_state_change(&self, state: PrinterState) {
        self.push(Notification::State(state));
    }

    fn on_printer_info(&self, info: &PrinterInfo) {
        self.push(Notification::PrinterInfo(info.clone()));
    }

    fn on_heartbeat(&self, data: &HeartbeatData) {
        self.push(Notification::Heartbeat(*data));
    }

    fn on_print_progress(&self, progress: &PrintProgress) {
        self.push(Notification::Progress(*progress));
    }

    fn on_error(&self, message: &str) {
        self.push(Notification::Error(message.to_string()));
    }
}
