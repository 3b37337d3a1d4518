//! Typed events reported by a device driver.

use serde::{Deserialize, Serialize};

/// Identity of the connected printer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterInfo {
    pub model: Option<String>,
    pub serial: Option<String>,
    pub software_version: Option<String>,
}

impl PrinterInfo {
    /// `S/N: <serial>, FW: <version>`, omitting unknown parts.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(serial) = &self.serial {
            parts.push(format!("S/N: {}", serial));
        }
        if let Some(version) = &self.software_version {
            parts.push(format!("FW: {}", version));
        }
        parts.join(", ")
    }
}

/// Periodic device telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatData {
    /// Battery charge, 0 (empty) to 4 (full)
    pub charge_level: Option<u8>,
}

impl HeartbeatData {
    /// Highest charge level a device reports.
    pub const MAX_CHARGE_LEVEL: u8 = 4;

    /// Charge as a percentage: each level is 25%.
    pub fn charge_percent(&self) -> Option<u8> {
        self.charge_level
            .map(|level| level.min(Self::MAX_CHARGE_LEVEL) * 25)
    }
}

/// Progress of the page currently printing. Percentages are 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintProgress {
    /// Zero-based page index
    pub page: u32,
    pub pages_total: u32,
    pub page_print_progress: u8,
    pub page_feed_progress: u8,
}

impl std::fmt::Display for PrintProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Page {}/{} - print {}%, feed {}%",
            self.page + 1,
            self.pages_total,
            self.page_print_progress,
            self.page_feed_progress
        )
    }
}

/// Everything a driver can report without being asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The link dropped
    Disconnected,
    PrinterInfo(PrinterInfo),
    Heartbeat(HeartbeatData),
    PrintProgress(PrintProgress),
}
