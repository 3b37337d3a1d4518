//! # Print Job Driver
//!
//! Runs one label through a print task:
//!
//! ```text
//! encode ─► print_init ─► print_page ─► wait_for_finished ─► print_end
//! ```
//!
//! The first failing step aborts the rest. Nothing is retried; a failed
//! job is reported once and the caller decides whether to print again.

use tracing::{debug, info};

use crate::error::{EtiquetaError, JobStep};
use crate::printer::{LabelType, PrinterConfig};
use crate::protocol::{AnchorSide, ImageEncoder};
use crate::render::RasterImage;
use crate::transport::{DeviceDriver, PrintTaskOptions};

/// Fixed parameters of every job a session runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobParams {
    pub total_pages: u32,
    pub copies: u32,
    pub density: u8,
    pub label_type: LabelType,
    /// Task kind used when the driver doesn't report one
    pub task_kind: String,
    pub anchor: AnchorSide,
}

impl JobParams {
    pub fn for_printer(printer: &PrinterConfig) -> Self {
        Self {
            total_pages: 1,
            copies: 1,
            density: printer.density,
            label_type: printer.label_type,
            task_kind: printer.task_kind.to_string(),
            anchor: AnchorSide::Left,
        }
    }

    fn task_options(&self) -> PrintTaskOptions {
        PrintTaskOptions {
            total_pages: self.total_pages,
            density: self.density,
            label_type: self.label_type,
        }
    }
}

impl Default for JobParams {
    fn default() -> Self {
        Self::for_printer(&PrinterConfig::default())
    }
}

/// Print one raster. Errors carry the step that failed.
pub async fn run_print_job(
    driver: &dyn DeviceDriver,
    encoder: &dyn ImageEncoder,
    raster: &RasterImage,
    params: &JobParams,
) -> Result<(), EtiquetaError> {
    let encoded = encoder
        .encode(raster, params.anchor)
        .map_err(|e| EtiquetaError::at_step(JobStep::Encode, e))?;

    let kind = driver
        .print_task_kind()
        .unwrap_or_else(|| params.task_kind.clone());
    debug!(
        kind = %kind,
        cols = encoded.cols,
        rows = encoded.row_count(),
        density = params.density,
        "starting print task"
    );

    let mut task = driver.new_print_task(&kind, params.task_options());

    task.print_init()
        .await
        .map_err(|e| EtiquetaError::at_step(JobStep::PrintInit, e))?;
    task.print_page(&encoded, params.copies)
        .await
        .map_err(|e| EtiquetaError::at_step(JobStep::PrintPage, e))?;
    task.wait_for_finished()
        .await
        .map_err(|e| EtiquetaError::at_step(JobStep::WaitForFinished, e))?;
    task.print_end()
        .await
        .map_err(|e| EtiquetaError::at_step(JobStep::PrintEnd, e))?;

    info!(kind = %kind, "print job finished");
    Ok(())
}
