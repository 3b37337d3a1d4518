//! # Error Types
//!
//! This module defines error types used throughout the etiqueta library.
//!
//! Rendering never fails for a valid [`LabelConfig`](crate::label::LabelConfig);
//! the variants below cover the session side (connecting, running a job) and
//! the CLI's file handling.

use std::fmt;

use thiserror::Error;

/// Main error type for etiqueta operations
#[derive(Debug, Error)]
pub enum EtiquetaError {
    /// The device could not be connected
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Transport-level errors reported by a device driver
    #[error("Transport error: {0}")]
    Transport(String),

    /// A print job step failed
    #[error("{step} failed: {message}")]
    Job { step: JobStep, message: String },

    /// The raster could not be converted to the device format
    #[error("Encoding error: {0}")]
    Encode(String),

    /// Image export error
    #[error("Image error: {0}")]
    Image(String),

    /// Label configuration rejected before rendering
    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    /// A bounded wait expired
    #[error("Timed out waiting for {0}")]
    Timeout(&'static str),

    /// Label file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EtiquetaError {
    /// Wrap a driver failure as a failure of the given job step.
    ///
    /// Job failures keep their step; anything else is flattened to its message.
    pub fn at_step(step: JobStep, err: EtiquetaError) -> Self {
        match err {
            EtiquetaError::Job { .. } => err,
            EtiquetaError::Transport(message) | EtiquetaError::Encode(message) => {
                EtiquetaError::Job { step, message }
            }
            other => EtiquetaError::Job {
                step,
                message: other.to_string(),
            },
        }
    }
}

/// Steps of a single print job, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStep {
    Encode,
    PrintInit,
    PrintPage,
    WaitForFinished,
    PrintEnd,
}

impl JobStep {
    pub const ALL: [JobStep; 5] = [
        JobStep::Encode,
        JobStep::PrintInit,
        JobStep::PrintPage,
        JobStep::WaitForFinished,
        JobStep::PrintEnd,
    ];

    /// Look a step up by its log name, e.g. `print_page`.
    pub fn from_name(name: &str) -> Option<JobStep> {
        Self::ALL.into_iter().find(|step| step.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStep::Encode => "encode",
            JobStep::PrintInit => "print_init",
            JobStep::PrintPage => "print_page",
            JobStep::WaitForFinished => "wait_for_finished",
            JobStep::PrintEnd => "print_end",
        }
    }
}

impl fmt::Display for JobStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
