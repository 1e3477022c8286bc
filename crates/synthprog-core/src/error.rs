//! Error types for synthprog-core

use crate::sequence::Step;
use crate::target::{Board, Device};
use std::path::PathBuf;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    // Argument errors
    /// Synth requires a board selection
    #[error("a board must be selected when programming the {0}")]
    BoardRequired(Device),

    /// Board is not valid for this device
    #[error("board {board} is not supported for the {device} device")]
    InvalidBoard {
        /// Requested device
        device: Device,
        /// Rejected board
        board: Board,
    },

    /// Unrecognised device name
    #[error("unknown device '{0}' (expected synth, left or right)")]
    UnknownDevice(String),

    /// Unrecognised board name
    #[error("unknown board '{0}' (expected nrf5340_dk or nrf5340_audio_dk)")]
    UnknownBoard(String),

    // Probe errors
    /// No programmer probe connected
    #[error("no device connected")]
    NoDevice,

    /// Requested serial number is not among the connected probes
    #[error("probe with serial number {0} is not connected")]
    ProbeNotFound(u32),

    /// Input closed before a valid selection was made
    #[error("device selection aborted")]
    SelectionAborted,

    /// Output of the probe listing could not be parsed
    #[error("invalid probe listing: '{0}'")]
    InvalidProbeListing(String),

    // Image errors
    /// Firmware image file does not exist
    #[error("firmware image not found: {}", .0.display())]
    ImageMissing(PathBuf),

    // Tool errors
    /// Programming tool could not be started
    #[error("failed to run {program}: {source}")]
    ToolSpawn {
        /// Program that was executed
        program: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// Programming tool exited unsuccessfully
    #[error("`{command}` {status}", status = describe_exit(.code))]
    ToolFailed {
        /// Rendered command line
        command: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
    },

    /// A flashing step failed; later steps were not run
    #[error("{reason}: {source}", reason = .step.failure())]
    StepFailed {
        /// The step that failed
        step: Step,
        /// What went wrong
        #[source]
        source: Box<Error>,
    },

    /// I/O error (prompt input/output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
