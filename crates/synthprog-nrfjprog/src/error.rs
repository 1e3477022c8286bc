//! Error types for nrfjprog operations

use thiserror::Error;

/// nrfjprog specific errors
#[derive(Debug, Error)]
pub enum NrfjprogError {
    /// Failed to start the executable
    #[error("Failed to run {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Command returned a non-zero exit status or was killed
    #[error("`{command}` failed with exit code {code:?}")]
    CommandFailed { command: String, code: Option<i32> },

    /// `--ids` output was not valid UTF-8
    #[error("nrfjprog --ids printed non UTF-8 output")]
    InvalidOutput,
}

/// Result type for nrfjprog operations
pub type Result<T> = std::result::Result<T, NrfjprogError>;

impl From<NrfjprogError> for synthprog_core::Error {
    fn from(e: NrfjprogError) -> Self {
        use synthprog_core::Error;
        match e {
            NrfjprogError::SpawnFailed { program, source } => Error::ToolSpawn { program, source },
            NrfjprogError::CommandFailed { command, code } => Error::ToolFailed { command, code },
            NrfjprogError::InvalidOutput => {
                Error::InvalidProbeListing("<non UTF-8 output>".to_string())
            }
        }
    }
}
