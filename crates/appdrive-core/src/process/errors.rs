use crate::errors::DriveError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Program '{program}' not found on PATH")]
    ProgramNotFound { program: String },

    #[error("Failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process '{pid}' has no stdin to write to")]
    StdinUnavailable { pid: u32 },

    #[error("Failed to write to stdin of process '{pid}': {source}")]
    StdinWriteFailed {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to signal process '{pid}': {message}")]
    SignalFailed { pid: u32, message: String },

    #[error("Failed to wait for process '{pid}': {source}")]
    WaitFailed {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
}

impl DriveError for ProcessError {
    fn error_code(&self) -> &'static str {
        match self {
            ProcessError::ProgramNotFound { .. } => "PROCESS_PROGRAM_NOT_FOUND",
            ProcessError::SpawnFailed { .. } => "PROCESS_SPAWN_FAILED",
            ProcessError::StdinUnavailable { .. } => "PROCESS_STDIN_UNAVAILABLE",
            ProcessError::StdinWriteFailed { .. } => "PROCESS_STDIN_WRITE_FAILED",
            ProcessError::SignalFailed { .. } => "PROCESS_SIGNAL_FAILED",
            ProcessError::WaitFailed { .. } => "PROCESS_WAIT_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ProcessError::ProgramNotFound { .. })
    }
}
