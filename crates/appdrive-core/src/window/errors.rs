use crate::errors::DriveError;

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Failed to enumerate windows: {message}")]
    EnumerationFailed { message: String },

    #[error("Window {query} not ready after {timeout_ms}ms")]
    WaitTimeout { query: String, timeout_ms: u64 },

    #[error("Failed to focus window '{title}': {reason}")]
    FocusFailed { title: String, reason: String },

    #[error("Failed to close window '{title}': {reason}")]
    CloseFailed { title: String, reason: String },

    #[error("Window {operation} is not supported on {platform}")]
    Unsupported {
        operation: &'static str,
        platform: &'static str,
    },
}

impl DriveError for WindowError {
    fn error_code(&self) -> &'static str {
        match self {
            WindowError::EnumerationFailed { .. } => "WINDOW_ENUMERATION_FAILED",
            WindowError::WaitTimeout { .. } => "WINDOW_WAIT_TIMEOUT",
            WindowError::FocusFailed { .. } => "WINDOW_FOCUS_FAILED",
            WindowError::CloseFailed { .. } => "WINDOW_CLOSE_FAILED",
            WindowError::Unsupported { .. } => "WINDOW_OPERATION_UNSUPPORTED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            WindowError::WaitTimeout { .. } | WindowError::Unsupported { .. }
        )
    }
}
