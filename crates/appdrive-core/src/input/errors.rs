use crate::errors::DriveError;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Invalid key sequence '{sequence}' at position {position}: {reason}")]
    InvalidKeySequence {
        sequence: String,
        position: usize,
        reason: String,
    },

    #[error("Failed to connect to the input system: {message}")]
    ConnectionFailed { message: String },

    #[error("Failed to send mouse event at ({x}, {y}): {message}")]
    MouseEventFailed { x: i32, y: i32, message: String },

    #[error("Failed to send key event: {message}")]
    KeyEventFailed { message: String },
}

impl DriveError for InputError {
    fn error_code(&self) -> &'static str {
        match self {
            InputError::InvalidKeySequence { .. } => "INPUT_INVALID_KEY_SEQUENCE",
            InputError::ConnectionFailed { .. } => "INPUT_CONNECTION_FAILED",
            InputError::MouseEventFailed { .. } => "INPUT_MOUSE_EVENT_FAILED",
            InputError::KeyEventFailed { .. } => "INPUT_KEY_EVENT_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, InputError::InvalidKeySequence { .. })
    }
}
