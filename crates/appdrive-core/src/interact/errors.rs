use crate::control::ControlError;
use crate::errors::DriveError;
use crate::input::InputError;
use crate::window::WindowError;

#[derive(Debug, thiserror::Error)]
pub enum InteractError {
    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Window is minimized: '{title}'")]
    WindowMinimized { title: String },

    #[error("Control {query} is disabled")]
    ControlDisabled { query: String },

    #[error("Control {query} has no on-screen area")]
    ControlNotVisible { query: String },
}

impl DriveError for InteractError {
    fn error_code(&self) -> &'static str {
        match self {
            InteractError::Window(e) => e.error_code(),
            InteractError::Control(e) => e.error_code(),
            InteractError::Input(e) => e.error_code(),
            InteractError::WindowMinimized { .. } => "INTERACT_WINDOW_MINIMIZED",
            InteractError::ControlDisabled { .. } => "INTERACT_CONTROL_DISABLED",
            InteractError::ControlNotVisible { .. } => "INTERACT_CONTROL_NOT_VISIBLE",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            InteractError::Window(e) => e.is_user_error(),
            InteractError::Control(e) => e.is_user_error(),
            InteractError::Input(e) => e.is_user_error(),
            InteractError::WindowMinimized { .. }
            | InteractError::ControlDisabled { .. }
            | InteractError::ControlNotVisible { .. } => true,
        }
    }
}
