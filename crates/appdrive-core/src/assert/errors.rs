use crate::control::ControlError;
use crate::errors::DriveError;
use crate::window::WindowError;

/// Failure to evaluate an assertion at all. A failed check is an
/// [`AssertionResult`](super::AssertionResult) with `passed == false`.
#[derive(Debug, thiserror::Error)]
pub enum AssertError {
    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Control(#[from] ControlError),
}

impl DriveError for AssertError {
    fn error_code(&self) -> &'static str {
        match self {
            AssertError::Window(e) => e.error_code(),
            AssertError::Control(e) => e.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            AssertError::Window(e) => e.is_user_error(),
            AssertError::Control(e) => e.is_user_error(),
        }
    }
}
