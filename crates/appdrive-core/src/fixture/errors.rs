use crate::errors::DriveError;
use crate::process::ProcessError;
use crate::window::WindowError;

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("Main window {query} of '{command}' not ready after {timeout_ms}ms")]
    MainWindowTimeout {
        query: String,
        command: String,
        timeout_ms: u64,
    },

    #[error("Main window {query} is no longer open")]
    MainWindowGone { query: String },
}

impl DriveError for FixtureError {
    fn error_code(&self) -> &'static str {
        match self {
            FixtureError::Process(e) => e.error_code(),
            FixtureError::Window(e) => e.error_code(),
            FixtureError::MainWindowTimeout { .. } => "FIXTURE_MAIN_WINDOW_TIMEOUT",
            FixtureError::MainWindowGone { .. } => "FIXTURE_MAIN_WINDOW_GONE",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            FixtureError::Process(e) => e.is_user_error(),
            FixtureError::Window(e) => e.is_user_error(),
            FixtureError::MainWindowTimeout { .. } | FixtureError::MainWindowGone { .. } => false,
        }
    }
}
