use crate::assert::AssertError;
use crate::errors::DriveError;
use crate::fixture::FixtureError;
use crate::interact::InteractError;
use crate::window::WindowError;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Scenario file not found at '{path}'")]
    NotFound { path: String },

    #[error("Failed to read scenario '{path}': {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scenario '{path}': {message}")]
    ParseFailed { path: String, message: String },

    #[error("Invalid scenario: {message}")]
    Invalid { message: String },

    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

impl DriveError for ScenarioError {
    fn error_code(&self) -> &'static str {
        match self {
            ScenarioError::NotFound { .. } => "SCENARIO_NOT_FOUND",
            ScenarioError::ReadFailed { .. } => "SCENARIO_READ_FAILED",
            ScenarioError::ParseFailed { .. } => "SCENARIO_PARSE_FAILED",
            ScenarioError::Invalid { .. } => "SCENARIO_INVALID",
            ScenarioError::Fixture(e) => e.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            ScenarioError::Fixture(e) => e.is_user_error(),
            ScenarioError::ReadFailed { .. } => false,
            _ => true,
        }
    }
}

/// Why a single step could not be carried out
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Interact(#[from] InteractError),

    #[error(transparent)]
    Assert(#[from] AssertError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("No ready window '{title}' to act on")]
    TargetWindowMissing { title: String },
}

impl DriveError for StepError {
    fn error_code(&self) -> &'static str {
        match self {
            StepError::Interact(e) => e.error_code(),
            StepError::Assert(e) => e.error_code(),
            StepError::Fixture(e) => e.error_code(),
            StepError::Window(e) => e.error_code(),
            StepError::TargetWindowMissing { .. } => "SCENARIO_TARGET_WINDOW_MISSING",
        }
    }
}
