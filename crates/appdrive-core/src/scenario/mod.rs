//! TOML-scripted sessions: launch an app, drive it, check the result.

pub mod errors;
pub mod handler;
pub mod loading;
pub mod types;

pub use errors::{ScenarioError, StepError};
pub use handler::run_scenario;
pub use loading::{load_scenario, parse_scenario, validate_scenario};
pub use types::{AppSection, Scenario, ScenarioReport, Step, StepReport};
