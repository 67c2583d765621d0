//! appdrive-core: Drive external GUI applications from tests
//!
//! Launches an application as a child process, waits for its windows to
//! become ready, interacts with them through the accessibility tree and
//! synthetic input, and checks what happened. Used by the `appdrive` CLI
//! and directly from integration tests.
//!
//! # Main Entry Points
//!
//! - [`window`] - Window lookup and the readiness wait
//! - [`fixture`] - Launch an app for the duration of a test
//! - [`interact`] - Click controls and send key sequences
//! - [`assert`] - Pass/fail checks on UI state
//! - [`scenario`] - TOML-scripted sessions
//! - [`config`] - Configuration management

#[cfg(target_os = "linux")]
mod a11y_bus;
#[cfg(target_os = "macos")]
mod ax;
#[cfg(target_os = "windows")]
mod uia;

pub mod assert;
pub mod config;
pub mod control;
pub mod desktop;
pub mod errors;
pub mod events;
pub mod fixture;
pub mod input;
pub mod interact;
pub mod logging;
pub mod process;
pub mod scenario;
pub mod window;

// Re-export commonly used types at crate root for convenience
pub use assert::{Assertion, AssertionResult};
pub use config::DriveConfig;
pub use control::{ControlInfo, ControlQuery, ControlRole};
pub use desktop::Desktop;
pub use errors::DriveError;
pub use fixture::{AppFixture, FixtureOptions, TeardownReport};
pub use process::{LaunchSpec, TerminationOutcome};
pub use scenario::{Scenario, ScenarioReport};
pub use window::{WaitOptions, WindowInfo, WindowQuery};

// Re-export logging initialization
pub use logging::init_logging;
