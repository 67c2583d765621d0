//! Scoped ownership of an external application under test.
//!
//! ```rust,no_run
//! use appdrive_core::desktop::Desktop;
//! use appdrive_core::fixture::{AppFixture, FixtureOptions};
//! use appdrive_core::process::LaunchSpec;
//! use appdrive_core::window::WindowQuery;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let desktop = Desktop::native();
//!     let spec = LaunchSpec::new("gnome-calculator");
//!     let options = FixtureOptions::new(WindowQuery::title("Calculator"));
//!
//!     let mut app = AppFixture::launch(&desktop, &spec, options)?;
//!     let window = app.main_window()?;
//!     println!("{} is up", window.title());
//!     let report = app.teardown();
//!     assert!(report.is_clean());
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod handler;
pub mod types;

pub use errors::FixtureError;
pub use handler::{AppFixture, with_app};
pub use types::{FixtureOptions, TeardownReport, WindowCloseOutcome};
