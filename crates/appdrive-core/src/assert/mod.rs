//! Pass/fail checks against UI state.
//!
//! Assertions return an [`AssertionResult`] instead of panicking, so the
//! CLI and scenario runner can report them.

pub mod errors;
pub mod handler;
pub mod types;

pub use errors::AssertError;
pub use handler::run_assertion;
pub use types::{Assertion, AssertionResult};
