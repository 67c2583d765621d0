pub mod errors;
pub mod operations;
pub mod types;

pub use errors::ProcessError;
pub use operations::{ManagedProcess, is_process_running};
pub use types::{LaunchSpec, TerminationOutcome};
