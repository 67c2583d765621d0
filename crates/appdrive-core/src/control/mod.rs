pub mod accessibility;
pub mod errors;
pub mod handler;
pub mod tree;
pub mod types;

pub use accessibility::AccessibilityControlTree;
pub use errors::ControlError;
pub use handler::{find_control, list_controls, wait_for_text};
pub use tree::ControlTree;
pub use types::{ControlInfo, ControlQuery, ControlRole};
