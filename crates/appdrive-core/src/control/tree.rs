//! Control tree trait definition.

use super::errors::ControlError;
use super::types::ControlInfo;
use crate::window::WindowInfo;

/// Access to the accessibility elements inside a window.
pub trait ControlTree: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Flatten the window's element tree into a list, depth-first.
    ///
    /// Called fresh on every lookup; implementations must not cache.
    fn controls(&self, window: &WindowInfo) -> Result<Vec<ControlInfo>, ControlError>;
}
