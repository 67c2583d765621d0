//! The set of backends a fixture or scenario drives.

use crate::control::{AccessibilityControlTree, ControlTree};
use crate::input::{EnigoInputDriver, InputDriver};
use crate::window::{NativeWindowRegistry, WindowRegistry};

/// One window registry, one control tree, one input driver.
pub struct Desktop {
    windows: Box<dyn WindowRegistry>,
    controls: Box<dyn ControlTree>,
    input: Box<dyn InputDriver>,
}

impl Desktop {
    pub fn new(
        windows: Box<dyn WindowRegistry>,
        controls: Box<dyn ControlTree>,
        input: Box<dyn InputDriver>,
    ) -> Self {
        Self {
            windows,
            controls,
            input,
        }
    }

    /// The real desktop of the current session
    pub fn native() -> Self {
        Self::new(
            Box::new(NativeWindowRegistry::new()),
            Box::new(AccessibilityControlTree::new()),
            Box::new(EnigoInputDriver::new()),
        )
    }

    pub fn windows(&self) -> &dyn WindowRegistry {
        self.windows.as_ref()
    }

    pub fn controls(&self) -> &dyn ControlTree {
        self.controls.as_ref()
    }

    pub fn input(&self) -> &dyn InputDriver {
        self.input.as_ref()
    }
}

impl std::fmt::Debug for Desktop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desktop")
            .field("windows", &self.windows.name())
            .field("controls", &self.controls.name())
            .field("input", &self.input.name())
            .finish()
    }
}
