//! Window registry trait definition.

use super::errors::WindowError;
use super::types::WindowInfo;

/// Read access to the desktop's window list, plus the two window-level
/// actions the fixture needs.
///
/// Implementations must query the OS on every call; callers rely on each
/// `list_windows` returning a fresh snapshot.
pub trait WindowRegistry: Send + Sync {
    /// Short name used in logs (e.g. "native", "simulated").
    fn name(&self) -> &'static str;

    /// Enumerate all windows currently known to the OS.
    fn list_windows(&self) -> Result<Vec<WindowInfo>, WindowError>;

    /// Bring a window to the foreground so keyboard input reaches it.
    fn focus_window(&self, window: &WindowInfo) -> Result<(), WindowError>;

    /// Ask a window to close the way a user would.
    ///
    /// This is a request; the window may stay open. Callers that need the
    /// window gone must poll for it.
    fn close_window(&self, window: &WindowInfo) -> Result<(), WindowError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticRegistry(Vec<WindowInfo>);

    impl WindowRegistry for StaticRegistry {
        fn name(&self) -> &'static str {
            "static"
        }

        fn list_windows(&self) -> Result<Vec<WindowInfo>, WindowError> {
            Ok(self.0.clone())
        }

        fn focus_window(&self, _window: &WindowInfo) -> Result<(), WindowError> {
            Ok(())
        }

        fn close_window(&self, _window: &WindowInfo) -> Result<(), WindowError> {
            Err(WindowError::Unsupported {
                operation: "close",
                platform: "static",
            })
        }
    }

    #[test]
    fn test_registry_is_object_safe() {
        let registry: Box<dyn WindowRegistry> = Box::new(StaticRegistry(vec![]));
        assert_eq!(registry.name(), "static");
        assert!(registry.list_windows().unwrap().is_empty());
    }
}
