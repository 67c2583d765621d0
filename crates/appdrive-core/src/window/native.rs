//! Window registry backed by the real desktop.
//!
//! Enumeration goes through xcap on every platform. Focus and close use the
//! Accessibility API on macOS, `wmctrl` on Linux and UI Automation on
//! Windows.

use tracing::{debug, info, warn};

use super::errors::WindowError;
use super::registry::WindowRegistry;
use super::types::WindowInfo;

/// Windows smaller than this in either dimension are treated as
/// non-interactive (tooltips, invisible helper windows, windows still
/// being laid out).
pub const MIN_INTERACTIVE_SIZE: u32 = 10;

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeWindowRegistry;

impl NativeWindowRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl WindowRegistry for NativeWindowRegistry {
    fn name(&self) -> &'static str {
        "native"
    }

    fn list_windows(&self) -> Result<Vec<WindowInfo>, WindowError> {
        debug!(event = "core.window.list_started");

        let windows = xcap::Window::all().map_err(|e| WindowError::EnumerationFailed {
            message: e.to_string(),
        })?;

        let mut skipped_count = 0;
        let result: Vec<WindowInfo> = windows
            .into_iter()
            .filter_map(|w| {
                let info = to_window_info(&w);
                if info.is_none() {
                    skipped_count += 1;
                }
                info
            })
            .collect();

        if skipped_count > 0 {
            debug!(
                event = "core.window.list_incomplete",
                skipped_count = skipped_count,
                returned_count = result.len()
            );
        }

        debug!(event = "core.window.list_completed", count = result.len());
        Ok(result)
    }

    fn focus_window(&self, window: &WindowInfo) -> Result<(), WindowError> {
        info!(
            event = "core.window.focus_started",
            window_id = window.id(),
            title = window.title()
        );
        platform::focus(window)
    }

    fn close_window(&self, window: &WindowInfo) -> Result<(), WindowError> {
        info!(
            event = "core.window.close_started",
            window_id = window.id(),
            title = window.title()
        );
        platform::close(window)
    }
}

/// Convert an xcap window, skipping it if its id cannot be read.
///
/// Geometry falls back to zero, which makes the window not ready rather than
/// dropping it; a window that is listed but unreadable still blocks
/// `wait_for_window_closed`.
fn to_window_info(w: &xcap::Window) -> Option<WindowInfo> {
    let id = match w.id() {
        Ok(id) => id,
        Err(e) => {
            debug!(
                event = "core.window.property_access_failed",
                property = "id",
                error = %e
            );
            return None;
        }
    };

    let x = w.x().unwrap_or_else(|e| property_fallback(id, "x", e, 0));
    let y = w.y().unwrap_or_else(|e| property_fallback(id, "y", e, 0));
    let width = w
        .width()
        .unwrap_or_else(|e| property_fallback(id, "width", e, 0));
    let height = w
        .height()
        .unwrap_or_else(|e| property_fallback(id, "height", e, 0));
    let is_minimized = w
        .is_minimized()
        .unwrap_or_else(|e| property_fallback(id, "is_minimized", e, false));

    let title = w.title().unwrap_or_default();
    let app_name = w.app_name().unwrap_or_default();
    let pid = w.pid().ok();

    let interactive = width >= MIN_INTERACTIVE_SIZE && height >= MIN_INTERACTIVE_SIZE;

    Some(WindowInfo::new(
        id,
        title,
        app_name,
        x,
        y,
        width,
        height,
        is_minimized,
        interactive,
        pid,
    ))
}

fn property_fallback<T>(id: u32, property: &str, error: xcap::XCapError, default: T) -> T {
    debug!(
        event = "core.window.property_access_failed",
        property = property,
        window_id = id,
        error = %error
    );
    default
}

#[cfg(target_os = "macos")]
mod platform {
    use tracing::warn;

    use super::{WindowError, WindowInfo};
    use crate::ax::{ACTION_PRESS, ATTR_CLOSE_BUTTON, ATTR_MAIN, ATTR_RAISED, AxElement};

    fn app_window(window: &WindowInfo) -> Result<AxElement, String> {
        let pid = window
            .pid()
            .and_then(|p| i32::try_from(p).ok())
            .ok_or_else(|| "window has no usable PID".to_string())?;
        let app = AxElement::application(pid)
            .ok_or_else(|| format!("failed to create AX element for PID {}", pid))?;
        app.find_window(window.title())
            .ok_or_else(|| format!("no AX window titled '{}'", window.title()))
    }

    pub(super) fn focus(window: &WindowInfo) -> Result<(), WindowError> {
        match app_window(window) {
            Ok(ax_window) => {
                if ax_window.set_bool_attribute(ATTR_RAISED, true).is_err()
                    && let Err(code) = ax_window.set_bool_attribute(ATTR_MAIN, true)
                {
                    warn!(
                        event = "core.window.focus_ax_raise_failed",
                        title = window.title(),
                        ax_error = code
                    );
                }
            }
            Err(reason) => {
                warn!(
                    event = "core.window.focus_ax_lookup_failed",
                    title = window.title(),
                    reason = %reason
                );
            }
        }

        activate_app(window)
    }

    /// Activate the owning application so it receives keyboard input.
    fn activate_app(window: &WindowInfo) -> Result<(), WindowError> {
        let script = format!(
            "tell application \"System Events\" to set frontmost of process \"{}\" to true",
            window.app_name()
        );

        let output = std::process::Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output()
            .map_err(|e| WindowError::FocusFailed {
                title: window.title().to_string(),
                reason: format!("Failed to execute osascript: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WindowError::FocusFailed {
                title: window.title().to_string(),
                reason: stderr.trim().to_string(),
            });
        }
        Ok(())
    }

    pub(super) fn close(window: &WindowInfo) -> Result<(), WindowError> {
        let close_failed = |reason: String| WindowError::CloseFailed {
            title: window.title().to_string(),
            reason,
        };

        let ax_window = app_window(window).map_err(close_failed)?;
        let button = ax_window
            .element_attribute(ATTR_CLOSE_BUTTON)
            .ok_or_else(|| close_failed("window has no close button".to_string()))?;
        button
            .perform_action(ACTION_PRESS)
            .map_err(|code| close_failed(format!("AXPress failed (AXError: {})", code)))
    }
}

#[cfg(target_os = "linux")]
mod platform {
    use super::{WindowError, WindowInfo};

    /// Run `wmctrl -i <flag> <window id>`.
    fn wmctrl(flag: &str, window: &WindowInfo) -> Result<(), String> {
        let wmctrl = which::which("wmctrl")
            .map_err(|_| "wmctrl is not installed (needed for window focus/close)".to_string())?;

        let output = std::process::Command::new(wmctrl)
            .args(["-i", flag, &format!("0x{:08x}", window.id())])
            .output()
            .map_err(|e| format!("Failed to execute wmctrl: {}", e))?;

        if !output.status.success() {
            return Err(String::from_utf8_lossy(&output.stderr).trim().to_string());
        }
        Ok(())
    }

    pub(super) fn focus(window: &WindowInfo) -> Result<(), WindowError> {
        wmctrl("-a", window).map_err(|reason| WindowError::FocusFailed {
            title: window.title().to_string(),
            reason,
        })
    }

    pub(super) fn close(window: &WindowInfo) -> Result<(), WindowError> {
        wmctrl("-c", window).map_err(|reason| WindowError::CloseFailed {
            title: window.title().to_string(),
            reason,
        })
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use uiautomation::patterns::UIWindowPattern;

    use super::{WindowError, WindowInfo};
    use crate::uia;

    pub(super) fn focus(window: &WindowInfo) -> Result<(), WindowError> {
        let focus_failed = |reason: String| WindowError::FocusFailed {
            title: window.title().to_string(),
            reason,
        };

        let (_automation, element) = uia::find_window(window).map_err(focus_failed)?;
        element
            .set_focus()
            .map_err(|e| focus_failed(format!("SetFocus failed: {}", e)))
    }

    /// Close through the WindowPattern. Windows without one (some custom
    /// chrome) report `CloseFailed`; the fixture then falls back to Alt+F4.
    pub(super) fn close(window: &WindowInfo) -> Result<(), WindowError> {
        let close_failed = |reason: String| WindowError::CloseFailed {
            title: window.title().to_string(),
            reason,
        };

        let (_automation, element) = uia::find_window(window).map_err(close_failed)?;
        let pattern = element
            .get_pattern::<UIWindowPattern>()
            .map_err(|e| close_failed(format!("window has no WindowPattern: {}", e)))?;
        pattern
            .close()
            .map_err(|e| close_failed(format!("WindowPattern.Close failed: {}", e)))
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
mod platform {
    use super::{WindowError, WindowInfo};

    pub(super) fn focus(_window: &WindowInfo) -> Result<(), WindowError> {
        Err(WindowError::Unsupported {
            operation: "focus",
            platform: std::env::consts::OS,
        })
    }

    pub(super) fn close(_window: &WindowInfo) -> Result<(), WindowError> {
        Err(WindowError::Unsupported {
            operation: "close",
            platform: std::env::consts::OS,
        })
    }
}

/// Log and swallow a focus failure; input is still sent, it just may land
/// in the wrong window.
pub(crate) fn warn_focus_failed(window: &WindowInfo, error: &WindowError) {
    warn!(
        event = "core.window.focus_failed",
        title = window.title(),
        error = %error
    );
}
