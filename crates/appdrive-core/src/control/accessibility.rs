//! Control tree backed by the platform accessibility API.
//!
//! macOS reads the AX tree, Linux walks AT-SPI over D-Bus and Windows walks
//! the UI Automation control view. Any other platform returns
//! [`ControlError::Unsupported`] so callers fail loudly instead of seeing an
//! empty window.

use tracing::{debug, info};

use super::errors::ControlError;
use super::tree::ControlTree;
use super::types::ControlInfo;
use crate::window::WindowInfo;

/// Depth limit for the element walk; real UIs rarely nest deeper than ~15
const MAX_DEPTH: usize = 40;

/// Stop collecting after this many elements
const MAX_ELEMENTS: usize = 5_000;

#[derive(Debug, Default, Clone, Copy)]
pub struct AccessibilityControlTree;

impl AccessibilityControlTree {
    pub fn new() -> Self {
        Self
    }
}

impl ControlTree for AccessibilityControlTree {
    fn name(&self) -> &'static str {
        "accessibility"
    }

    fn controls(&self, window: &WindowInfo) -> Result<Vec<ControlInfo>, ControlError> {
        info!(
            event = "core.control.query_started",
            window_id = window.id(),
            title = window.title()
        );

        let controls = platform::query_controls(window)?;

        debug!(
            event = "core.control.query_completed",
            window_id = window.id(),
            count = controls.len()
        );
        Ok(controls)
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use tracing::warn;

    use super::{ControlError, ControlInfo, MAX_DEPTH, MAX_ELEMENTS, WindowInfo};
    use crate::ax::{
        ATTR_CHILDREN, ATTR_DESCRIPTION, ATTR_ENABLED, ATTR_ROLE, ATTR_TITLE, ATTR_VALUE,
        AxElement, is_trusted,
    };
    use crate::control::types::ControlRole;

    pub(super) fn query_controls(window: &WindowInfo) -> Result<Vec<ControlInfo>, ControlError> {
        if !is_trusted() {
            return Err(ControlError::AccessibilityPermissionDenied);
        }

        let pid = window
            .pid()
            .and_then(|p| i32::try_from(p).ok())
            .ok_or_else(|| ControlError::NoPidAvailable {
                title: window.title().to_string(),
            })?;

        let app = AxElement::application(pid).ok_or_else(|| {
            ControlError::AccessibilityQueryFailed {
                reason: format!("failed to create AX element for PID {}", pid),
            }
        })?;

        let ax_window =
            app.find_window(window.title())
                .ok_or_else(|| ControlError::AccessibilityQueryFailed {
                    reason: format!("no AX window titled '{}'", window.title()),
                })?;

        let mut out = Vec::new();
        walk(&ax_window, 0, &mut out);

        if out.len() >= MAX_ELEMENTS {
            warn!(
                event = "core.control.query_truncated",
                window_id = window.id(),
                limit = MAX_ELEMENTS
            );
        }
        Ok(out)
    }

    fn walk(element: &AxElement, depth: usize, out: &mut Vec<ControlInfo>) {
        if depth > MAX_DEPTH || out.len() >= MAX_ELEMENTS {
            return;
        }

        for child in element.elements_attribute(ATTR_CHILDREN) {
            if out.len() >= MAX_ELEMENTS {
                return;
            }
            if let Some(info) = to_control_info(&child) {
                out.push(info);
            }
            walk(&child, depth + 1, out);
        }
    }

    fn to_control_info(element: &AxElement) -> Option<ControlInfo> {
        let role = element.string_attribute(ATTR_ROLE)?;
        // Many buttons expose their label only as AXDescription
        let title = element
            .string_attribute(ATTR_TITLE)
            .or_else(|| element.string_attribute(ATTR_DESCRIPTION));
        let value = element.string_attribute(ATTR_VALUE);
        let (x, y) = element.position().unwrap_or((0.0, 0.0));
        let (width, height) = element.size().unwrap_or((0.0, 0.0));
        let enabled = element.bool_attribute(ATTR_ENABLED).unwrap_or(true);

        Some(ControlInfo::new(
            ControlRole::from_platform(&role),
            title,
            value,
            x as i32,
            y as i32,
            width.max(0.0) as u32,
            height.max(0.0) as u32,
            enabled,
        ))
    }
}

#[cfg(target_os = "linux")]
mod platform {
    use tracing::{debug, warn};

    use super::{ControlError, ControlInfo, MAX_DEPTH, MAX_ELEMENTS, WindowInfo};
    use crate::a11y_bus::{Bus, Element, Node, block_on};
    use crate::control::types::ControlRole;

    fn query_failed(reason: String) -> ControlError {
        ControlError::AccessibilityQueryFailed { reason }
    }

    pub(super) fn query_controls(window: &WindowInfo) -> Result<Vec<ControlInfo>, ControlError> {
        let pid = window.pid().ok_or_else(|| ControlError::NoPidAvailable {
            title: window.title().to_string(),
        })?;

        let controls = block_on(collect(pid, window.title())).map_err(query_failed)??;

        if controls.len() >= MAX_ELEMENTS {
            warn!(
                event = "core.control.query_truncated",
                window_id = window.id(),
                limit = MAX_ELEMENTS
            );
        }
        Ok(controls)
    }

    async fn collect(pid: u32, title: &str) -> Result<Vec<ControlInfo>, ControlError> {
        let bus = Bus::connect().await.map_err(query_failed)?;
        let frame = bus
            .find_window(pid, title)
            .await
            .map_err(query_failed)?
            .ok_or_else(|| query_failed(format!("no AT-SPI frame titled '{}'", title)))?;

        let roots = bus
            .children(&frame)
            .await
            .map_err(|e| query_failed(e.to_string()))?;

        // Pre-order walk; children are pushed reversed so they pop in order
        let mut stack: Vec<(Node, usize)> = roots.into_iter().rev().map(|n| (n, 1)).collect();
        let mut out = Vec::new();

        while let Some((node, depth)) = stack.pop() {
            if out.len() >= MAX_ELEMENTS {
                break;
            }
            match bus.element(&node).await {
                Ok(element) => out.push(to_control_info(element)),
                Err(e) => {
                    debug!(event = "core.control.element_skipped", path = %node.path, error = %e);
                    continue;
                }
            }
            if depth < MAX_DEPTH
                && let Ok(children) = bus.children(&node).await
            {
                stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
            }
        }
        Ok(out)
    }

    pub(super) fn to_control_info(element: Element) -> ControlInfo {
        // AT-SPI reports both labels' and entries' role as "text"; only
        // entries are editable
        let role = if element.editable && element.role == "text" {
            ControlRole::TextField
        } else {
            ControlRole::from_platform(&element.role)
        };
        let title = Some(element.name).filter(|n| !n.is_empty());
        let (x, y, width, height) = element.extents.unwrap_or((0, 0, 0, 0));

        ControlInfo::new(
            role,
            title,
            element.text,
            x,
            y,
            width.max(0) as u32,
            height.max(0) as u32,
            element.enabled,
        )
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use tracing::warn;
    use uiautomation::UIElement;
    use uiautomation::patterns::UIValuePattern;

    use super::{ControlError, ControlInfo, MAX_DEPTH, MAX_ELEMENTS, WindowInfo};
    use crate::control::types::ControlRole;
    use crate::uia;

    fn query_failed(reason: String) -> ControlError {
        ControlError::AccessibilityQueryFailed { reason }
    }

    pub(super) fn query_controls(window: &WindowInfo) -> Result<Vec<ControlInfo>, ControlError> {
        if window.pid().is_none() {
            return Err(ControlError::NoPidAvailable {
                title: window.title().to_string(),
            });
        }

        let (automation, root) = uia::find_window(window).map_err(query_failed)?;
        let walker = automation
            .get_control_view_walker()
            .map_err(|e| query_failed(e.to_string()))?;

        let mut stack: Vec<(UIElement, usize)> = uia::children(&walker, &root)
            .into_iter()
            .rev()
            .map(|e| (e, 1))
            .collect();
        let mut out = Vec::new();

        while let Some((element, depth)) = stack.pop() {
            if out.len() >= MAX_ELEMENTS {
                warn!(
                    event = "core.control.query_truncated",
                    window_id = window.id(),
                    limit = MAX_ELEMENTS
                );
                break;
            }
            if let Some(info) = to_control_info(&element) {
                out.push(info);
            }
            if depth < MAX_DEPTH {
                let children = uia::children(&walker, &element);
                stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
            }
        }
        Ok(out)
    }

    fn to_control_info(element: &UIElement) -> Option<ControlInfo> {
        // ControlType's Debug name is the UIA programmatic name ("Button", "Edit")
        let role = format!("{:?}", element.get_control_type().ok()?);
        let title = element.get_name().ok().filter(|n| !n.is_empty());
        let value = element
            .get_pattern::<UIValuePattern>()
            .and_then(|pattern| pattern.get_value())
            .ok()
            .filter(|v| !v.is_empty());
        let (x, y, width, height) = element
            .get_bounding_rectangle()
            .map(|r| (r.get_left(), r.get_top(), r.get_width(), r.get_height()))
            .unwrap_or((0, 0, 0, 0));
        let enabled = element.is_enabled().unwrap_or(true);

        Some(ControlInfo::new(
            ControlRole::from_platform(&role),
            title,
            value,
            x,
            y,
            width.max(0) as u32,
            height.max(0) as u32,
            enabled,
        ))
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
mod platform {
    use super::{ControlError, ControlInfo, WindowInfo};

    pub(super) fn query_controls(_window: &WindowInfo) -> Result<Vec<ControlInfo>, ControlError> {
        Err(ControlError::Unsupported {
            platform: std::env::consts::OS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_name() {
        assert_eq!(AccessibilityControlTree::new().name(), "accessibility");
    }

    #[cfg(any(target_os = "linux", target_os = "windows"))]
    fn window_without_pid() -> WindowInfo {
        WindowInfo::new(
            1,
            "Main".to_string(),
            "app".to_string(),
            0,
            0,
            100,
            100,
            false,
            true,
            None,
        )
    }

    #[cfg(any(target_os = "linux", target_os = "windows"))]
    #[test]
    fn test_window_without_pid_is_rejected() {
        let result = AccessibilityControlTree::new().controls(&window_without_pid());
        assert!(matches!(result, Err(ControlError::NoPidAvailable { .. })));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_atspi_elements_map_to_controls() {
        use crate::a11y_bus::Element;
        use crate::control::types::ControlRole;

        let button = platform::to_control_info(Element {
            role: "push button".to_string(),
            name: "Regular".to_string(),
            text: None,
            extents: Some((10, 20, 80, -1)),
            enabled: true,
            editable: false,
        });
        assert_eq!(button.role(), &ControlRole::Button);
        assert_eq!(button.title(), Some("Regular"));
        assert_eq!((button.x(), button.y()), (10, 20));
        assert_eq!((button.width(), button.height()), (80, 0));

        let entry = platform::to_control_info(Element {
            role: "text".to_string(),
            name: String::new(),
            text: Some("42".to_string()),
            editable: true,
            ..Default::default()
        });
        assert_eq!(entry.role(), &ControlRole::TextField);
        assert_eq!(entry.title(), None);
        assert_eq!(entry.value(), Some("42"));
        assert!(!entry.enabled());

        let label = platform::to_control_info(Element {
            role: "text".to_string(),
            name: "Result".to_string(),
            enabled: true,
            ..Default::default()
        });
        assert_eq!(label.role(), &ControlRole::Text);
    }

    #[cfg(target_os = "linux")]
    #[test]
    #[ignore = "needs a desktop session with the AT-SPI bus"]
    fn test_unknown_pid_has_no_frame() {
        let window = WindowInfo::new(
            1,
            "No Such Window".to_string(),
            "app".to_string(),
            0,
            0,
            100,
            100,
            false,
            true,
            Some(u32::MAX),
        );
        let result = AccessibilityControlTree::new().controls(&window);
        assert!(matches!(
            result,
            Err(ControlError::AccessibilityQueryFailed { .. })
        ));
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    #[test]
    fn test_unsupported_platform_reports_error() {
        let window = WindowInfo::new(
            1,
            "Main".to_string(),
            "app".to_string(),
            0,
            0,
            100,
            100,
            false,
            true,
            Some(1),
        );
        let result = AccessibilityControlTree::new().controls(&window);
        assert!(matches!(result, Err(ControlError::Unsupported { .. })));
    }
}
