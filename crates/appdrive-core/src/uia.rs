//! Windows UI Automation lookups shared by the window registry and the
//! control tree.

use uiautomation::{UIAutomation, UIElement, UITreeWalker};

use crate::window::WindowInfo;

/// Top-level windows sit directly under the desktop root; depth 2 also
/// covers dialogs parented to them.
const WINDOW_SEARCH_DEPTH: u32 = 2;

/// Locate the UIA element for a listed window.
///
/// Matches on title and then on owning pid, so a same-titled window of
/// another process is never picked.
pub(crate) fn find_window(window: &WindowInfo) -> Result<(UIAutomation, UIElement), String> {
    let pid = window
        .pid()
        .ok_or_else(|| "window has no usable PID".to_string())?;
    let automation =
        UIAutomation::new().map_err(|e| format!("failed to initialize UI Automation: {}", e))?;
    let root = automation
        .get_root_element()
        .map_err(|e| format!("failed to read the desktop root: {}", e))?;

    // find_all reports "nothing found" as an error
    let candidates = automation
        .create_matcher()
        .from(root)
        .depth(WINDOW_SEARCH_DEPTH)
        .timeout(0)
        .name(window.title())
        .find_all()
        .unwrap_or_default();

    let element = candidates
        .into_iter()
        .find(|element| {
            element
                .get_process_id()
                .ok()
                .and_then(|p| u32::try_from(p).ok())
                == Some(pid)
        })
        .ok_or_else(|| {
            format!(
                "no UI Automation window titled '{}' for PID {}",
                window.title(),
                pid
            )
        })?;

    Ok((automation, element))
}

/// Direct children of `element` in the control view
pub(crate) fn children(walker: &UITreeWalker, element: &UIElement) -> Vec<UIElement> {
    let mut out = Vec::new();
    let mut next = walker.get_first_child(element).ok();
    while let Some(child) = next {
        next = walker.get_next_sibling(&child).ok();
        out.push(child);
    }
    out
}
