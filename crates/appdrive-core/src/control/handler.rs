use tracing::{info, warn};

use super::errors::ControlError;
use super::tree::ControlTree;
use super::types::{ControlInfo, ControlQuery};
use crate::window::handler::poll_until;
use crate::window::{WaitOptions, WindowInfo};

/// List every control currently in the window
pub fn list_controls(
    tree: &dyn ControlTree,
    window: &WindowInfo,
) -> Result<Vec<ControlInfo>, ControlError> {
    let controls = tree.controls(window)?;
    info!(
        event = "core.control.list_completed",
        backend = tree.name(),
        window = window.title(),
        count = controls.len()
    );
    Ok(controls)
}

/// Find exactly one control matching the query.
///
/// # Errors
///
/// `ControlNotFound` if nothing matches, `ControlAmbiguous` if more than one
/// control does.
pub fn find_control(
    tree: &dyn ControlTree,
    window: &WindowInfo,
    query: &ControlQuery,
) -> Result<ControlInfo, ControlError> {
    info!(
        event = "core.control.find_started",
        query = %query,
        window = window.title()
    );

    let controls = tree.controls(window)?;
    let mut matches: Vec<ControlInfo> = controls.into_iter().filter(|c| query.matches(c)).collect();

    match matches.len() {
        0 => {
            info!(event = "core.control.find_not_found", query = %query);
            Err(ControlError::ControlNotFound {
                query: query.to_string(),
                window: window.title().to_string(),
            })
        }
        1 => {
            let control = matches.remove(0);
            info!(
                event = "core.control.find_completed",
                query = %query,
                role = %control.role()
            );
            Ok(control)
        }
        count => {
            warn!(
                event = "core.control.find_ambiguous",
                query = %query,
                count = count
            );
            Err(ControlError::ControlAmbiguous {
                query: query.to_string(),
                window: window.title().to_string(),
                count,
            })
        }
    }
}

/// Poll until some control in the window displays `text` as content (see
/// [`ControlInfo::displays_text`]). Returns `Ok(false)` on timeout.
pub fn wait_for_text(
    tree: &dyn ControlTree,
    window: &WindowInfo,
    text: &str,
    options: &WaitOptions,
) -> Result<bool, ControlError> {
    info!(
        event = "core.control.wait_text_started",
        text = text,
        window = window.title(),
        timeout_ms = options.timeout().as_millis() as u64
    );

    let found = poll_until(options, || {
        let controls = tree.controls(window)?;
        Ok::<_, ControlError>(controls.iter().any(|c| c.displays_text(text)).then_some(()))
    })?
    .is_some();

    if found {
        info!(event = "core.control.wait_text_completed", text = text);
    } else {
        warn!(event = "core.control.wait_text_timeout", text = text);
    }
    Ok(found)
}
