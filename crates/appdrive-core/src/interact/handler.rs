use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use super::errors::InteractError;
use crate::control::{self, ControlInfo, ControlQuery};
use crate::desktop::Desktop;
use crate::input::{parse_key_sequence, send_strokes};
use crate::window::native::warn_focus_failed;
use crate::window::{WaitOptions, WindowError, WindowInfo, WindowQuery, wait_for_window};

/// Delay after focusing a window before sending events
const FOCUS_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Bring the window to the front so input lands in it.
///
/// A registry that cannot focus windows on this platform is tolerated;
/// input then goes to whatever already has focus.
pub fn focus(desktop: &Desktop, window: &WindowInfo) -> Result<(), InteractError> {
    if window.is_minimized() {
        return Err(InteractError::WindowMinimized {
            title: window.title().to_string(),
        });
    }

    match desktop.windows().focus_window(window) {
        Ok(()) => {}
        Err(e @ WindowError::Unsupported { .. }) => warn_focus_failed(window, &e),
        Err(e) => return Err(e.into()),
    }

    thread::sleep(FOCUS_SETTLE_DELAY);
    Ok(())
}

/// Locate exactly one control in the window
pub fn find_control(
    desktop: &Desktop,
    window: &WindowInfo,
    query: &ControlQuery,
) -> Result<ControlInfo, InteractError> {
    Ok(control::find_control(desktop.controls(), window, query)?)
}

/// Focus the window and left-click the center of the matching control.
///
/// Returns the control that was clicked.
pub fn click_control(
    desktop: &Desktop,
    window: &WindowInfo,
    query: &ControlQuery,
) -> Result<ControlInfo, InteractError> {
    info!(
        event = "core.interact.click_started",
        window = window.title(),
        control = %query
    );

    focus(desktop, window)?;

    let control = find_control(desktop, window, query)?;
    if !control.enabled() {
        return Err(InteractError::ControlDisabled {
            query: query.to_string(),
        });
    }
    if control.width() == 0 || control.height() == 0 {
        return Err(InteractError::ControlNotVisible {
            query: query.to_string(),
        });
    }

    let (x, y) = control.center();
    desktop.input().click_at(x, y)?;

    info!(
        event = "core.interact.click_completed",
        control = %query,
        x = x,
        y = y
    );
    Ok(control)
}

/// Focus the window and type a brace-notation key sequence.
///
/// The sequence is parsed before anything happens on screen, so a typo does
/// not leave the window focused with half the keys sent.
pub fn send_keys(
    desktop: &Desktop,
    window: &WindowInfo,
    sequence: &str,
) -> Result<usize, InteractError> {
    let strokes = parse_key_sequence(sequence)?;

    info!(
        event = "core.interact.keys_started",
        window = window.title(),
        sequence = sequence,
        strokes = strokes.len()
    );

    focus(desktop, window)?;
    let sent = send_strokes(desktop.input(), &strokes)?;

    info!(event = "core.interact.keys_completed", strokes = sent);
    Ok(sent)
}

/// Poll the window's controls until one shows `text`. `Ok(false)` on timeout.
pub fn wait_for_text(
    desktop: &Desktop,
    window: &WindowInfo,
    text: &str,
    options: &WaitOptions,
) -> Result<bool, InteractError> {
    Ok(control::wait_for_text(
        desktop.controls(),
        window,
        text,
        options,
    )?)
}

/// Click a control, then wait for a window to become ready.
///
/// `Ok(None)` means the click happened but no matching window showed up
/// within `settle`.
pub fn click_and_expect_window(
    desktop: &Desktop,
    window: &WindowInfo,
    control: &ControlQuery,
    expected: &WindowQuery,
    settle: &WaitOptions,
) -> Result<Option<WindowInfo>, InteractError> {
    click_control(desktop, window, control)?;
    let appeared = wait_for_window(desktop.windows(), expected, settle)?;
    if appeared.is_none() {
        warn!(
            event = "core.interact.expected_window_missing",
            control = %control,
            expected = %expected
        );
    }
    Ok(appeared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ControlError, ControlRole, ControlTree};
    use crate::input::{InputDriver, InputError, KeyStroke};
    use crate::window::WindowRegistry;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Log {
        clicks: Vec<(i32, i32)>,
        keys: Vec<KeyStroke>,
        focused: u32,
    }

    struct Registry {
        log: Arc<Mutex<Log>>,
        focus_supported: bool,
    }

    impl WindowRegistry for Registry {
        fn name(&self) -> &'static str {
            "test"
        }

        fn list_windows(&self) -> Result<Vec<WindowInfo>, WindowError> {
            Ok(vec![window(false)])
        }

        fn focus_window(&self, _window: &WindowInfo) -> Result<(), WindowError> {
            if !self.focus_supported {
                return Err(WindowError::Unsupported {
                    operation: "focus",
                    platform: "test",
                });
            }
            self.log.lock().unwrap().focused += 1;
            Ok(())
        }

        fn close_window(&self, _window: &WindowInfo) -> Result<(), WindowError> {
            Ok(())
        }
    }

    struct Tree;

    impl ControlTree for Tree {
        fn name(&self) -> &'static str {
            "test"
        }

        fn controls(&self, _window: &WindowInfo) -> Result<Vec<ControlInfo>, ControlError> {
            Ok(vec![
                ControlInfo::new(ControlRole::Button, Some("2".into()), None, 100, 200, 40, 20, true),
                ControlInfo::new(ControlRole::Button, Some("%".into()), None, 0, 0, 40, 20, false),
                ControlInfo::new(ControlRole::Button, Some("hidden".into()), None, 0, 0, 0, 0, true),
            ])
        }
    }

    struct Input {
        log: Arc<Mutex<Log>>,
    }

    impl InputDriver for Input {
        fn name(&self) -> &'static str {
            "test"
        }

        fn click_at(&self, x: i32, y: i32) -> Result<(), InputError> {
            self.log.lock().unwrap().clicks.push((x, y));
            Ok(())
        }

        fn send_keys(&self, strokes: &[KeyStroke]) -> Result<(), InputError> {
            self.log.lock().unwrap().keys.extend_from_slice(strokes);
            Ok(())
        }
    }

    fn window(minimized: bool) -> WindowInfo {
        WindowInfo::new(
            1,
            "Calculator".into(),
            "calc".into(),
            0,
            0,
            300,
            400,
            minimized,
            true,
            Some(1),
        )
    }

    fn desktop(focus_supported: bool) -> (Desktop, Arc<Mutex<Log>>) {
        let log = Arc::new(Mutex::new(Log::default()));
        let desktop = Desktop::new(
            Box::new(Registry {
                log: Arc::clone(&log),
                focus_supported,
            }),
            Box::new(Tree),
            Box::new(Input {
                log: Arc::clone(&log),
            }),
        );
        (desktop, log)
    }

    #[test]
    fn test_click_control_clicks_center() {
        let (desktop, log) = desktop(true);
        let control = click_control(&desktop, &window(false), &ControlQuery::button("2")).unwrap();
        assert_eq!(control.title(), Some("2"));

        let log = log.lock().unwrap();
        assert_eq!(log.clicks, vec![(120, 210)]);
        assert_eq!(log.focused, 1);
    }

    #[test]
    fn test_click_disabled_control() {
        let (desktop, log) = desktop(true);
        let err = click_control(&desktop, &window(false), &ControlQuery::button("%")).unwrap_err();
        assert!(matches!(err, InteractError::ControlDisabled { .. }));
        assert!(log.lock().unwrap().clicks.is_empty());
    }

    #[test]
    fn test_click_zero_size_control() {
        let (desktop, _log) = desktop(true);
        let err =
            click_control(&desktop, &window(false), &ControlQuery::new("hidden")).unwrap_err();
        assert!(matches!(err, InteractError::ControlNotVisible { .. }));
    }

    #[test]
    fn test_minimized_window_rejected() {
        let (desktop, log) = desktop(true);
        let err = send_keys(&desktop, &window(true), "1").unwrap_err();
        assert!(matches!(err, InteractError::WindowMinimized { .. }));
        assert!(log.lock().unwrap().keys.is_empty());
    }

    #[test]
    fn test_unsupported_focus_is_tolerated() {
        let (desktop, log) = desktop(false);
        let sent = send_keys(&desktop, &window(false), "{ESC}21*2{ENTER}").unwrap();
        assert_eq!(sent, 6);
        assert_eq!(log.lock().unwrap().keys.len(), 6);
    }

    #[test]
    fn test_invalid_sequence_does_not_focus() {
        let (desktop, log) = desktop(true);
        let err = send_keys(&desktop, &window(false), "{NOPE}").unwrap_err();
        assert!(matches!(err, InteractError::Input(_)));
        assert_eq!(log.lock().unwrap().focused, 0);
    }
}
