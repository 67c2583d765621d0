use tracing::info;

use super::errors::AssertError;
use super::types::{Assertion, AssertionResult};
use crate::control::wait_for_text;
use crate::desktop::Desktop;
use crate::window::handler::poll_until;
use crate::window::{WindowError, find_windows, wait_for_window, wait_for_window_closed};

/// Evaluate an assertion against the desktop.
///
/// A check that does not hold is `Ok` with `passed == false`. Errors mean
/// the desktop could not be queried.
pub fn run_assertion(
    desktop: &Desktop,
    assertion: &Assertion,
) -> Result<AssertionResult, AssertError> {
    info!(event = "core.assert.run_started", assertion = %assertion);

    let result = match assertion {
        Assertion::WindowExists { query, wait } => {
            match wait_for_window(desktop.windows(), query, wait)? {
                Some(window) => AssertionResult::pass(format!(
                    "Window '{}' is ready ({}x{} at {},{})",
                    window.title(),
                    window.width(),
                    window.height(),
                    window.x(),
                    window.y()
                )),
                None => AssertionResult::fail(format!("No ready window {}", query)),
            }
        }
        Assertion::WindowAbsent { query, wait } => {
            if wait_for_window_closed(desktop.windows(), query, wait)? {
                AssertionResult::pass(format!("No window {}", query))
            } else {
                AssertionResult::fail(format!("Window {} is still open", query))
            }
        }
        Assertion::WindowCount {
            query,
            expected,
            wait,
        } => {
            let mut last = 0;
            let reached = poll_until(wait, || {
                last = find_windows(desktop.windows(), query)?.len();
                Ok::<_, WindowError>((last == *expected).then_some(()))
            })?;
            if reached.is_some() {
                AssertionResult::pass(format!("Found {} window(s) {}", expected, query))
            } else {
                AssertionResult::fail(format!(
                    "Expected {} window(s) {}, found {}",
                    expected, query, last
                ))
            }
        }
        Assertion::TextVisible { window, text, wait } => {
            match wait_for_window(desktop.windows(), window, wait)? {
                None => AssertionResult::fail(format!("No ready window {}", window)),
                Some(target) => {
                    if wait_for_text(desktop.controls(), &target, text, wait)? {
                        AssertionResult::pass(format!(
                            "Text '{}' is visible in '{}'",
                            text,
                            target.title()
                        ))
                    } else {
                        AssertionResult::fail(format!(
                            "Text '{}' is not visible in '{}'",
                            text,
                            target.title()
                        ))
                    }
                }
            }
        }
    };

    info!(
        event = "core.assert.run_completed",
        assertion = %assertion,
        passed = result.passed
    );
    Ok(result)
}
