use std::time::Duration;

use serde::Serialize;

use crate::window::{WaitOptions, WindowQuery};

/// Poll interval for assertions that wait
const ASSERT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A check against the current UI state.
///
/// Without [`Assertion::with_wait`] the check runs once against a single
/// snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Assertion {
    /// A ready window matches
    WindowExists { query: WindowQuery, wait: WaitOptions },
    /// No window matches, ready or not
    WindowAbsent { query: WindowQuery, wait: WaitOptions },
    /// Exactly `expected` windows match
    WindowCount {
        query: WindowQuery,
        expected: usize,
        wait: WaitOptions,
    },
    /// Some control in the window shows `text`
    TextVisible {
        window: WindowQuery,
        text: String,
        wait: WaitOptions,
    },
}

fn no_wait() -> WaitOptions {
    WaitOptions::new(Duration::ZERO, ASSERT_POLL_INTERVAL)
}

impl Assertion {
    pub fn window_exists(query: WindowQuery) -> Self {
        Assertion::WindowExists {
            query,
            wait: no_wait(),
        }
    }

    pub fn window_absent(query: WindowQuery) -> Self {
        Assertion::WindowAbsent {
            query,
            wait: no_wait(),
        }
    }

    pub fn window_count(query: WindowQuery, expected: usize) -> Self {
        Assertion::WindowCount {
            query,
            expected,
            wait: no_wait(),
        }
    }

    pub fn text_visible(window: WindowQuery, text: impl Into<String>) -> Self {
        Assertion::TextVisible {
            window,
            text: text.into(),
            wait: no_wait(),
        }
    }

    /// Keep re-checking until the assertion holds or `wait` runs out
    pub fn with_wait(mut self, options: WaitOptions) -> Self {
        match &mut self {
            Assertion::WindowExists { wait, .. }
            | Assertion::WindowAbsent { wait, .. }
            | Assertion::WindowCount { wait, .. }
            | Assertion::TextVisible { wait, .. } => *wait = options,
        }
        self
    }

    pub fn wait(&self) -> &WaitOptions {
        match self {
            Assertion::WindowExists { wait, .. }
            | Assertion::WindowAbsent { wait, .. }
            | Assertion::WindowCount { wait, .. }
            | Assertion::TextVisible { wait, .. } => wait,
        }
    }
}

impl std::fmt::Display for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Assertion::WindowExists { query, .. } => write!(f, "window {} exists", query),
            Assertion::WindowAbsent { query, .. } => write!(f, "window {} is absent", query),
            Assertion::WindowCount {
                query, expected, ..
            } => write!(f, "{} window(s) {}", expected, query),
            Assertion::TextVisible { window, text, .. } => {
                write!(f, "text '{}' visible in window {}", text, window)
            }
        }
    }
}

/// Outcome of one assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionResult {
    pub passed: bool,
    pub message: String,
}

impl AssertionResult {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_check() {
        let assertion = Assertion::window_exists(WindowQuery::title("Regular"));
        assert_eq!(assertion.wait().timeout(), Duration::ZERO);
    }

    #[test]
    fn test_with_wait_applies_to_every_variant() {
        let wait = WaitOptions::from_millis(1000, 50);
        let assertions = [
            Assertion::window_exists(WindowQuery::title("A")),
            Assertion::window_absent(WindowQuery::title("A")),
            Assertion::window_count(WindowQuery::title("A"), 2),
            Assertion::text_visible(WindowQuery::title("A"), "42"),
        ];
        for assertion in assertions {
            assert_eq!(assertion.with_wait(wait).wait(), &wait);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Assertion::window_count(WindowQuery::title("Regular"), 2).to_string(),
            "2 window(s) 'Regular'"
        );
        assert_eq!(
            Assertion::text_visible(WindowQuery::title("Calculator"), "4").to_string(),
            "text '4' visible in window 'Calculator'"
        );
    }
}
