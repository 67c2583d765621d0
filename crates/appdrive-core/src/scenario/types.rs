use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::control::ControlRole;
use crate::fixture::TeardownReport;
use crate::process::LaunchSpec;
use crate::window::WindowQuery;

/// A scripted session against one application.
///
/// ```toml
/// name = "calculator"
///
/// [app]
/// program = "gnome-calculator"
/// main_window = "Calculator"
///
/// [[steps]]
/// action = "keys"
/// sequence = "{ESC}21*2{ENTER}"
///
/// [[steps]]
/// action = "expect_text"
/// text = "42"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub app: AppSection,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Name for reports; falls back to the program name
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.app.program)
    }
}

/// The application a scenario launches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSection {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Relative paths are resolved against the scenario file's directory
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    /// Title of the window that marks the app as started
    pub main_window: String,
    /// Match `main_window` as a case-insensitive substring
    #[serde(default)]
    pub main_window_contains: bool,
    #[serde(default)]
    pub detach_key: Option<String>,
    #[serde(default)]
    pub launch_timeout_ms: Option<u64>,
}

impl AppSection {
    pub fn launch_spec(&self) -> LaunchSpec {
        LaunchSpec {
            program: self.program.clone(),
            args: self.args.clone(),
            cwd: self.cwd.clone(),
        }
    }

    pub fn main_window_query(&self) -> WindowQuery {
        window_query(&self.main_window, self.main_window_contains)
    }
}

/// One scenario step.
///
/// Steps without a `window` act on the app's main window. `timeout_ms`
/// overrides the configured settle time for that step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Click {
        control: String,
        #[serde(default)]
        role: Option<ControlRole>,
        #[serde(default)]
        window: Option<String>,
    },
    Keys {
        sequence: String,
        #[serde(default)]
        window: Option<String>,
    },
    Sleep {
        ms: u64,
    },
    /// Ask a window to close and wait for it to go away
    Close {
        #[serde(default)]
        window: Option<String>,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
    ExpectWindow {
        title: String,
        #[serde(default)]
        contains: bool,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
    ExpectNoWindow {
        title: String,
        #[serde(default)]
        contains: bool,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
    ExpectWindowCount {
        title: String,
        count: usize,
        #[serde(default)]
        contains: bool,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
    ExpectText {
        text: String,
        #[serde(default)]
        window: Option<String>,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Step::Click { .. } => "click",
            Step::Keys { .. } => "keys",
            Step::Sleep { .. } => "sleep",
            Step::Close { .. } => "close",
            Step::ExpectWindow { .. } => "expect_window",
            Step::ExpectNoWindow { .. } => "expect_no_window",
            Step::ExpectWindowCount { .. } => "expect_window_count",
            Step::ExpectText { .. } => "expect_text",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let on = |window: &Option<String>| {
            window
                .as_ref()
                .map(|w| format!(" in '{}'", w))
                .unwrap_or_default()
        };
        match self {
            Step::Click {
                control, window, ..
            } => write!(f, "click '{}'{}", control, on(window)),
            Step::Keys { sequence, window } => write!(f, "keys '{}'{}", sequence, on(window)),
            Step::Sleep { ms } => write!(f, "sleep {}ms", ms),
            Step::Close { window, .. } => match window {
                Some(w) => write!(f, "close '{}'", w),
                None => write!(f, "close main window"),
            },
            Step::ExpectWindow { title, .. } => write!(f, "expect window '{}'", title),
            Step::ExpectNoWindow { title, .. } => write!(f, "expect no window '{}'", title),
            Step::ExpectWindowCount { title, count, .. } => {
                write!(f, "expect {} window(s) '{}'", count, title)
            }
            Step::ExpectText { text, window, .. } => {
                write!(f, "expect text '{}'{}", text, on(window))
            }
        }
    }
}

pub(crate) fn window_query(title: &str, contains: bool) -> WindowQuery {
    if contains {
        WindowQuery::title_contains(title)
    } else {
        WindowQuery::title(title)
    }
}

/// Outcome of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub action: &'static str,
    pub description: String,
    pub passed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    pub duration_ms: u64,
}

/// Outcome of a whole scenario run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    /// RFC 3339 timestamp
    pub started_at: String,
    pub duration_ms: u64,
    pub passed: bool,
    pub steps: Vec<StepReport>,
    /// Steps never run because an earlier one failed
    pub skipped: usize,
    pub teardown: TeardownReport,
}

impl ScenarioReport {
    pub fn failed_step(&self) -> Option<&StepReport> {
        self.steps.iter().find(|s| !s.passed)
    }
}
