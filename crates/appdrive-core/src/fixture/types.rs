use std::time::Duration;

use serde::Serialize;

use crate::config::DriveConfig;
use crate::process::TerminationOutcome;
use crate::window::{WaitOptions, WindowQuery};

/// How a fixture finds its main window and shuts the process down.
#[derive(Debug, Clone)]
pub struct FixtureOptions {
    /// The window that marks the app as started
    pub main_window: WindowQuery,
    /// Wait for the main window to become ready
    pub launch_wait: WaitOptions,
    /// Wait for the main window to disappear after a close request
    pub close_wait: WaitOptions,
    /// Written to the process's stdin once the main window is ready
    pub detach_key: Option<String>,
    /// Extra sleep after the main window is ready
    pub first_frame_delay: Duration,
    /// Time between the polite terminate signal and the forced kill
    pub grace_period: Duration,
    pub inherit_output: bool,
}

impl FixtureOptions {
    /// Options built from the default configuration
    pub fn new(main_window: WindowQuery) -> Self {
        Self::from_config(main_window, &DriveConfig::default())
    }

    pub fn from_config(main_window: WindowQuery, config: &DriveConfig) -> Self {
        Self {
            main_window,
            launch_wait: WaitOptions::from(&config.wait),
            close_wait: WaitOptions::settle(&config.wait),
            detach_key: config.process.detach_key.clone(),
            first_frame_delay: config.wait.first_frame_delay(),
            grace_period: config.process.grace_period(),
            inherit_output: config.process.inherit_output(),
        }
    }

    pub fn with_launch_wait(mut self, wait: WaitOptions) -> Self {
        self.launch_wait = wait;
        self
    }

    pub fn with_close_wait(mut self, wait: WaitOptions) -> Self {
        self.close_wait = wait;
        self
    }

    pub fn with_detach_key(mut self, key: impl Into<String>) -> Self {
        self.detach_key = Some(key.into());
        self
    }

    pub fn with_first_frame_delay(mut self, delay: Duration) -> Self {
        self.first_frame_delay = delay;
        self
    }

    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }
}

/// What happened to the main window during teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowCloseOutcome {
    /// No matching window was open
    NotOpen,
    /// Close was requested and the window disappeared
    Closed,
    /// Close was requested but the window was still listed afterwards
    StillOpen,
    /// The close request itself failed
    Failed,
}

/// Result of tearing a fixture down.
///
/// Teardown never fails; problems are recorded here and logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    pub pid: u32,
    pub window_close: WindowCloseOutcome,
    /// `None` when signalling or reaping the process failed
    pub termination: Option<TerminationOutcome>,
    /// Whether the OS still lists the process after teardown
    pub still_running: bool,
}

impl TeardownReport {
    /// Process is gone and nothing went wrong along the way
    pub fn is_clean(&self) -> bool {
        self.termination.is_some() && !self.still_running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let config: DriveConfig = toml::from_str(
            r#"
            [wait]
            timeout_ms = 3000
            retry_interval_ms = 250
            first_frame_delay_ms = 500

            [process]
            grace_period_ms = 1000
            detach_key = "d"
            "#,
        )
        .unwrap();

        let options = FixtureOptions::from_config(WindowQuery::title("Main"), &config);
        assert_eq!(options.launch_wait, WaitOptions::from_millis(3000, 250));
        assert_eq!(options.close_wait.retry_interval(), Duration::from_millis(100));
        assert_eq!(options.first_frame_delay, Duration::from_millis(500));
        assert_eq!(options.grace_period, Duration::from_secs(1));
        assert_eq!(options.detach_key.as_deref(), Some("d"));
    }

    #[test]
    fn test_report_is_clean() {
        let mut report = TeardownReport {
            pid: 1,
            window_close: WindowCloseOutcome::Closed,
            termination: Some(TerminationOutcome::Terminated),
            still_running: false,
        };
        assert!(report.is_clean());

        report.still_running = true;
        assert!(!report.is_clean());
    }
}
