use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::errors::FixtureError;
use super::types::{FixtureOptions, TeardownReport, WindowCloseOutcome};
use crate::desktop::Desktop;
use crate::interact;
use crate::process::{LaunchSpec, ManagedProcess, is_process_running};
use crate::window::{
    WindowError, WindowInfo, WindowQuery, find_windows, wait_for_window, wait_for_window_closed,
};

/// Sent to the window when the registry cannot close it directly
const CLOSE_KEYS: &str = "%{F4}";

/// An external application running for the duration of one test.
///
/// Created by [`AppFixture::launch`], which only returns once the main
/// window is ready. Dropping the fixture tears it down: the main window is
/// asked to close, then the process is terminated and, after the grace
/// period, killed. This also happens when the test body panics.
pub struct AppFixture<'d> {
    desktop: &'d Desktop,
    process: ManagedProcess,
    options: FixtureOptions,
    launched_window: WindowInfo,
    report: Option<TeardownReport>,
}

impl<'d> AppFixture<'d> {
    /// Start the process and wait for its main window.
    ///
    /// # Errors
    ///
    /// `MainWindowTimeout` if the main window is not ready within
    /// `options.launch_wait`. The process has already been terminated when
    /// this (or any other post-spawn error) is returned.
    pub fn launch(
        desktop: &'d Desktop,
        spec: &LaunchSpec,
        options: FixtureOptions,
    ) -> Result<Self, FixtureError> {
        info!(
            event = "core.fixture.launch_started",
            command = %spec.command_line(),
            main_window = %options.main_window
        );

        let mut process = ManagedProcess::spawn(spec, options.inherit_output)?;

        let window = match wait_for_window(
            desktop.windows(),
            &options.main_window,
            &options.launch_wait,
        ) {
            Ok(Some(window)) => window,
            Ok(None) => {
                abandon(&mut process, options.grace_period);
                return Err(FixtureError::MainWindowTimeout {
                    query: options.main_window.to_string(),
                    command: spec.command_line(),
                    timeout_ms: options.launch_wait.timeout().as_millis() as u64,
                });
            }
            Err(e) => {
                abandon(&mut process, options.grace_period);
                return Err(e.into());
            }
        };

        if let Some(key) = &options.detach_key
            && let Err(e) = process.send_input(key)
        {
            // Launchers that already closed stdin do not need detaching
            warn!(
                event = "core.fixture.detach_failed",
                pid = process.pid(),
                error = %e
            );
        }

        if !options.first_frame_delay.is_zero() {
            debug!(
                event = "core.fixture.first_frame_delay",
                delay_ms = options.first_frame_delay.as_millis() as u64
            );
            thread::sleep(options.first_frame_delay);
        }

        info!(
            event = "core.fixture.launch_completed",
            pid = process.pid(),
            window_id = window.id(),
            title = window.title()
        );

        Ok(Self {
            desktop,
            process,
            options,
            launched_window: window,
            report: None,
        })
    }

    pub fn desktop(&self) -> &'d Desktop {
        self.desktop
    }

    pub fn pid(&self) -> u32 {
        self.process.pid()
    }

    pub fn options(&self) -> &FixtureOptions {
        &self.options
    }

    /// The main window as it was when launch completed
    pub fn launched_window(&self) -> &WindowInfo {
        &self.launched_window
    }

    /// Fresh snapshot of the main window
    pub fn main_window(&self) -> Result<WindowInfo, FixtureError> {
        let (_, windows) = self.own_windows()?;
        windows
            .into_iter()
            .find(WindowInfo::is_ready)
            .ok_or_else(|| FixtureError::MainWindowGone {
                query: self.options.main_window.to_string(),
            })
    }

    /// Windows that belong to this fixture: the launched window by id, or,
    /// once that id is gone, main-window matches owned by the same pid (apps
    /// that recreate their main window). Other same-titled windows on the
    /// desktop are never included.
    fn own_windows(&self) -> Result<(WindowQuery, Vec<WindowInfo>), WindowError> {
        let registry = self.desktop.windows();

        let by_id = self
            .options
            .main_window
            .clone()
            .with_id(self.launched_window.id());
        let windows = find_windows(registry, &by_id)?;
        if !windows.is_empty() {
            return Ok((by_id, windows));
        }

        let fallback = match self.launched_window.pid() {
            Some(pid) => self.options.main_window.clone().with_pid(pid),
            None => self.options.main_window.clone(),
        };
        let windows = find_windows(registry, &fallback)?;
        Ok((fallback, windows))
    }

    /// Whether the launched process itself is still alive
    pub fn is_running(&mut self) -> Result<bool, FixtureError> {
        Ok(!self.process.has_exited()?)
    }

    pub fn is_torn_down(&self) -> bool {
        self.report.is_some()
    }

    /// Close the main window, then terminate the process.
    ///
    /// Runs at most once; later calls (and the eventual drop) return the
    /// first report.
    pub fn teardown(&mut self) -> TeardownReport {
        if let Some(report) = &self.report {
            return report.clone();
        }

        let pid = self.process.pid();
        info!(event = "core.fixture.teardown_started", pid = pid);

        let window_close = self.close_main_window();

        let termination = match self.process.terminate(self.options.grace_period) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(event = "core.fixture.terminate_failed", pid = pid, error = %e);
                None
            }
        };

        let still_running = is_process_running(pid);
        if still_running {
            warn!(event = "core.fixture.process_survived", pid = pid);
        }

        let report = TeardownReport {
            pid,
            window_close,
            termination,
            still_running,
        };

        info!(
            event = "core.fixture.teardown_completed",
            pid = pid,
            window_close = ?report.window_close,
            termination = ?report.termination,
            clean = report.is_clean()
        );

        self.report = Some(report.clone());
        report
    }

    /// Best effort; failures are logged and termination proceeds anyway.
    fn close_main_window(&self) -> WindowCloseOutcome {
        let registry = self.desktop.windows();

        let (query, windows) = match self.own_windows() {
            Ok(found) => found,
            Err(e) => {
                warn!(
                    event = "core.fixture.close_failed",
                    query = %self.options.main_window,
                    error = %e
                );
                return WindowCloseOutcome::Failed;
            }
        };

        if windows.is_empty() {
            debug!(event = "core.fixture.close_skipped", query = %query);
            return WindowCloseOutcome::NotOpen;
        }

        for window in &windows {
            if let Err(e) = registry.close_window(window) {
                debug!(
                    event = "core.fixture.close_request_failed",
                    window_id = window.id(),
                    error = %e
                );
                if let Err(e) = interact::send_keys(self.desktop, window, CLOSE_KEYS) {
                    warn!(
                        event = "core.fixture.close_failed",
                        query = %query,
                        window_id = window.id(),
                        error = %e
                    );
                    return WindowCloseOutcome::Failed;
                }
                info!(event = "core.fixture.close_keys_sent", window_id = window.id());
            }
        }

        match wait_for_window_closed(registry, &query, &self.options.close_wait) {
            Ok(true) => WindowCloseOutcome::Closed,
            Ok(false) => WindowCloseOutcome::StillOpen,
            Err(e) => {
                warn!(event = "core.fixture.close_failed", query = %query, error = %e);
                WindowCloseOutcome::Failed
            }
        }
    }
}

impl Drop for AppFixture<'_> {
    fn drop(&mut self) {
        if self.report.is_none() {
            self.teardown();
        }
    }
}

impl std::fmt::Debug for AppFixture<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppFixture")
            .field("pid", &self.process.pid())
            .field("command", &self.process.command_line())
            .field("main_window", &self.options.main_window)
            .field("torn_down", &self.report.is_some())
            .finish()
    }
}

/// Launch an app, run `body` against it, and tear it down.
///
/// The teardown report is logged, not returned; use [`AppFixture`] directly
/// when the test needs it.
pub fn with_app<T, E, F>(
    desktop: &Desktop,
    spec: &LaunchSpec,
    options: FixtureOptions,
    body: F,
) -> Result<T, E>
where
    F: FnOnce(&mut AppFixture<'_>) -> Result<T, E>,
    E: From<FixtureError>,
{
    let mut fixture = AppFixture::launch(desktop, spec, options)?;
    let result = body(&mut fixture);
    fixture.teardown();
    result
}

fn abandon(process: &mut ManagedProcess, grace: Duration) {
    match process.terminate(grace) {
        Ok(outcome) => info!(
            event = "core.fixture.launch_abandoned",
            pid = process.pid(),
            outcome = outcome.as_str()
        ),
        Err(e) => warn!(
            event = "core.fixture.launch_abandon_failed",
            pid = process.pid(),
            error = %e
        ),
    }
}
