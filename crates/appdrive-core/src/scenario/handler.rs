use std::thread;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use super::errors::{ScenarioError, StepError};
use super::types::{Scenario, ScenarioReport, Step, StepReport, window_query};
use crate::assert::{Assertion, AssertionResult, run_assertion};
use crate::config::DriveConfig;
use crate::control::ControlQuery;
use crate::desktop::Desktop;
use crate::errors::DriveError;
use crate::fixture::{AppFixture, FixtureOptions};
use crate::interact::{click_control, send_keys};
use crate::window::{WaitOptions, WindowInfo, WindowQuery, wait_for_window, wait_for_window_closed};

/// Launch the scenario's app, run its steps in order, and tear the app down.
///
/// Stops at the first step that fails or errors; the remaining steps are
/// counted as skipped. The app is torn down on every path.
///
/// # Errors
///
/// Only launch failures are errors. Step failures are recorded in the
/// returned report.
pub fn run_scenario(
    desktop: &Desktop,
    scenario: &Scenario,
    config: &DriveConfig,
) -> Result<ScenarioReport, ScenarioError> {
    let name = scenario.display_name().to_string();
    let started_at = chrono::Utc::now().to_rfc3339();
    let start = Instant::now();

    info!(
        event = "core.scenario.run_started",
        scenario = %name,
        steps = scenario.steps.len()
    );

    let mut fixture = AppFixture::launch(
        desktop,
        &scenario.app.launch_spec(),
        fixture_options(scenario, config),
    )?;

    let settle = WaitOptions::settle(&config.wait);
    let mut steps = Vec::with_capacity(scenario.steps.len());

    for (index, step) in scenario.steps.iter().enumerate() {
        let report = run_step(&fixture, index, step, &settle);
        let passed = report.passed;
        steps.push(report);
        if !passed {
            break;
        }
    }

    let skipped = scenario.steps.len() - steps.len();
    let teardown = fixture.teardown();
    let passed = skipped == 0 && steps.iter().all(|s| s.passed);

    let report = ScenarioReport {
        name,
        started_at,
        duration_ms: start.elapsed().as_millis() as u64,
        passed,
        steps,
        skipped,
        teardown,
    };

    if report.passed {
        info!(
            event = "core.scenario.run_completed",
            scenario = %report.name,
            duration_ms = report.duration_ms
        );
    } else {
        warn!(
            event = "core.scenario.run_failed",
            scenario = %report.name,
            failed_step = report.failed_step().map(|s| s.index),
            skipped = report.skipped
        );
    }

    Ok(report)
}

fn fixture_options(scenario: &Scenario, config: &DriveConfig) -> FixtureOptions {
    let mut options = FixtureOptions::from_config(scenario.app.main_window_query(), config);
    if let Some(key) = &scenario.app.detach_key {
        options = options.with_detach_key(key.clone());
    }
    if let Some(ms) = scenario.app.launch_timeout_ms {
        options.launch_wait = options.launch_wait.with_timeout(Duration::from_millis(ms));
    }
    options
}

fn run_step(fixture: &AppFixture<'_>, index: usize, step: &Step, settle: &WaitOptions) -> StepReport {
    let start = Instant::now();
    info!(
        event = "core.scenario.step_started",
        index = index,
        step = %step
    );

    let (passed, message, error_code) = match execute_step(fixture, step, settle) {
        Ok(result) => (result.passed, result.message, None),
        Err(e) => {
            error!(
                event = "core.scenario.step_error",
                index = index,
                step = %step,
                error = %e,
                error_code = e.error_code()
            );
            (false, e.to_string(), Some(e.error_code()))
        }
    };

    info!(
        event = "core.scenario.step_completed",
        index = index,
        passed = passed
    );

    StepReport {
        index,
        action: step.action(),
        description: step.to_string(),
        passed,
        message,
        error_code,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

fn execute_step(
    fixture: &AppFixture<'_>,
    step: &Step,
    settle: &WaitOptions,
) -> Result<AssertionResult, StepError> {
    let desktop = fixture.desktop();
    let wait_for = |timeout_ms: &Option<u64>| match timeout_ms {
        Some(ms) => settle.with_timeout(Duration::from_millis(*ms)),
        None => *settle,
    };

    match step {
        Step::Click {
            control,
            role,
            window,
        } => {
            let target = target_window(fixture, window, settle)?;
            let mut query = ControlQuery::new(control.clone());
            if let Some(role) = role {
                query = query.with_role(role.clone());
            }
            let clicked = click_control(desktop, &target, &query)?;
            Ok(AssertionResult::pass(format!(
                "Clicked {} '{}'",
                clicked.role(),
                control
            )))
        }
        Step::Keys { sequence, window } => {
            let target = target_window(fixture, window, settle)?;
            let sent = send_keys(desktop, &target, sequence)?;
            Ok(AssertionResult::pass(format!(
                "Sent {} keystroke(s) to '{}'",
                sent,
                target.title()
            )))
        }
        Step::Sleep { ms } => {
            thread::sleep(Duration::from_millis(*ms));
            Ok(AssertionResult::pass(format!("Slept {}ms", ms)))
        }
        Step::Close { window, timeout_ms } => {
            let target = target_window(fixture, window, settle)?;
            // Only this window; others may share its title
            let query = WindowQuery::title(target.title()).with_id(target.id());
            desktop.windows().close_window(&target)?;
            if wait_for_window_closed(desktop.windows(), &query, &wait_for(timeout_ms))? {
                Ok(AssertionResult::pass(format!("Closed '{}'", target.title())))
            } else {
                Ok(AssertionResult::fail(format!(
                    "Window '{}' is still open after close",
                    target.title()
                )))
            }
        }
        Step::ExpectWindow {
            title,
            contains,
            timeout_ms,
        } => Ok(run_assertion(
            desktop,
            &Assertion::window_exists(window_query(title, *contains)).with_wait(wait_for(timeout_ms)),
        )?),
        Step::ExpectNoWindow {
            title,
            contains,
            timeout_ms,
        } => Ok(run_assertion(
            desktop,
            &Assertion::window_absent(window_query(title, *contains)).with_wait(wait_for(timeout_ms)),
        )?),
        Step::ExpectWindowCount {
            title,
            count,
            contains,
            timeout_ms,
        } => Ok(run_assertion(
            desktop,
            &Assertion::window_count(window_query(title, *contains), *count)
                .with_wait(wait_for(timeout_ms)),
        )?),
        Step::ExpectText {
            text,
            window,
            timeout_ms,
        } => {
            let query = match window {
                Some(title) => WindowQuery::title(title.clone()),
                None => fixture.options().main_window.clone(),
            };
            Ok(run_assertion(
                desktop,
                &Assertion::text_visible(query, text.clone()).with_wait(wait_for(timeout_ms)),
            )?)
        }
    }
}

/// The window a step acts on: the named one, or the fixture's main window
fn target_window(
    fixture: &AppFixture<'_>,
    window: &Option<String>,
    settle: &WaitOptions,
) -> Result<WindowInfo, StepError> {
    match window {
        None => Ok(fixture.main_window()?),
        Some(title) => wait_for_window(
            fixture.desktop().windows(),
            &WindowQuery::title(title.clone()),
            settle,
        )?
        .ok_or_else(|| StepError::TargetWindowMissing {
            title: title.clone(),
        }),
    }
}
