use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::errors::ScenarioError;
use super::types::{Scenario, Step};
use crate::input::parse_key_sequence;

/// Read, parse and validate a scenario file.
///
/// A relative `app.cwd` is resolved against the file's directory.
pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    info!(event = "core.scenario.load_started", path = %path.display());

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ScenarioError::NotFound {
                path: path.display().to_string(),
            }
        } else {
            ScenarioError::ReadFailed {
                path: path.display().to_string(),
                source,
            }
        }
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let scenario = parse_scenario(&path.display().to_string(), &content, base_dir)?;

    info!(
        event = "core.scenario.load_completed",
        path = %path.display(),
        steps = scenario.steps.len()
    );
    Ok(scenario)
}

/// Parse scenario TOML. `origin` is only used in error messages.
pub fn parse_scenario(
    origin: &str,
    content: &str,
    base_dir: &Path,
) -> Result<Scenario, ScenarioError> {
    let mut scenario: Scenario =
        toml::from_str(content).map_err(|e| ScenarioError::ParseFailed {
            path: origin.to_string(),
            message: e.to_string(),
        })?;

    if let Some(cwd) = &scenario.app.cwd
        && cwd.is_relative()
    {
        let resolved = base_dir.join(cwd);
        debug!(
            event = "core.scenario.cwd_resolved",
            cwd = %resolved.display()
        );
        scenario.app.cwd = Some(resolved);
    }

    validate_scenario(&scenario)?;
    Ok(scenario)
}

/// Reject scenarios that cannot run, before anything is launched
pub fn validate_scenario(scenario: &Scenario) -> Result<(), ScenarioError> {
    let invalid = |message: String| ScenarioError::Invalid { message };

    if scenario.app.program.trim().is_empty() {
        return Err(invalid("app.program must not be empty".to_string()));
    }
    if scenario.app.main_window.is_empty() {
        return Err(invalid("app.main_window must not be empty".to_string()));
    }
    if let Some(key) = &scenario.app.detach_key
        && key.chars().count() != 1
    {
        return Err(invalid(format!(
            "app.detach_key must be a single character, got '{}'",
            key
        )));
    }

    for (index, step) in scenario.steps.iter().enumerate() {
        let step_number = index + 1;
        match step {
            Step::Keys { sequence, .. } => {
                parse_key_sequence(sequence)
                    .map_err(|e| invalid(format!("step {}: {}", step_number, e)))?;
            }
            Step::Click { control, .. } if control.is_empty() => {
                return Err(invalid(format!(
                    "step {}: click needs a control",
                    step_number
                )));
            }
            Step::ExpectWindow { title, .. }
            | Step::ExpectNoWindow { title, .. }
            | Step::ExpectWindowCount { title, .. }
                if title.is_empty() =>
            {
                return Err(invalid(format!(
                    "step {}: {} needs a title",
                    step_number,
                    step.action()
                )));
            }
            _ => {}
        }
    }

    Ok(())
}
