//! Configuration loading and merging logic.
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.appdrive/config.toml`
//! 3. **Project config** - `./.appdrive/config.toml`
//! 4. **CLI arguments** - Command-line flags (highest priority)

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use super::types::{DriveConfig, ProcessConfig, WaitConfig};
use super::validation::validate_config;
use crate::errors::ConfigError;

/// Load configuration from the user and project config files.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be parsed, or if the
/// merged configuration fails validation. Missing files are not errors.
pub fn load_hierarchy() -> Result<DriveConfig, ConfigError> {
    let project_dir = std::env::current_dir()?;
    load_from_dirs(dirs::home_dir().as_deref(), &project_dir)
}

/// Load configuration with explicit user and project base directories.
///
/// `<dir>/.appdrive/config.toml` is read from each directory that is given.
pub fn load_from_dirs(
    user_dir: Option<&Path>,
    project_dir: &Path,
) -> Result<DriveConfig, ConfigError> {
    let mut config = DriveConfig::default();

    if let Some(home) = user_dir
        && let Some(user_config) = load_optional(&home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))?
    {
        config = merge_configs(config, user_config);
    }

    if let Some(project_config) =
        load_optional(&project_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))?
    {
        config = merge_configs(config, project_config);
    }

    validate_config(&config)?;

    info!(
        event = "core.config.load_completed",
        timeout_ms = config.wait.timeout().as_millis() as u64,
        retry_interval_ms = config.wait.retry_interval().as_millis() as u64
    );
    Ok(config)
}

/// Load a config file, treating a missing file as `None`.
fn load_optional(path: &Path) -> Result<Option<DriveConfig>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => parse_config(path, &content).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(
                event = "core.config.file_missing",
                path = %path.display()
            );
            Ok(None)
        }
        Err(e) => Err(ConfigError::IoError { source: e }),
    }
}

fn parse_config(path: &Path, content: &str) -> Result<DriveConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Merge two configurations, with `override_config` taking precedence.
///
/// Override values replace base values only if present.
pub fn merge_configs(base: DriveConfig, override_config: DriveConfig) -> DriveConfig {
    DriveConfig {
        wait: WaitConfig {
            timeout_ms: override_config.wait.timeout_ms.or(base.wait.timeout_ms),
            retry_interval_ms: override_config
                .wait
                .retry_interval_ms
                .or(base.wait.retry_interval_ms),
            settle_ms: override_config.wait.settle_ms.or(base.wait.settle_ms),
            first_frame_delay_ms: override_config
                .wait
                .first_frame_delay_ms
                .or(base.wait.first_frame_delay_ms),
        },
        process: ProcessConfig {
            grace_period_ms: override_config
                .process
                .grace_period_ms
                .or(base.process.grace_period_ms),
            detach_key: override_config.process.detach_key.or(base.process.detach_key),
            inherit_output: override_config
                .process
                .inherit_output
                .or(base.process.inherit_output),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn write_config(dir: &Path, content: &str) {
        let config_dir = dir.join(CONFIG_DIR_NAME);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let user = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();

        let config = load_from_dirs(Some(user.path()), project.path()).unwrap();
        assert_eq!(config, DriveConfig::default());
    }

    #[test]
    fn test_project_overrides_user() {
        let user = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        write_config(
            user.path(),
            "[wait]\ntimeout_ms = 30000\nretry_interval_ms = 250\n[process]\ndetach_key = \"d\"\n",
        );
        write_config(project.path(), "[wait]\ntimeout_ms = 5000\n");

        let config = load_from_dirs(Some(user.path()), project.path()).unwrap();
        assert_eq!(config.wait.timeout(), Duration::from_millis(5000));
        assert_eq!(config.wait.retry_interval(), Duration::from_millis(250));
        assert_eq!(config.process.detach_key.as_deref(), Some("d"));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let project = tempfile::tempdir().unwrap();
        write_config(project.path(), "[wait\ntimeout_ms = ");

        let result = load_from_dirs(None, project.path());
        assert!(matches!(
            result,
            Err(ConfigError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_invalid_merged_config_is_rejected() {
        let project = tempfile::tempdir().unwrap();
        write_config(project.path(), "[wait]\nretry_interval_ms = 0\n");

        let result = load_from_dirs(None, project.path());
        assert!(matches!(
            result,
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_merge_keeps_base_when_override_empty() {
        let base = DriveConfig {
            wait: WaitConfig {
                settle_ms: Some(750),
                ..Default::default()
            },
            process: ProcessConfig {
                inherit_output: Some(true),
                ..Default::default()
            },
        };

        let merged = merge_configs(base, DriveConfig::default());
        assert_eq!(merged.wait.settle_ms, Some(750));
        assert_eq!(merged.process.inherit_output, Some(true));
    }
}
