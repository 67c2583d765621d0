//! Configuration validation logic.

use crate::config::types::DriveConfig;
use crate::errors::ConfigError;

/// Validate a DriveConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - `wait.retry_interval_ms` must be greater than 0 (a zero interval spins)
/// - `wait.timeout_ms` must not be smaller than `wait.retry_interval_ms` when both are set
/// - `process.detach_key`, if set, must be exactly one character
pub fn validate_config(config: &DriveConfig) -> Result<(), ConfigError> {
    if config.wait.retry_interval_ms == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "wait.retry_interval_ms must be greater than 0".to_string(),
        });
    }

    if let (Some(timeout_ms), Some(interval_ms)) =
        (config.wait.timeout_ms, config.wait.retry_interval_ms)
        && timeout_ms < interval_ms
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "wait.timeout_ms ({}) must not be smaller than wait.retry_interval_ms ({})",
                timeout_ms, interval_ms
            ),
        });
    }

    if let Some(ref key) = config.process.detach_key
        && key.chars().count() != 1
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "process.detach_key must be a single character, got '{}'",
                key
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{ProcessConfig, WaitConfig};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&DriveConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_retry_interval_rejected() {
        let config = DriveConfig {
            wait: WaitConfig {
                retry_interval_ms: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_timeout_shorter_than_interval_rejected() {
        let config = DriveConfig {
            wait: WaitConfig {
                timeout_ms: Some(100),
                retry_interval_ms: Some(500),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("wait.timeout_ms (100)"));
    }

    #[test]
    fn test_multi_char_detach_key_rejected() {
        let config = DriveConfig {
            process: ProcessConfig {
                detach_key: Some("dd".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
