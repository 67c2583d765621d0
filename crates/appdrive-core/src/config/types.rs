//! Configuration type definitions for appdrive.
//!
//! These types are deserialized from TOML config files.
//!
//! # Example Configuration
//!
//! ```toml
//! [wait]
//! timeout_ms = 60000
//! retry_interval_ms = 1000
//! settle_ms = 2000
//!
//! [process]
//! grace_period_ms = 5000
//! detach_key = "d"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::defaults;

/// Main configuration loaded from TOML config files.
///
/// Loaded from:
/// 1. User config: `~/.appdrive/config.toml`
/// 2. Project config: `./.appdrive/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DriveConfig {
    /// Window polling settings
    #[serde(default)]
    pub wait: WaitConfig,

    /// External process lifecycle settings
    #[serde(default)]
    pub process: ProcessConfig,
}

/// Window polling configuration.
///
/// All fields are optional so that project config can override
/// individual values from user config.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WaitConfig {
    /// How long to wait for a window to become ready.
    /// Default: 60000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Delay between window list queries.
    /// Default: 1000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_interval_ms: Option<u64>,

    /// Short settle time used by interaction assertions.
    /// Default: 2000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_ms: Option<u64>,

    /// Extra delay after the main window is ready, before the body runs.
    /// Default: 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_frame_delay_ms: Option<u64>,
}

impl WaitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(defaults::DEFAULT_WAIT_TIMEOUT_MS))
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(
            self.retry_interval_ms
                .unwrap_or(defaults::DEFAULT_RETRY_INTERVAL_MS),
        )
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms.unwrap_or(defaults::DEFAULT_SETTLE_MS))
    }

    pub fn first_frame_delay(&self) -> Duration {
        Duration::from_millis(self.first_frame_delay_ms.unwrap_or(0))
    }
}

/// External process configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProcessConfig {
    /// Time between the polite terminate signal and the forced kill.
    /// Default: 5000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period_ms: Option<u64>,

    /// Keystroke written to the launcher's stdin once the main window is up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detach_key: Option<String>,

    /// Forward the launched process's stdout/stderr to ours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit_output: Option<bool>,
}

impl ProcessConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(
            self.grace_period_ms
                .unwrap_or(defaults::DEFAULT_GRACE_PERIOD_MS),
        )
    }

    pub fn inherit_output(&self) -> bool {
        self.inherit_output.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accessors() {
        let config = DriveConfig::default();
        assert_eq!(config.wait.timeout(), Duration::from_secs(60));
        assert_eq!(config.wait.retry_interval(), Duration::from_secs(1));
        assert_eq!(config.wait.settle(), Duration::from_secs(2));
        assert_eq!(config.wait.first_frame_delay(), Duration::ZERO);
        assert_eq!(config.process.grace_period(), Duration::from_secs(5));
        assert!(config.process.detach_key.is_none());
        assert!(!config.process.inherit_output());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: DriveConfig = toml::from_str(
            r#"
            [wait]
            timeout_ms = 1500

            [process]
            detach_key = "d"
            "#,
        )
        .unwrap();

        assert_eq!(config.wait.timeout(), Duration::from_millis(1500));
        assert_eq!(config.wait.retry_interval(), Duration::from_secs(1));
        assert_eq!(config.process.detach_key.as_deref(), Some("d"));
    }

    #[test]
    fn test_deserialize_empty_config() {
        let config: DriveConfig = toml::from_str("").unwrap();
        assert_eq!(config, DriveConfig::default());
    }
}
