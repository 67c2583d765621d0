//! Default values for configuration fields.
//!
//! Optional fields in [`super::types`] fall back to these when no config
//! file sets them.

/// Main windows of debug builds can take a long time to show up.
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 60_000;

pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 1_000;

/// Settle time for "click, then expect a window or value" checks.
pub const DEFAULT_SETTLE_MS: u64 = 2_000;

/// Time between the terminate signal and the forced kill.
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 5_000;

/// Directory name used for both user (`~/.appdrive`) and project config.
pub const CONFIG_DIR_NAME: &str = ".appdrive";

pub const CONFIG_FILE_NAME: &str = "config.toml";
