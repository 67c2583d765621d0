//! # Configuration System
//!
//! Hierarchical TOML configuration for appdrive.
//!
//! ## Configuration Hierarchy
//!
//! 1. **Hardcoded defaults** - see [`defaults`]
//! 2. **User config** - `~/.appdrive/config.toml`
//! 3. **Project config** - `./.appdrive/config.toml`
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use appdrive_core::config::DriveConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DriveConfig::load_hierarchy()?;
//!     let timeout = config.wait.timeout();
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{DriveConfig, ProcessConfig, WaitConfig};
pub use validation::validate_config;

impl DriveConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// See [`validation::validate_config`].
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
