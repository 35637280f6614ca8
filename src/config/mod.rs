//! Process Configuration Module
//!
//! Engine tunables loaded from TOML, replacing hardcoded constants with
//! operator-editable values.
//!
//! ## Loading Order
//!
//! 1. `BIOTWIN_CONFIG` environment variable (path to TOML file)
//! 2. `process_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(ProcessConfig::load());
//!
//! // Anywhere in the codebase:
//! let ceiling = config::get().control.rpm_ceiling;
//! ```

pub mod defaults;
mod process_config;

pub use process_config::{ConfigError, ControlConfig, ProcessConfig, ServerConfig, TwinConfig};

use std::sync::OnceLock;

/// Global process configuration, initialized once at startup.
static PROCESS_CONFIG: OnceLock<ProcessConfig> = OnceLock::new();

/// Initialize the global process configuration.
///
/// Must be called exactly once before any calls to `get()`.
pub fn init(config: ProcessConfig) {
    if PROCESS_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global process configuration.
///
/// Panics if `init()` has not been called. A missing config is a startup
/// bug, not a recoverable condition.
pub fn get() -> &'static ProcessConfig {
    PROCESS_CONFIG
        .get()
        .expect("config::get() called before config::init() — this is a startup bug")
}

/// Check whether the config has been initialized.
///
/// Useful for tests and optional config paths.
pub fn is_initialized() -> bool {
    PROCESS_CONFIG.get().is_some()
}
