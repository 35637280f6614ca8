//! Process configuration — engine tunables as operator-editable TOML values.
//!
//! Every tunable has a `Default` matching the constants in
//! [`defaults`](super::defaults), so behaviour is unchanged when no config
//! file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a deployment.
///
/// Load with `ProcessConfig::load()` which searches:
/// 1. `$BIOTWIN_CONFIG` env var
/// 2. `./process_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Impeller control and pilot tuning
    #[serde(default)]
    pub control: ControlConfig,

    /// Digital twin projection tuning
    #[serde(default)]
    pub twin: TwinConfig,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            control: ControlConfig::default(),
            twin: TwinConfig::default(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address for the dashboard API
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Impeller control bounds and pilot correction tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Minimum accepted setpoint (RPM)
    pub rpm_floor: f64,
    /// Maximum accepted setpoint and pilot ceiling (RPM)
    pub rpm_ceiling: f64,
    /// Pilot correction step per tick (RPM)
    pub pilot_step_rpm: f64,
    /// Effective DO₂ below which the pilot engages (%)
    pub pilot_do2_threshold_pct: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            rpm_floor: defaults::RPM_FLOOR,
            rpm_ceiling: defaults::RPM_CEILING,
            pilot_step_rpm: defaults::PILOT_STEP_RPM,
            pilot_do2_threshold_pct: defaults::PILOT_DO2_THRESHOLD_PCT,
        }
    }
}

/// Digital twin projection tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwinConfig {
    /// Sliding-window capacity (samples); also the warm-up threshold
    pub window: usize,
    /// Forward projection horizon (seconds)
    pub horizon_secs: f64,
}

impl Default for TwinConfig {
    fn default() -> Self {
        Self {
            window: defaults::TWIN_WINDOW,
            horizon_secs: defaults::TWIN_HORIZON_SECS,
        }
    }
}

// ============================================================================
// Loading & Validation
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error ({0}): {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("config parse error ({0}): {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
}

impl ProcessConfig {
    /// Load configuration using the standard search order:
    /// 1. `$BIOTWIN_CONFIG` environment variable
    /// 2. `./process_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var("BIOTWIN_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded process config from BIOTWIN_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from BIOTWIN_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "BIOTWIN_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./process_config.toml
        let local = PathBuf::from("process_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded process config from ./process_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./process_config.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No process_config.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let mut config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.sanitize();
        Ok(config)
    }

    /// Correct out-of-range tunables in place, warning on each correction.
    ///
    /// Misconfiguration is recoverable here — a fatal startup error is
    /// reserved for the dataset, not for tunables.
    pub fn sanitize(&mut self) {
        if self.control.rpm_floor >= self.control.rpm_ceiling {
            warn!(
                floor = self.control.rpm_floor,
                ceiling = self.control.rpm_ceiling,
                "control.rpm_floor must be below rpm_ceiling — restoring defaults"
            );
            self.control.rpm_floor = defaults::RPM_FLOOR;
            self.control.rpm_ceiling = defaults::RPM_CEILING;
        }
        if self.control.pilot_step_rpm <= 0.0 {
            warn!(
                step = self.control.pilot_step_rpm,
                "control.pilot_step_rpm must be positive — restoring default"
            );
            self.control.pilot_step_rpm = defaults::PILOT_STEP_RPM;
        }
        if self.twin.window < 2 {
            warn!(
                window = self.twin.window,
                "twin.window must be at least 2 — restoring default"
            );
            self.twin.window = defaults::TWIN_WINDOW;
        }
        if self.twin.horizon_secs <= 0.0 {
            warn!(
                horizon = self.twin.horizon_secs,
                "twin.horizon_secs must be positive — restoring default"
            );
            self.twin.horizon_secs = defaults::TWIN_HORIZON_SECS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let cfg = ProcessConfig::default();
        assert_eq!(cfg.control.rpm_floor, defaults::RPM_FLOOR);
        assert_eq!(cfg.control.rpm_ceiling, defaults::RPM_CEILING);
        assert_eq!(cfg.twin.window, defaults::TWIN_WINDOW);
    }

    #[test]
    fn test_sanitize_restores_inverted_bounds() {
        let mut cfg = ProcessConfig::default();
        cfg.control.rpm_floor = 700.0;
        cfg.sanitize();
        assert!(cfg.control.rpm_floor < cfg.control.rpm_ceiling);
    }

    #[test]
    fn test_sanitize_rejects_tiny_window() {
        let mut cfg = ProcessConfig::default();
        cfg.twin.window = 1;
        cfg.sanitize();
        assert_eq!(cfg.twin.window, defaults::TWIN_WINDOW);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: ProcessConfig = toml::from_str("[control]\npilot_step_rpm = 10.0\n").unwrap();
        assert_eq!(cfg.control.pilot_step_rpm, 10.0);
        assert_eq!(cfg.control.rpm_ceiling, defaults::RPM_CEILING);
        assert_eq!(cfg.twin.window, defaults::TWIN_WINDOW);
    }
}
