//! System-wide default constants.
//!
//! Centralises the process magic numbers. Grouped by subsystem for easy
//! discovery; runtime-tunable values have matching TOML fields in
//! [`ProcessConfig`](super::ProcessConfig).

// ============================================================================
// Impeller Control
// ============================================================================

/// Minimum accepted impeller setpoint (RPM). Lower requests are clamped.
pub const RPM_FLOOR: f64 = 50.0;

/// Maximum accepted impeller setpoint (RPM). Higher requests are clamped;
/// the pilot correction never exceeds this ceiling.
pub const RPM_CEILING: f64 = 600.0;

/// Reference RPM for the oxygen-transfer adjustment.
///
/// `effective_do2 = row_do2 * rpm / RPM_DO2_REFERENCE`
pub const RPM_DO2_REFERENCE: f64 = 300.0;

// ============================================================================
// Health Scoring
// ============================================================================

/// Ideal broth temperature (°C).
pub const IDEAL_TEMPERATURE_C: f64 = 37.0;

/// Ideal broth pH.
pub const IDEAL_PH: f64 = 7.0;

/// Health penalty per °C of temperature deviation.
pub const TEMP_DEVIATION_WEIGHT: f64 = 15.0;

/// Health penalty per pH unit of deviation.
pub const PH_DEVIATION_WEIGHT: f64 = 40.0;

// ============================================================================
// Automatic Anomaly Detection
// ============================================================================

/// Temperature above which a row is out of spec (°C).
pub const TEMP_ANOMALY_LIMIT_C: f64 = 40.0;

/// Effective RPM below which the stirrer is considered stalled.
pub const RPM_ANOMALY_FLOOR: f64 = 100.0;

// ============================================================================
// Digital Twin
// ============================================================================

/// Sliding-window capacity (samples). The projector stays in warm-up until
/// the window is full.
pub const TWIN_WINDOW: usize = 5;

/// Forward projection horizon (seconds).
pub const TWIN_HORIZON_SECS: f64 = 60.0;

// ============================================================================
// AI Pilot
// ============================================================================

/// Effective DO₂ below which the pilot engages (% saturation).
pub const PILOT_DO2_THRESHOLD_PCT: f64 = 20.0;

/// Fixed correction step per tick while the pilot is active (RPM).
pub const PILOT_STEP_RPM: f64 = 25.0;

// ============================================================================
// Synthetic Dataset
// ============================================================================

/// Default synthetic dataset size (rows).
pub const SYNTHETIC_ROWS: usize = 350;

/// RNG seed for reproducible synthetic datasets.
pub const SYNTHETIC_SEED: u64 = 42;

/// Row index given an over-temperature fault in synthetic data.
pub const SYNTHETIC_HOT_ROW: usize = 50;

/// Row index given a stirrer-failure fault in synthetic data.
pub const SYNTHETIC_STALL_ROW: usize = 100;
