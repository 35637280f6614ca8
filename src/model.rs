//! Physics & Health Model
//!
//! Deterministic calculations over a process row and the current effective
//! impeller speed. Everything here is a pure function of its arguments —
//! no hidden state — so each formula can be property-tested in isolation.

use crate::config::defaults;

/// Oxygen-transfer adjustment: dissolved oxygen scales linearly with the
/// impeller speed relative to the 300 RPM reference, clamped to a physical
/// 0-100 % saturation range.
pub fn effective_dissolved_oxygen(row_do2_pct: f64, effective_rpm: f64) -> f64 {
    (row_do2_pct * (effective_rpm / defaults::RPM_DO2_REFERENCE)).clamp(0.0, 100.0)
}

/// Batch quality index on a 0-100 scale.
///
/// Starts at 100 and drops with weighted deviation from the ideal 37 °C /
/// pH 7.0 setpoints. Inputs are assumed to already be in °C and pH units.
pub fn health_score(temperature_c: f64, ph: f64) -> f64 {
    let temp_penalty = (temperature_c - defaults::IDEAL_TEMPERATURE_C).abs()
        * defaults::TEMP_DEVIATION_WEIGHT;
    let ph_penalty = (ph - defaults::IDEAL_PH).abs() * defaults::PH_DEVIATION_WEIGHT;
    (100.0 - temp_penalty - ph_penalty).clamp(0.0, 100.0)
}

/// Automatic out-of-spec predicate: over-temperature or a stalled stirrer.
///
/// Independent of the manual anomaly flag; the engine ORs the two before
/// reporting.
pub fn is_auto_anomaly(temperature_c: f64, effective_rpm: f64) -> bool {
    temperature_c > defaults::TEMP_ANOMALY_LIMIT_C || effective_rpm < defaults::RPM_ANOMALY_FLOOR
}
