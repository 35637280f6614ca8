//! AI Pilot Controller
//!
//! Closed-loop correction of the impeller setpoint, evaluated once per tick
//! after the physics model has produced this tick's effective dissolved
//! oxygen. Activation is a Mealy-style signal, re-evaluated every tick, not
//! a latch: the pilot disengages on the same tick DO₂ recovers, leaving the
//! setpoint at its last corrected value.

/// Pilot tuning, resolved from config at engine construction.
#[derive(Debug, Clone, Copy)]
pub struct PilotParams {
    /// Effective DO₂ below which the pilot engages (% saturation).
    pub do2_threshold_pct: f64,
    /// Fixed correction step per tick (RPM). Must be positive.
    pub step_rpm: f64,
    /// Setpoint ceiling the correction never exceeds (RPM).
    pub rpm_ceiling: f64,
}

/// Outcome of one pilot evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PilotDecision {
    /// Whether the pilot is engaged for this tick.
    pub active: bool,
    /// Corrected setpoint to apply for the next tick, when engaged.
    pub corrected_rpm: Option<f64>,
}

/// Evaluate the pilot for one tick.
///
/// While engaged the correction law is `min(ceiling, current + step)` —
/// monotonic and bounded, never overshooting the ceiling.
pub fn evaluate(effective_do2_pct: f64, current_rpm: f64, params: &PilotParams) -> PilotDecision {
    let active = effective_do2_pct < params.do2_threshold_pct;
    let corrected_rpm = if active {
        Some((current_rpm + params.step_rpm).min(params.rpm_ceiling))
    } else {
        None
    };
    PilotDecision {
        active,
        corrected_rpm,
    }
}
