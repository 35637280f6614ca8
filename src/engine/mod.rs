//! Simulation Engine
//!
//! The single orchestration point composing all subsystems: replay cursor,
//! physics/health model, anomaly detection, digital twin, and pilot
//! controller. `tick()` executes the phases in a fixed order — reordering
//! changes observable semantics (the pilot must see this tick's DO₂, not
//! the next tick's).

mod state;

pub use state::SimulationState;

use chrono::Utc;
use tracing::{debug, info};

use crate::config::{defaults, ProcessConfig};
use crate::dataset::Dataset;
use crate::model;
use crate::pilot::{self, PilotParams};
use crate::twin::TwinProjector;
use crate::types::{AnomalyCommand, ControlCommand, TelemetrySnapshot};

// ============================================================================
// Engine Parameters
// ============================================================================

/// Engine tunables, resolved from config at construction so the core stays
/// independent of the global config (and deterministic under test).
#[derive(Debug, Clone, Copy)]
pub struct EngineParams {
    /// Minimum accepted setpoint (RPM).
    pub rpm_floor: f64,
    /// Maximum accepted setpoint and pilot ceiling (RPM).
    pub rpm_ceiling: f64,
    /// Pilot correction step per tick (RPM).
    pub pilot_step_rpm: f64,
    /// Effective DO₂ below which the pilot engages (%).
    pub pilot_do2_threshold_pct: f64,
    /// Twin sliding-window capacity (samples).
    pub twin_window: usize,
    /// Twin projection horizon (seconds).
    pub twin_horizon_secs: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            rpm_floor: defaults::RPM_FLOOR,
            rpm_ceiling: defaults::RPM_CEILING,
            pilot_step_rpm: defaults::PILOT_STEP_RPM,
            pilot_do2_threshold_pct: defaults::PILOT_DO2_THRESHOLD_PCT,
            twin_window: defaults::TWIN_WINDOW,
            twin_horizon_secs: defaults::TWIN_HORIZON_SECS,
        }
    }
}

impl EngineParams {
    /// Resolve parameters from a loaded process config.
    pub fn from_config(config: &ProcessConfig) -> Self {
        Self {
            rpm_floor: config.control.rpm_floor,
            rpm_ceiling: config.control.rpm_ceiling,
            pilot_step_rpm: config.control.pilot_step_rpm,
            pilot_do2_threshold_pct: config.control.pilot_do2_threshold_pct,
            twin_window: config.twin.window,
            twin_horizon_secs: config.twin.horizon_secs,
        }
    }

    fn pilot(&self) -> PilotParams {
        PilotParams {
            do2_threshold_pct: self.pilot_do2_threshold_pct,
            step_rpm: self.pilot_step_rpm,
            rpm_ceiling: self.rpm_ceiling,
        }
    }
}

// ============================================================================
// Simulation Engine
// ============================================================================

/// Replay engine over the historical dataset.
///
/// Owns the dataset reference and all mutable state; callers share it behind
/// a single `Mutex` so a control write is never lost to a concurrently
/// advancing tick and the cursor never advances twice per logical tick.
#[derive(Debug)]
pub struct SimulationEngine {
    dataset: Dataset,
    state: SimulationState,
    twin: TwinProjector,
    params: EngineParams,
}

impl SimulationEngine {
    /// Build an engine over a non-empty dataset.
    pub fn new(dataset: Dataset, params: EngineParams) -> Self {
        let twin = TwinProjector::new(params.twin_window, params.twin_horizon_secs);
        Self {
            dataset,
            state: SimulationState::new(),
            twin,
            params,
        }
    }

    /// Run one simulation tick and return the composed snapshot.
    ///
    /// Phase order (fixed):
    /// 1. advance the replay cursor (with batch rollover)
    /// 2. resolve the effective RPM (override else row value)
    /// 3. physics & health model
    /// 4. anomaly OR (manual | automatic)
    /// 5. twin append + projection
    /// 6. pilot evaluation, possibly writing next tick's setpoint
    /// 7. snapshot assembly
    pub fn tick(&mut self) -> TelemetrySnapshot {
        // Phase 1: advance cursor, detect wraparound.
        self.state.tick_count += 1;
        self.state.cursor = (self.state.cursor + 1) % self.dataset.len();
        if self.state.cursor == 0 {
            self.state.reset_for_new_batch();
            self.twin.clear();
            info!(batch = %self.state.batch_id, "Batch rollover: twin and per-batch flags reset");
        }
        // Cursor always indexes a valid row; the dataset is non-empty by
        // construction. Fall back to the first row rather than panic.
        let row = *self
            .dataset
            .get(self.state.cursor)
            .unwrap_or_else(|| &self.dataset.rows()[0]);

        // Phase 2: effective RPM = manual/pilot override, else the row value.
        let effective_rpm = self.state.manual_rpm_override.unwrap_or(row.impeller_rpm);

        // Phase 3: physics & health.
        let effective_do2 = model::effective_dissolved_oxygen(row.dissolved_oxygen, effective_rpm);
        let health = model::health_score(row.temperature, row.ph);

        // Phase 4: anomaly OR. Reset never suppresses the automatic predicate.
        let auto_anomaly = model::is_auto_anomaly(row.temperature, effective_rpm);
        let is_anomaly = auto_anomaly || self.state.manual_anomaly_active;

        // Phase 5: twin append + projection.
        self.twin.push(self.state.tick_count, row.temperature);
        let projection = self.twin.project();

        // Phase 6: pilot. Engages on this tick's DO₂ and writes the corrected
        // setpoint for the next tick. Arbitration with the operator is
        // last-writer-wins: a manual command that arrived since the previous
        // tick wins, and the pilot skips its write for this tick.
        let decision = pilot::evaluate(effective_do2, effective_rpm, &self.params.pilot());
        self.state.ai_pilot_active = decision.active;
        if let Some(corrected) = decision.corrected_rpm {
            if self.state.manual_command_this_tick {
                debug!(
                    corrected_rpm = corrected,
                    "Pilot correction skipped — fresher manual command wins this tick"
                );
            } else {
                debug!(
                    from = effective_rpm,
                    to = corrected,
                    do2 = effective_do2,
                    "Pilot correcting impeller setpoint"
                );
                self.state.manual_rpm_override = Some(corrected);
            }
        }
        self.state.manual_command_this_tick = false;

        // Phase 7: snapshot assembly.
        TelemetrySnapshot {
            temperature: row.temperature,
            ph: row.ph,
            impeller_rpm: effective_rpm,
            dissolved_oxygen: effective_do2,
            yield_percent: row.yield_percent,
            health_score: round_to(health, 10.0),
            is_anomaly,
            ai_pilot_active: decision.active,
            digital_twin_temp: projection.map(|t| round_to(t, 100.0)),
            batch_id: self.state.batch_id.to_string(),
            timestamp: Utc::now().format("%H:%M:%S").to_string(),
        }
    }

    /// Apply an operator setpoint command.
    ///
    /// Out-of-range values are clamped to the configured bounds rather than
    /// rejected — a leniency policy that keeps the control loop well-defined
    /// for any input. Returns the effective (clamped) RPM.
    pub fn apply_control(&mut self, command: ControlCommand) -> f64 {
        // Non-finite requests fall to the floor; clamp would propagate NaN.
        let requested = if command.rpm.is_finite() {
            command.rpm
        } else {
            self.params.rpm_floor
        };
        let effective = requested.clamp(self.params.rpm_floor, self.params.rpm_ceiling);
        if (effective - requested).abs() > f64::EPSILON || !command.rpm.is_finite() {
            info!(
                requested = command.rpm,
                effective, "Control command clamped to RPM bounds"
            );
        } else {
            info!(rpm = effective, "Control command applied");
        }
        self.state.manual_rpm_override = Some(effective);
        self.state.manual_command_this_tick = true;
        effective
    }

    /// Apply a manual anomaly command. Idempotent in both directions; a
    /// reset does not mask automatic detection.
    pub fn apply_anomaly(&mut self, command: AnomalyCommand) {
        let active = matches!(command, AnomalyCommand::Trigger);
        if self.state.manual_anomaly_active != active {
            info!(active, "Manual anomaly flag changed");
        }
        self.state.manual_anomaly_active = active;
    }

    /// Read-only view of the replay state (for the status endpoint).
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// The dataset this engine replays.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

/// Round to a decimal scale (10 → one decimal, 100 → two decimals).
fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}
