//! Simulation State
//!
//! Process-wide mutable state for the replay engine. A single instance
//! lives for the process lifetime, mutated only by the telemetry tick and
//! the control/anomaly command handlers — the engine wraps it behind one
//! critical section, never exposing raw concurrent-write access.

use serde::Serialize;

use crate::types::BatchId;

/// Mutable replay and control state.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationState {
    /// Replay cursor; always indexes a valid dataset row.
    pub cursor: usize,
    /// Current batch, advanced on cursor wraparound.
    pub batch_id: BatchId,
    /// Operator or pilot setpoint override; `None` replays the row value.
    pub manual_rpm_override: Option<f64>,
    /// Manually injected anomaly flag.
    pub manual_anomaly_active: bool,
    /// Whether the pilot corrected the setpoint on the latest tick.
    pub ai_pilot_active: bool,
    /// Set by a control command, consumed by the next tick. While set, the
    /// pilot skips its write for that tick (last-writer-wins arbitration).
    pub manual_command_this_tick: bool,
    /// Ticks since startup; also the twin's time axis (1 tick ≡ 1 s).
    pub tick_count: u64,
}

impl SimulationState {
    /// Fresh state at cursor 0 with the first batch of the current year.
    pub fn new() -> Self {
        Self {
            cursor: 0,
            batch_id: BatchId::first(),
            manual_rpm_override: None,
            manual_anomaly_active: false,
            ai_pilot_active: false,
            manual_command_this_tick: false,
            tick_count: 0,
        }
    }

    /// Reset the per-batch flags at rollover.
    ///
    /// A new batch starts un-piloted and uncorrected, and cannot inherit a
    /// stale manual fault — preserved for audit fidelity.
    pub fn reset_for_new_batch(&mut self) {
        self.batch_id = self.batch_id.next();
        self.ai_pilot_active = false;
        self.manual_anomaly_active = false;
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = SimulationState::new();
        assert_eq!(state.cursor, 0);
        assert_eq!(state.batch_id.sequence, 1);
        assert!(state.manual_rpm_override.is_none());
        assert!(!state.manual_anomaly_active);
        assert!(!state.ai_pilot_active);
    }

    #[test]
    fn test_batch_rollover_clears_flags() {
        let mut state = SimulationState::new();
        state.manual_anomaly_active = true;
        state.ai_pilot_active = true;

        state.reset_for_new_batch();

        assert_eq!(state.batch_id.sequence, 2);
        assert!(!state.manual_anomaly_active);
        assert!(!state.ai_pilot_active);
    }
}
