//! Core domain types shared across the engine and API layer.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

// ============================================================================
// Historical Rows
// ============================================================================

/// One recorded process sample from the historical dataset.
///
/// Rows are created once at load time and never mutated; the engine indexes
/// into the shared row sequence by cursor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessRow {
    /// Broth temperature in °C
    pub temperature: f64,
    /// Impeller speed in RPM
    pub impeller_rpm: f64,
    /// Broth pH
    pub ph: f64,
    /// Dissolved oxygen in % saturation
    pub dissolved_oxygen: f64,
    /// Batch yield in %
    pub yield_percent: f64,
    /// Ordinal position in the dataset
    pub index: usize,
}

// ============================================================================
// Batch Identity
// ============================================================================

/// Batch identifier, rendered as `B<year>-<seq>` (e.g. `B2026-003`).
///
/// The sequence number is monotonic for the process lifetime; the year prefix
/// tracks the calendar year observed at rollover time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchId {
    pub year: i32,
    pub sequence: u32,
}

impl BatchId {
    /// First batch of a fresh engine, stamped with the current year.
    pub fn first() -> Self {
        Self {
            year: chrono::Utc::now().year(),
            sequence: 1,
        }
    }

    /// Successor batch. The sequence never resets; the year prefix is
    /// re-read from the wall clock so a batch spanning New Year rolls over
    /// into the new year's prefix.
    #[must_use]
    pub fn next(self) -> Self {
        Self {
            year: chrono::Utc::now().year(),
            sequence: self.sequence + 1,
        }
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "B{}-{:03}", self.year, self.sequence)
    }
}

// ============================================================================
// Telemetry Snapshot
// ============================================================================

/// Composed result of one telemetry tick.
///
/// Derived fresh per poll and never persisted; the dashboard consumes it and
/// discards it.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySnapshot {
    /// Broth temperature in °C (raw row value)
    pub temperature: f64,
    /// Broth pH (raw row value)
    pub ph: f64,
    /// Effective impeller speed in RPM (manual/pilot override applied)
    pub impeller_rpm: f64,
    /// Dissolved oxygen in % after the oxygen-transfer adjustment
    pub dissolved_oxygen: f64,
    /// Batch yield in %
    pub yield_percent: f64,
    /// Batch quality index, 0-100
    pub health_score: f64,
    /// Manual OR automatic anomaly flag
    pub is_anomaly: bool,
    /// Whether the pilot corrected the setpoint this tick
    pub ai_pilot_active: bool,
    /// 60-second-ahead temperature projection; `None` during twin warm-up
    pub digital_twin_temp: Option<f64>,
    /// Current batch, e.g. `B2026-001`
    pub batch_id: String,
    /// Wall-clock stamp of this tick (`HH:MM:SS`)
    pub timestamp: String,
}

// ============================================================================
// Operator Commands
// ============================================================================

/// Operator setpoint request for the impeller.
///
/// Out-of-range values are clamped to the configured RPM bounds rather than
/// rejected, so the control loop stays well-defined for any input.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ControlCommand {
    /// Requested impeller speed in RPM
    pub rpm: f64,
}

/// Manual anomaly toggle. Both transitions are unconditional and idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyCommand {
    /// Latch the manual anomaly flag on
    Trigger,
    /// Clear the manual flag (automatic detection is unaffected)
    Reset,
}
