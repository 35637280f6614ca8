//! Digital Twin Projector
//!
//! Maintains a fixed-capacity sliding window of recent temperature samples
//! and projects the value 60 seconds ahead from the window's slope.
//!
//! The slope is a two-point estimate over the oldest and newest buffered
//! samples, a deliberate simplification of a least-squares fit. It is an
//! early-warning signal, not a corrected estimate: the projected value is
//! intentionally unclamped and may exceed physically sane bounds.

use std::collections::VecDeque;

/// Sliding-window temperature projector.
///
/// The time axis is the engine tick counter (1 tick ≡ 1 s nominal), which
/// keeps projections deterministic regardless of poll jitter.
#[derive(Debug, Clone)]
pub struct TwinProjector {
    /// Window capacity; also the warm-up threshold.
    window: usize,
    /// Forward projection horizon in seconds.
    horizon_secs: f64,
    /// (tick, temperature °C), oldest first.
    buffer: VecDeque<(u64, f64)>,
}

impl TwinProjector {
    /// Create a projector with the given window capacity and horizon.
    ///
    /// A window below 2 cannot define a slope and is raised to 2.
    pub fn new(window: usize, horizon_secs: f64) -> Self {
        let window = window.max(2);
        Self {
            window,
            horizon_secs,
            buffer: VecDeque::with_capacity(window),
        }
    }

    /// Append one sample, evicting the oldest when the window overflows.
    pub fn push(&mut self, tick: u64, temperature_c: f64) {
        if self.buffer.len() == self.window {
            self.buffer.pop_front();
        }
        self.buffer.push_back((tick, temperature_c));
    }

    /// Drop all buffered samples (batch rollover restarts warm-up).
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when no samples are buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Project the temperature `horizon_secs` ahead of the newest sample.
    ///
    /// Returns `None` while the window is still warming up — callers must
    /// not average an undefined slope. A degenerate time span (both
    /// endpoints on the same tick) yields a zero slope.
    pub fn project(&self) -> Option<f64> {
        if self.buffer.len() < self.window {
            return None;
        }
        let (t_first, temp_first) = *self.buffer.front()?;
        let (t_last, temp_last) = *self.buffer.back()?;

        let dt = t_last.saturating_sub(t_first) as f64;
        let slope = if dt > 0.0 {
            (temp_last - temp_first) / dt
        } else {
            0.0
        };

        Some(temp_last + slope * self.horizon_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> TwinProjector {
        TwinProjector::new(5, 60.0)
    }

    #[test]
    fn test_warm_up_reports_no_projection() {
        let mut twin = projector();
        for tick in 0..4 {
            twin.push(tick, 37.0);
            assert!(
                twin.project().is_none(),
                "tick {tick}: projection must be unavailable during warm-up"
            );
        }
        twin.push(4, 37.0);
        assert!(twin.project().is_some(), "window full — projection expected");
    }

    #[test]
    fn test_constant_temperature_projects_current_value() {
        let mut twin = projector();
        for tick in 0..5 {
            twin.push(tick, 36.8);
        }
        assert_eq!(twin.project(), Some(36.8));
    }

    #[test]
    fn test_rising_trend_extrapolates_forward() {
        let mut twin = projector();
        // +1 °C per tick over ticks 0..4 → slope 1.0, horizon 60 s
        for tick in 0..5u64 {
            twin.push(tick, 30.0 + tick as f64);
        }
        assert_eq!(twin.project(), Some(34.0 + 60.0));
    }

    #[test]
    fn test_projection_is_unclamped() {
        let mut twin = projector();
        for tick in 0..5u64 {
            twin.push(tick, 37.0 + 2.0 * tick as f64);
        }
        // slope 2 °C/s over a 60 s horizon — far beyond sane broth temps
        let projected = twin.project().unwrap();
        assert!(projected > 150.0);
    }

    #[test]
    fn test_eviction_keeps_window_bounded() {
        let mut twin = projector();
        for tick in 0..20 {
            twin.push(tick, 37.0);
        }
        assert_eq!(twin.len(), 5);
    }

    #[test]
    fn test_clear_restarts_warm_up() {
        let mut twin = projector();
        for tick in 0..5 {
            twin.push(tick, 37.0);
        }
        assert!(twin.project().is_some());
        twin.clear();
        assert!(twin.is_empty());
        assert!(twin.project().is_none());
    }

    #[test]
    fn test_degenerate_time_span_yields_zero_slope() {
        let mut twin = projector();
        for _ in 0..5 {
            twin.push(10, 39.0);
        }
        assert_eq!(twin.project(), Some(39.0));
    }

    #[test]
    fn test_window_floor_of_two() {
        let mut twin = TwinProjector::new(0, 60.0);
        twin.push(0, 37.0);
        assert!(twin.project().is_none());
        twin.push(1, 38.0);
        assert_eq!(twin.project(), Some(38.0 + 60.0));
    }
}
