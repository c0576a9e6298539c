//! Window planning
//!
//! Derives from a feature spec how much trailing history every kept row
//! needs, which lag depths and time-gap channels are produced, and how many
//! work units a run will report.

use panelscore_core::{FeatureSpec, WindowingLag};
use serde::Serialize;
use std::ops::RangeInclusive;

/// Resolved windowing parameters of one feature spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowPlan {
    /// Trailing rows needed by the deepest lag or widest rolling window
    pub max_cols: usize,

    /// Trailing rows the partitioner selects behind each kept row
    pub history_depth: usize,

    /// Lag depths computed and retained, ascending
    pub effective_lags: Vec<usize>,

    /// Rolling window widths, ascending
    pub periods: Vec<usize>,

    /// Retained time-gap channels; 0 when time gaps are disabled
    pub gap_channels: usize,

    pub windowing_lag: WindowingLag,
}

impl WindowPlan {
    /// Positional offsets (rows back from the kept row) covered by a rolling
    /// window of the given width: lag columns 1..=period
    pub fn window_slots(&self, period: usize) -> RangeInclusive<usize> {
        1..=period
    }

    /// Offsets into the time-gap channel 1 series covered by a rolling window
    /// of the given width. Offset k holds channel k + 1, so the window spans
    /// channels 1..=period.
    pub fn gap_window_slots(&self, period: usize) -> RangeInclusive<usize> {
        0..=period - 1
    }

    /// Total work units for progress reporting:
    /// entities x rolling targets x (|periods| + MaxCols)
    pub fn work_units(&self, entities: usize, rolling_targets: usize) -> u64 {
        (entities as u64) * (rolling_targets as u64) * ((self.periods.len() + self.max_cols) as u64)
    }
}

/// Computes [`WindowPlan`]s
pub struct WindowPlanner;

impl WindowPlanner {
    pub fn plan(spec: &FeatureSpec) -> WindowPlan {
        let effective_lags = spec.effective_lags();
        let periods = spec.sorted_periods();

        let max_lag = effective_lags.last().copied().unwrap_or(0);
        let max_period = periods.last().copied().unwrap_or(0);
        let period_depth = match spec.windowing_lag {
            WindowingLag::Baseline => max_period,
            WindowingLag::Current => max_period.saturating_sub(1),
        };
        let max_cols = max_lag.max(period_depth);

        let gap_channels = if spec.time_gaps_enabled() {
            match spec.windowing_lag {
                WindowingLag::Baseline => max_cols,
                WindowingLag::Current => effective_lags.len(),
            }
        } else {
            0
        };
        // Rolling windows reach `period` rows back in both windowing modes
        let history_depth = max_cols.max(max_period);

        WindowPlan {
            max_cols,
            history_depth,
            effective_lags,
            periods,
            gap_channels,
            windowing_lag: spec.windowing_lag,
        }
    }
}
