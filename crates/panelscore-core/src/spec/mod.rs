//! Feature spec definitions
//!
//! A `FeatureSpec` describes which lag, time-gap and rolling-statistic
//! columns to derive from a panel table, and how the panel is keyed and
//! ordered. It is immutable for the duration of one engine run.

pub mod stat;

pub use stat::{StatFunction, StatSpec, REGISTERED_STATS};

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

/// Sort direction applied before shifting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending sort order: shifted values come from earlier records
    #[default]
    Lag,
    /// Descending sort order: shifted values come from later records
    Lead,
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lag" => Ok(Direction::Lag),
            "lead" => Ok(Direction::Lead),
            _ => Err(CoreError::ConfigError(format!(
                "direction must be 'lag' or 'lead', got '{}'",
                s
            ))),
        }
    }
}

/// Unit in which time gaps are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeUnit {
    /// Length of one unit in seconds. Calendar units use the mean
    /// Gregorian year of 365.25 days.
    pub fn seconds(&self) -> f64 {
        const DAY: f64 = 86_400.0;
        const YEAR: f64 = 365.25 * DAY;
        match self {
            TimeUnit::Hour => 3_600.0,
            TimeUnit::Day => DAY,
            TimeUnit::Week => 7.0 * DAY,
            TimeUnit::Month => YEAR / 12.0,
            TimeUnit::Quarter => YEAR / 4.0,
            TimeUnit::Year => YEAR,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "hour" | "hours" => TimeUnit::Hour,
            "day" | "days" => TimeUnit::Day,
            "week" | "weeks" => TimeUnit::Week,
            "month" | "months" => TimeUnit::Month,
            "quarter" | "quarters" => TimeUnit::Quarter,
            "year" | "years" => TimeUnit::Year,
            _ => {
                return Err(CoreError::ConfigError(format!(
                    "unknown time unit '{}', expected hour|day|week|month|quarter|year",
                    s
                )))
            }
        };
        Ok(unit)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Quarter => "quarter",
            TimeUnit::Year => "year",
        };
        write!(f, "{}", name)
    }
}

/// Whether the lag-1 baseline is always produced (`1`) or only when
/// requested (`0`). Rolling windows read lag slots `1..=p` either way; the
/// setting also selects how deep `MaxCols` and the time-gap channels reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WindowingLag {
    /// Lags as requested; MaxCols counts the current row toward a period
    Current,
    /// Lag 1 forced into the lag set
    #[default]
    Baseline,
}

impl WindowingLag {
    /// Numeric setting: 0 for `Current`, 1 for `Baseline`
    pub fn offset(&self) -> usize {
        match self {
            WindowingLag::Current => 0,
            WindowingLag::Baseline => 1,
        }
    }
}

impl TryFrom<u8> for WindowingLag {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(WindowingLag::Current),
            1 => Ok(WindowingLag::Baseline),
            other => Err(CoreError::ConfigError(format!(
                "windowing_lag must be 0 or 1, got {}",
                other
            ))),
        }
    }
}

impl From<WindowingLag> for u8 {
    fn from(lag: WindowingLag) -> Self {
        lag.offset() as u8
    }
}

/// Complete description of the features to derive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Numeric source columns
    pub targets: Vec<String>,

    /// Time-ordering column
    pub sort_column: String,

    /// Entity key columns; empty means the table is one entity
    #[serde(default)]
    pub grouping_vars: Vec<String>,

    /// Caller-supplied per-entity rank, 1 = most recent record to score
    #[serde(default = "default_rank_column")]
    pub rank_column: String,

    /// Requested lag depths; 0 is accepted and ignored
    #[serde(default)]
    pub lags: Vec<usize>,

    /// Rolling window widths
    #[serde(default)]
    pub periods: Vec<usize>,

    /// Rolling statistics, in output order
    #[serde(default)]
    pub stats: Vec<StatSpec>,

    /// Name of the time-gap feature family; `None` disables time gaps
    #[serde(default)]
    pub time_gap_name: Option<String>,

    #[serde(default)]
    pub time_unit: TimeUnit,

    #[serde(default)]
    pub windowing_lag: WindowingLag,

    #[serde(default)]
    pub direction: Direction,

    /// Number of most recent records to emit per entity
    #[serde(default = "default_records_keep")]
    pub records_keep: usize,

    #[serde(default = "default_true")]
    pub simple_impute: bool,

    #[serde(default = "default_true")]
    pub drop_rank_column: bool,
}

fn default_rank_column() -> String {
    "rank".to_string()
}

fn default_records_keep() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl FeatureSpec {
    /// Create a spec for the given targets ordered by `sort_column`.
    /// Everything else takes its default value.
    pub fn new<I, S>(targets: I, sort_column: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            sort_column: sort_column.into(),
            grouping_vars: Vec::new(),
            rank_column: default_rank_column(),
            lags: Vec::new(),
            periods: Vec::new(),
            stats: Vec::new(),
            time_gap_name: None,
            time_unit: TimeUnit::default(),
            windowing_lag: WindowingLag::default(),
            direction: Direction::default(),
            records_keep: default_records_keep(),
            simple_impute: true,
            drop_rank_column: true,
        }
    }

    pub fn with_grouping_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grouping_vars = vars.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rank_column(mut self, column: impl Into<String>) -> Self {
        self.rank_column = column.into();
        self
    }

    pub fn with_lags(mut self, lags: impl IntoIterator<Item = usize>) -> Self {
        self.lags = lags.into_iter().collect();
        self
    }

    pub fn with_periods(mut self, periods: impl IntoIterator<Item = usize>) -> Self {
        self.periods = periods.into_iter().collect();
        self
    }

    /// Add a rolling statistic
    pub fn with_stat(mut self, name: impl Into<String>, function: StatFunction) -> Self {
        self.stats.push(StatSpec::new(name, function));
        self
    }

    pub fn with_time_gaps(mut self, name: impl Into<String>, unit: TimeUnit) -> Self {
        self.time_gap_name = Some(name.into());
        self.time_unit = unit;
        self
    }

    pub fn with_windowing_lag(mut self, windowing_lag: WindowingLag) -> Self {
        self.windowing_lag = windowing_lag;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_records_keep(mut self, records_keep: usize) -> Self {
        self.records_keep = records_keep;
        self
    }

    pub fn with_simple_impute(mut self, enable: bool) -> Self {
        self.simple_impute = enable;
        self
    }

    pub fn with_drop_rank_column(mut self, enable: bool) -> Self {
        self.drop_rank_column = enable;
        self
    }

    pub fn is_grouped(&self) -> bool {
        !self.grouping_vars.is_empty()
    }

    pub fn time_gaps_enabled(&self) -> bool {
        self.time_gap_name.is_some()
    }

    /// Prefix of grouped feature names: the grouping columns joined by `_`
    pub fn group_prefix(&self) -> Option<String> {
        if self.is_grouped() {
            Some(self.grouping_vars.join("_"))
        } else {
            None
        }
    }

    /// Lag depths actually computed and retained: ascending, without 0,
    /// with 1 forced in under the lag-1 baseline
    pub fn effective_lags(&self) -> Vec<usize> {
        let mut lags: BTreeSet<usize> = self.lags.iter().copied().filter(|&l| l > 0).collect();
        if self.windowing_lag == WindowingLag::Baseline {
            lags.insert(1);
        }
        lags.into_iter().collect()
    }

    /// Rolling window widths, ascending and de-duplicated
    pub fn sorted_periods(&self) -> Vec<usize> {
        self.periods
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether any rolling statistic will be produced
    pub fn has_rolling(&self) -> bool {
        !self.stats.is_empty() && !self.periods.is_empty()
    }

    /// Check the spec for configuration errors. Runs before any computation.
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(config("targets cannot be empty"));
        }
        if self.targets.iter().any(|t| t.trim().is_empty()) {
            return Err(config("target names cannot be empty"));
        }
        ensure_unique("targets", &self.targets)?;

        if self.sort_column.trim().is_empty() {
            return Err(config("sort_column cannot be empty"));
        }
        if self.rank_column.trim().is_empty() {
            return Err(config("rank_column cannot be empty"));
        }
        if self.grouping_vars.iter().any(|g| g.trim().is_empty()) {
            return Err(config("grouping variable names cannot be empty"));
        }
        ensure_unique("grouping_vars", &self.grouping_vars)?;

        if self.records_keep == 0 {
            return Err(config("records_keep must be at least 1"));
        }

        if self.periods.iter().any(|&p| p == 0) {
            return Err(config("periods must be at least 1"));
        }
        if !self.stats.is_empty() && self.periods.is_empty() {
            return Err(config("stats are configured but periods is empty"));
        }
        if self.stats.iter().any(|s| s.name.trim().is_empty()) {
            return Err(config("stat names cannot be empty"));
        }
        let stat_names: Vec<String> = self.stats.iter().map(|s| s.name.clone()).collect();
        ensure_unique("stats", &stat_names)?;

        if let Some(name) = &self.time_gap_name {
            if name.trim().is_empty() {
                return Err(config("time_gap_name cannot be empty when set"));
            }
        }

        // Role columns must be distinct
        let mut roles: Vec<(&str, &str)> = self
            .targets
            .iter()
            .map(|t| ("target", t.as_str()))
            .collect();
        roles.extend(self.grouping_vars.iter().map(|g| ("grouping variable", g.as_str())));
        roles.push(("sort column", self.sort_column.as_str()));
        roles.push(("rank column", self.rank_column.as_str()));
        let mut seen: HashSet<&str> = HashSet::new();
        for (role, name) in &roles {
            if !seen.insert(*name) {
                return Err(config(&format!(
                    "column '{}' is used as {} and in another role",
                    name, role
                )));
            }
        }

        Ok(())
    }
}

fn config(message: &str) -> CoreError {
    CoreError::ConfigError(message.to_string())
}

fn ensure_unique(field: &str, names: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(CoreError::ConfigError(format!(
                "duplicate entry '{}' in {}",
                name, field
            )));
        }
    }
    Ok(())
}
