//! Rolling statistic registry
//!
//! Stat functions are referenced by key in feature specs (`mean`, `sd`,
//! `quantile85`, ...). Keys are resolved once, when the spec is parsed; an
//! unknown key is a configuration error.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Registered aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatFunction {
    Mean,
    Median,
    /// Sample standard deviation (n - 1)
    Sd,
    /// Sample variance (n - 1)
    Var,
    Min,
    Max,
    Sum,
    /// Number of non-missing slots in the window
    Count,
    /// max - min
    Range,
    /// Quantile in percent, 1..=99
    Quantile(u8),
}

/// Fixed registry keys, in documentation order
pub const REGISTERED_STATS: &[&str] = &[
    "mean", "median", "sd", "var", "min", "max", "sum", "count", "range", "quantileNN",
];

impl StatFunction {
    /// Registry key of the function
    pub fn key(&self) -> String {
        match self {
            StatFunction::Mean => "mean".to_string(),
            StatFunction::Median => "median".to_string(),
            StatFunction::Sd => "sd".to_string(),
            StatFunction::Var => "var".to_string(),
            StatFunction::Min => "min".to_string(),
            StatFunction::Max => "max".to_string(),
            StatFunction::Sum => "sum".to_string(),
            StatFunction::Count => "count".to_string(),
            StatFunction::Range => "range".to_string(),
            StatFunction::Quantile(p) => format!("quantile{}", p),
        }
    }

    /// Minimum number of non-missing values needed for a defined result.
    /// An all-missing window is missing for every function, `count` included.
    pub fn min_values(&self) -> usize {
        match self {
            StatFunction::Sd | StatFunction::Var => 2,
            _ => 1,
        }
    }
}

impl FromStr for StatFunction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        let function = match key.as_str() {
            "mean" | "avg" => StatFunction::Mean,
            "median" => StatFunction::Median,
            "sd" | "stddev" => StatFunction::Sd,
            "var" | "variance" => StatFunction::Var,
            "min" => StatFunction::Min,
            "max" => StatFunction::Max,
            "sum" => StatFunction::Sum,
            "count" => StatFunction::Count,
            "range" => StatFunction::Range,
            other => match other.strip_prefix("quantile") {
                Some(pct) => {
                    let p: u8 = pct.parse().map_err(|_| {
                        CoreError::ConfigError(format!(
                            "invalid quantile stat '{}': expected quantileNN with NN in 1..=99",
                            s
                        ))
                    })?;
                    if !(1..=99).contains(&p) {
                        return Err(CoreError::ConfigError(format!(
                            "quantile percent out of range in '{}': expected 1..=99",
                            s
                        )));
                    }
                    StatFunction::Quantile(p)
                }
                None => {
                    return Err(CoreError::ConfigError(format!(
                        "unknown stat function '{}', registered: {}",
                        s,
                        REGISTERED_STATS.join(", ")
                    )))
                }
            },
        };
        Ok(function)
    }
}

impl TryFrom<String> for StatFunction {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<StatFunction> for String {
    fn from(function: StatFunction) -> Self {
        function.key()
    }
}

impl fmt::Display for StatFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A named rolling statistic: `name` appears in output columns, `function`
/// is the registered aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSpec {
    pub name: String,
    pub function: StatFunction,
}

impl StatSpec {
    pub fn new(name: impl Into<String>, function: StatFunction) -> Self {
        Self {
            name: name.into(),
            function,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        assert_eq!("mean".parse::<StatFunction>().unwrap(), StatFunction::Mean);
        assert_eq!("SD".parse::<StatFunction>().unwrap(), StatFunction::Sd);
        assert_eq!(
            "quantile85".parse::<StatFunction>().unwrap(),
            StatFunction::Quantile(85)
        );
    }

    #[test]
    fn test_unknown_stat_is_config_error() {
        let err = "kurtosis".parse::<StatFunction>().unwrap_err();
        assert!(matches!(err, CoreError::ConfigError(_)));
        assert!(err.to_string().contains("kurtosis"));
    }

    #[test]
    fn test_quantile_bounds() {
        assert!("quantile0".parse::<StatFunction>().is_err());
        assert!("quantile100".parse::<StatFunction>().is_err());
        assert!("quantilex".parse::<StatFunction>().is_err());
    }

    #[test]
    fn test_key_round_trip_through_serde() {
        let spec = StatSpec::new("Q95", StatFunction::Quantile(95));
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"name":"Q95","function":"quantile95"}"#);

        let back: StatSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
