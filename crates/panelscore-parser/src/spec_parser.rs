//! Feature spec parser
//!
//! Parses YAML feature spec documents into a validated [`FeatureSpec`].

use crate::error::{ParseError, Result};
use crate::yaml_parser::YamlParser;
use panelscore_core::{CoreError, Direction, FeatureSpec, StatFunction, StatSpec, TimeUnit, WindowingLag};
use serde_yaml::Value as YamlValue;

/// Keys accepted inside a feature spec mapping
const SPEC_FIELDS: &[&str] = &[
    "targets",
    "sort_column",
    "grouping_vars",
    "rank_column",
    "lags",
    "periods",
    "stats",
    "time_gap_name",
    "time_unit",
    "windowing_lag",
    "direction",
    "records_keep",
    "simple_impute",
    "drop_rank_column",
];

/// Keys accepted next to the `feature_spec:` wrapper
const DOCUMENT_FIELDS: &[&str] = &["version", "feature_spec"];

/// Feature spec parser
pub struct FeatureSpecParser;

impl FeatureSpecParser {
    /// Parse and validate a feature spec from a YAML string
    pub fn parse(yaml_str: &str) -> Result<FeatureSpec> {
        let yaml = YamlParser::parse(yaml_str)?;
        Self::parse_from_yaml(&yaml)
    }

    /// Parse and validate a feature spec from a YAML value. The spec may sit
    /// under a `feature_spec:` key or be the document itself.
    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<FeatureSpec> {
        let spec_obj = match yaml.get("feature_spec") {
            Some(inner) => {
                YamlParser::validate_fields_strict(yaml, DOCUMENT_FIELDS, "document")?;
                inner
            }
            None => yaml,
        };

        if !spec_obj.is_mapping() {
            return Err(ParseError::InvalidValue {
                field: "feature_spec".to_string(),
                message: "expected a mapping of spec fields".to_string(),
            });
        }
        YamlParser::validate_fields_strict(spec_obj, SPEC_FIELDS, "feature_spec")?;
        YamlParser::validate_required_fields(spec_obj, &["targets", "sort_column"])?;

        let targets = YamlParser::get_optional_string_list(spec_obj, "targets")?.unwrap_or_default();
        let sort_column = YamlParser::get_string(spec_obj, "sort_column")?;
        let mut spec = FeatureSpec::new(targets, sort_column);

        if let Some(vars) = YamlParser::get_optional_string_list(spec_obj, "grouping_vars")? {
            spec = spec.with_grouping_vars(vars);
        }
        if let Some(rank) = YamlParser::get_optional_string(spec_obj, "rank_column")? {
            spec = spec.with_rank_column(rank);
        }
        if let Some(lags) = YamlParser::get_optional_i64_list(spec_obj, "lags")? {
            spec = spec.with_lags(Self::non_negative("lags", &lags)?);
        }
        if let Some(periods) = YamlParser::get_optional_i64_list(spec_obj, "periods")? {
            spec = spec.with_periods(Self::non_negative("periods", &periods)?);
        }
        if let Some(items) = YamlParser::get_optional_array(spec_obj, "stats")? {
            spec.stats = items
                .iter()
                .map(Self::parse_stat)
                .collect::<Result<Vec<_>>>()?;
        }

        if let Some(name) = YamlParser::get_optional_string(spec_obj, "time_gap_name")? {
            let unit = match YamlParser::get_optional_string(spec_obj, "time_unit")? {
                Some(unit) => unit.parse::<TimeUnit>()?,
                None => TimeUnit::default(),
            };
            spec = spec.with_time_gaps(name, unit);
        } else if let Some(unit) = YamlParser::get_optional_string(spec_obj, "time_unit")? {
            // Still validated so typos do not go unnoticed
            spec.time_unit = unit.parse::<TimeUnit>()?;
        }

        if let Some(value) = YamlParser::get_optional_i64(spec_obj, "windowing_lag")? {
            let lag = u8::try_from(value).map_err(|_| {
                CoreError::ConfigError(format!("windowing_lag must be 0 or 1, got {}", value))
            })?;
            spec = spec.with_windowing_lag(WindowingLag::try_from(lag)?);
        }
        if let Some(direction) = YamlParser::get_optional_string(spec_obj, "direction")? {
            spec = spec.with_direction(direction.parse::<Direction>()?);
        }
        if let Some(keep) = YamlParser::get_optional_i64(spec_obj, "records_keep")? {
            if keep <= 0 {
                return Err(CoreError::ConfigError(format!(
                    "records_keep must be a positive integer, got {}",
                    keep
                ))
                .into());
            }
            spec = spec.with_records_keep(keep as usize);
        }
        if let Some(enable) = YamlParser::get_optional_bool(spec_obj, "simple_impute")? {
            spec = spec.with_simple_impute(enable);
        }
        if let Some(enable) = YamlParser::get_optional_bool(spec_obj, "drop_rank_column")? {
            spec = spec.with_drop_rank_column(enable);
        }

        spec.validate()?;

        tracing::debug!(
            "Parsed feature spec: {} target(s), {} lag(s), {} period(s), {} stat(s)",
            spec.targets.len(),
            spec.lags.len(),
            spec.periods.len(),
            spec.stats.len()
        );

        Ok(spec)
    }

    /// Parse one `stats` entry: either `{ name, function }` or a bare function key
    fn parse_stat(item: &YamlValue) -> Result<StatSpec> {
        if let Some(key) = item.as_str() {
            let function = key.parse::<StatFunction>()?;
            return Ok(StatSpec::new(key, function));
        }
        if !item.is_mapping() {
            return Err(ParseError::InvalidValue {
                field: "stats".to_string(),
                message: "each stat must be a function key or a { name, function } mapping"
                    .to_string(),
            });
        }

        YamlParser::validate_fields_strict(item, &["name", "function"], "stats")?;
        let function = YamlParser::get_string(item, "function")?.parse::<StatFunction>()?;
        let name = YamlParser::get_optional_string(item, "name")?.unwrap_or_else(|| function.key());
        Ok(StatSpec::new(name, function))
    }

    fn non_negative(field: &str, values: &[i64]) -> Result<Vec<usize>> {
        values
            .iter()
            .map(|&v| {
                usize::try_from(v).map_err(|_| {
                    ParseError::from(CoreError::ConfigError(format!(
                        "{} must be non-negative, got {}",
                        field, v
                    )))
                })
            })
            .collect()
    }
}
