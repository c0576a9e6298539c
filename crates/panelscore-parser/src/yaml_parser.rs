//! YAML Parser
//!
//! Typed accessors over `serde_yaml::Value`. Missing optional fields yield
//! `None`; present fields of the wrong shape are reported, never ignored.

use crate::error::{ParseError, Result};
use serde_yaml::Value as YamlValue;

/// YAML parser utilities
pub struct YamlParser;

impl YamlParser {
    /// Parse YAML string into a YAML value
    pub fn parse(yaml_str: &str) -> Result<YamlValue> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    /// Get a required string field from YAML object
    pub fn get_string(obj: &YamlValue, field: &str) -> Result<String> {
        Self::get_optional_string(obj, field)?.ok_or_else(|| ParseError::MissingField {
            field: field.to_string(),
        })
    }

    /// Get an optional string field from YAML object. An explicit `null`
    /// counts as absent.
    pub fn get_optional_string(obj: &YamlValue, field: &str) -> Result<Option<String>> {
        match obj.get(field) {
            None | Some(YamlValue::Null) => Ok(None),
            Some(YamlValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(type_mismatch(field, "string", other)),
        }
    }

    /// Get an optional boolean field from YAML object
    pub fn get_optional_bool(obj: &YamlValue, field: &str) -> Result<Option<bool>> {
        match obj.get(field) {
            None | Some(YamlValue::Null) => Ok(None),
            Some(YamlValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(type_mismatch(field, "bool", other)),
        }
    }

    /// Get an optional integer field from YAML object
    pub fn get_optional_i64(obj: &YamlValue, field: &str) -> Result<Option<i64>> {
        match obj.get(field) {
            None | Some(YamlValue::Null) => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| type_mismatch(field, "integer", value)),
        }
    }

    /// Get an optional array field from YAML object
    pub fn get_optional_array<'a>(
        obj: &'a YamlValue,
        field: &str,
    ) -> Result<Option<&'a Vec<YamlValue>>> {
        match obj.get(field) {
            None | Some(YamlValue::Null) => Ok(None),
            Some(YamlValue::Sequence(items)) => Ok(Some(items)),
            Some(other) => Err(type_mismatch(field, "list", other)),
        }
    }

    /// Get a list of strings. A single scalar string is read as a one-element list.
    pub fn get_optional_string_list(obj: &YamlValue, field: &str) -> Result<Option<Vec<String>>> {
        match obj.get(field) {
            None | Some(YamlValue::Null) => Ok(None),
            Some(YamlValue::String(s)) => Ok(Some(vec![s.clone()])),
            Some(YamlValue::Sequence(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| type_mismatch(field, "list of strings", item))
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(other) => Err(type_mismatch(field, "list of strings", other)),
        }
    }

    /// Get a list of integers. A single integer is read as a one-element list.
    pub fn get_optional_i64_list(obj: &YamlValue, field: &str) -> Result<Option<Vec<i64>>> {
        match obj.get(field) {
            None | Some(YamlValue::Null) => Ok(None),
            Some(YamlValue::Sequence(items)) => items
                .iter()
                .map(|item| {
                    item.as_i64()
                        .ok_or_else(|| type_mismatch(field, "list of integers", item))
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(value) => value
                .as_i64()
                .map(|n| Some(vec![n]))
                .ok_or_else(|| type_mismatch(field, "list of integers", value)),
        }
    }

    /// Check if a field exists in YAML object
    pub fn has_field(obj: &YamlValue, field: &str) -> bool {
        obj.get(field).is_some()
    }

    /// Get all keys from a YAML mapping
    pub fn get_keys(obj: &YamlValue) -> Vec<String> {
        if let Some(mapping) = obj.as_mapping() {
            mapping
                .keys()
                .filter_map(|k| k.as_str())
                .map(|s| s.to_string())
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Validate YAML structure has required fields
    pub fn validate_required_fields(obj: &YamlValue, fields: &[&str]) -> Result<()> {
        for field in fields {
            if !Self::has_field(obj, field) {
                return Err(ParseError::MissingField {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Validate fields in a YAML object against a list of known fields
    /// Returns one message per unknown field, with a suggestion when a close
    /// match exists
    pub fn validate_fields(obj: &YamlValue, known_fields: &[&str], context: &str) -> Vec<String> {
        let mut unknown = Vec::new();

        for key in Self::get_keys(obj) {
            if known_fields.contains(&key.as_str()) {
                continue;
            }
            let suggestion = FIELD_CORRECTIONS
                .iter()
                .find(|(typo, _)| *typo == key)
                .map(|(_, correct)| correct.to_string())
                .or_else(|| Self::find_similar_field(&key, known_fields))
                .map(|s| format!(" Did you mean '{}'?", s))
                .unwrap_or_default();

            unknown.push(format!("'{}' in {}.{}", key, context, suggestion));
        }

        unknown
    }

    /// Validate fields strictly - returns error if unknown fields found
    pub fn validate_fields_strict(
        obj: &YamlValue,
        known_fields: &[&str],
        context: &str,
    ) -> Result<()> {
        let unknown = Self::validate_fields(obj, known_fields, context);

        if !unknown.is_empty() {
            for message in &unknown {
                tracing::error!("Unknown field {}", message);
            }
            return Err(ParseError::UnknownField(unknown.join("; ")));
        }

        Ok(())
    }

    /// Find similar field names using Levenshtein distance
    fn find_similar_field(field: &str, known_fields: &[&str]) -> Option<String> {
        known_fields
            .iter()
            .filter(|known| levenshtein_distance(field, known) <= 2)
            .min_by_key(|known| levenshtein_distance(field, known))
            .map(|s| s.to_string())
    }
}

/// Common field name slips and their corrections
const FIELD_CORRECTIONS: &[(&str, &str)] = &[
    ("target", "targets"),
    ("sort_col", "sort_column"),
    ("sort_by", "sort_column"),
    ("group_by", "grouping_vars"),
    ("groups", "grouping_vars"),
    ("windows", "periods"),
    ("window_sizes", "periods"),
    ("keep", "records_keep"),
    ("impute", "simple_impute"),
    ("unit", "time_unit"),
];

fn type_mismatch(field: &str, expected: &str, actual: &YamlValue) -> ParseError {
    ParseError::TypeMismatch {
        field: field.to_string(),
        expected: expected.to_string(),
        actual: yaml_type_name(actual).to_string(),
    }
}

fn yaml_type_name(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "bool",
        YamlValue::Number(n) if n.is_i64() || n.is_u64() => "integer",
        YamlValue::Number(_) => "float",
        YamlValue::String(_) => "string",
        YamlValue::Sequence(_) => "list",
        YamlValue::Mapping(_) => "mapping",
        YamlValue::Tagged(_) => "tagged value",
    }
}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    let mut previous: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut current = vec![0; s2_chars.len() + 1];

    for (i, &c1) in s1_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, &c2) in s2_chars.iter().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[s2_chars.len()]
}
