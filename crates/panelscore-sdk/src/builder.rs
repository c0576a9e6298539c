//! Builder pattern for ScoringEngine

use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use crate::scoring_engine::ScoringEngine;
use panelscore_core::FeatureSpec;
use panelscore_parser::FeatureSpecParser;
use std::path::PathBuf;

/// Builder for ScoringEngine
///
/// # Example
///
/// ```rust,ignore
/// use panelscore_sdk::ScoringEngineBuilder;
///
/// // From a spec file
/// let engine = ScoringEngineBuilder::new()
///     .with_spec_file("specs/store.yaml")
///     .enable_progress(true)
///     .build()?;
///
/// // From inline YAML
/// let engine = ScoringEngineBuilder::new()
///     .with_spec_content(yaml_content)
///     .build()?;
/// ```
pub struct ScoringEngineBuilder {
    config: EngineConfig,
}

impl ScoringEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Load the feature spec from a YAML file
    pub fn with_spec_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.spec_file = Some(path.into());
        self
    }

    /// Set feature spec YAML content directly (alternative to file path)
    pub fn with_spec_content(mut self, content: impl Into<String>) -> Self {
        self.config.spec_content = Some(content.into());
        self
    }

    /// Use an already-built feature spec
    pub fn with_spec(mut self, spec: FeatureSpec) -> Self {
        self.config.spec = Some(spec);
        self
    }

    /// Enable progress logging
    pub fn enable_progress(mut self, enable: bool) -> Self {
        self.config.enable_progress = enable;
        self
    }

    /// Build the scoring engine
    ///
    /// The spec is resolved from the first source set among an explicit
    /// spec, inline content and a spec file.
    pub fn build(self) -> Result<ScoringEngine> {
        let spec = resolve_spec(&self.config)?;
        ScoringEngine::new(spec, self.config)
    }
}

impl Default for ScoringEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_spec(config: &EngineConfig) -> Result<FeatureSpec> {
    if let Some(spec) = &config.spec {
        return Ok(spec.clone());
    }
    if let Some(content) = &config.spec_content {
        return Ok(FeatureSpecParser::parse(content)?);
    }
    if let Some(path) = &config.spec_file {
        tracing::debug!("Loading feature spec from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        return Ok(FeatureSpecParser::parse(&content)?);
    }
    Err(SdkError::ConfigError(
        "no feature spec configured: set a spec, spec content or spec file".to_string(),
    ))
}
