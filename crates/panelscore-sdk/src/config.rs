//! Configuration types for ScoringEngine

use panelscore_core::FeatureSpec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Feature spec YAML file
    pub spec_file: Option<PathBuf>,

    /// Feature spec YAML content - alternative to a file path
    #[serde(skip)]
    pub spec_content: Option<String>,

    /// Already-built feature spec - takes precedence over file and content
    pub spec: Option<FeatureSpec>,

    /// Log computation progress at debug level
    pub enable_progress: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            spec_file: None,
            spec_content: None,
            spec: None,
            enable_progress: false,
        }
    }

    /// Set the spec file
    pub fn with_spec_file(mut self, path: PathBuf) -> Self {
        self.spec_file = Some(path);
        self
    }

    /// Set the spec content
    pub fn with_spec_content(mut self, content: String) -> Self {
        self.spec_content = Some(content);
        self
    }

    /// Set the spec
    pub fn with_spec(mut self, spec: FeatureSpec) -> Self {
        self.spec = Some(spec);
        self
    }

    /// Enable progress logging
    pub fn enable_progress(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }

    /// Whether any spec source is set
    pub fn has_spec_source(&self) -> bool {
        self.spec.is_some() || self.spec_content.is_some() || self.spec_file.is_some()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
