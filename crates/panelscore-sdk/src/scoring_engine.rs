//! ScoringEngine implementation

use crate::config::EngineConfig;
use crate::error::Result;
use panelscore_core::{FeatureSpec, Table};
use panelscore_runtime::{FeatureEngine, OutputSchema, RunOutput, WindowPlan};

/// High-level entry point: a validated feature spec ready to score tables
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    engine: FeatureEngine,
    config: EngineConfig,
}

impl ScoringEngine {
    /// Create an engine for a spec. Fails when the spec is invalid.
    pub fn new(spec: FeatureSpec, config: EngineConfig) -> Result<Self> {
        let engine = FeatureEngine::new(spec)?.with_progress(config.enable_progress);
        tracing::info!(
            "Scoring engine ready: {} targets, max_cols={}, records_keep={}",
            engine.spec().targets.len(),
            engine.plan().max_cols,
            engine.spec().records_keep
        );
        Ok(Self { engine, config })
    }

    /// Features for the most recent `records_keep` rows of every entity
    pub fn score(&self, input: &Table) -> Result<Table> {
        Ok(self.engine.score(input)?)
    }

    /// Features for every row, for building training sets
    pub fn full_history(&self, input: &Table) -> Result<Table> {
        Ok(self.engine.full_history(input)?)
    }

    /// Scoring run with its metrics
    pub fn score_with_metrics(&self, input: &Table) -> Result<RunOutput> {
        Ok(self.engine.score_with_metrics(input)?)
    }

    /// Output columns for a table with the given input columns
    pub fn output_schema(&self, input_columns: &[String]) -> Result<OutputSchema> {
        Ok(self.engine.output_schema(input_columns)?)
    }

    pub fn spec(&self) -> &FeatureSpec {
        self.engine.spec()
    }

    pub fn plan(&self) -> &WindowPlan {
        self.engine.plan()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
