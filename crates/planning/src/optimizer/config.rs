use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::params::{default_ranges, Parameter, ParameterRange};
use crate::error::PlanningError;
use crate::rng::DEFAULT_SEED;

/// Weights of the four objectives in the total score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    pub sustainability: f64,
    pub cost_efficiency: f64,
    pub density: f64,
    pub accessibility: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            sustainability: 0.4,
            cost_efficiency: 0.3,
            density: 0.2,
            accessibility: 0.1,
        }
    }
}

impl ObjectiveWeights {
    pub fn sum(&self) -> f64 {
        self.sustainability + self.cost_efficiency + self.density + self.accessibility
    }

    pub fn validate(&self) -> Result<(), PlanningError> {
        let total = self.sum();
        if (total - 1.0).abs() > 0.01 {
            return Err(PlanningError::InvalidConfig(format!(
                "objective weights must sum to 1.0, got {total:.3}"
            )));
        }
        Ok(())
    }
}

/// Feasibility limits. Solutions outside them are reported, not dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub min_units: u32,
    pub max_budget: f64,
    pub min_sustainability_score: f64,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_units: 100,
            max_budget: 100_000_000.0,
            min_sustainability_score: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Random candidates drawn per run (the baseline is added on top).
    pub sample_count: usize,
    /// Hard cap on `sample_count`.
    pub max_samples: usize,
    /// Sample counts above this log a warning; the Pareto filter is O(n²).
    pub quadratic_warning_threshold: usize,
    pub seed: u64,
    /// Wall-clock budget for candidate evaluation. Candidates not started
    /// before it runs out are skipped and the run is marked truncated.
    pub time_budget_ms: Option<u64>,
    pub weights: ObjectiveWeights,
    pub constraints: Constraints,
    pub ranges: BTreeMap<Parameter, ParameterRange>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            sample_count: 20,
            max_samples: 2_000,
            quadratic_warning_threshold: 500,
            seed: DEFAULT_SEED,
            time_budget_ms: None,
            weights: ObjectiveWeights::default(),
            constraints: Constraints::default(),
            ranges: default_ranges(),
        }
    }
}

impl OptimizerConfig {
    pub fn range(&self, parameter: Parameter) -> ParameterRange {
        self.ranges
            .get(&parameter)
            .copied()
            .unwrap_or_else(|| parameter.default_range())
    }

    /// Samples actually drawn: `sample_count` capped at `max_samples`.
    pub fn effective_samples(&self) -> usize {
        self.sample_count.min(self.max_samples)
    }

    pub fn validate(&self) -> Result<(), PlanningError> {
        self.weights.validate()?;
        for (parameter, range) in &self.ranges {
            if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                return Err(PlanningError::InvalidConfig(format!(
                    "parameter range for {} is invalid: [{}, {}]",
                    parameter.key(),
                    range.min,
                    range.max
                )));
            }
        }
        Ok(())
    }
}
