use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::OptimizerConfig;
use super::evaluator::ScenarioEvaluator;
use super::params::{Parameter, ParameterVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactDirection {
    /// Raising the parameter raises the total score.
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TornadoEntry {
    pub parameter: Parameter,
    pub low_value: f64,
    pub high_value: f64,
    /// Total score at the range minimum minus the baseline total.
    pub low_impact: f64,
    pub high_impact: f64,
    pub max_impact: f64,
    pub direction: ImpactDirection,
}

/// Entries sorted by `max_impact`, largest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TornadoChart {
    pub baseline_score: f64,
    pub entries: Vec<TornadoEntry>,
}

impl TornadoChart {
    pub fn entry(&self, parameter: Parameter) -> Option<&TornadoEntry> {
        self.entries.iter().find(|e| e.parameter == parameter)
    }
}

/// Swing each parameter to its range bounds with the others at baseline.
pub fn tornado(
    evaluator: &ScenarioEvaluator,
    baseline: &ParameterVector,
    baseline_score: f64,
    config: &OptimizerConfig,
) -> TornadoChart {
    let mut entries: Vec<TornadoEntry> = Parameter::ALL
        .par_iter()
        .map(|parameter| {
            let range = config.range(*parameter);
            let low = evaluator.evaluate(
                format!("{} low", parameter.key()),
                &baseline.with(*parameter, range.min),
            );
            let high = evaluator.evaluate(
                format!("{} high", parameter.key()),
                &baseline.with(*parameter, range.max),
            );
            let low_impact = low.total_score - baseline_score;
            let high_impact = high.total_score - baseline_score;
            TornadoEntry {
                parameter: *parameter,
                low_value: range.min,
                high_value: range.max,
                low_impact,
                high_impact,
                max_impact: low_impact.abs().max(high_impact.abs()),
                direction: if high_impact > low_impact {
                    ImpactDirection::Positive
                } else {
                    ImpactDirection::Negative
                },
            }
        })
        .collect();

    entries.sort_by(|a, b| b.max_impact.total_cmp(&a.max_impact));
    TornadoChart {
        baseline_score,
        entries,
    }
}
