//! Multi-objective search over zoning parameters.
//!
//! The optimizer is a small state machine:
//!
//! ```text
//! Baseline -> Sample -> Score -> Filter -> TradeOffs -> Sensitivity -> Done
//! ```
//!
//! Candidates are drawn from a seeded `PlanningRng` one after another, then
//! evaluated in parallel with rayon. Each evaluation reruns capacity, energy,
//! budget and sustainability scoring on a copy of the parcels, so it has no
//! side effects on the scenario.
//!
//! Objectives (all maximized, 0..100):
//! - sustainability: overall sustainability score
//! - cost efficiency: banded cost per unit
//! - density: banded residents per hectare
//! - accessibility: banded intersection density

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod config;
pub mod evaluator;
pub mod machine;
pub mod objectives;
pub mod pareto;
pub mod params;
pub mod sensitivity;
pub mod tradeoff;


pub use config::{Constraints, ObjectiveWeights, OptimizerConfig};
pub use evaluator::{apply_to_zoning, with_non_residential_share, ScenarioEvaluator};
pub use machine::{OptimizerPhase, ScenarioOptimizer};
pub use objectives::{
    accessibility_band, check_constraints, cost_efficiency_band, density_band,
    ConstraintViolation, Objective, ObjectiveScores, OptimizationSolution,
};
pub use pareto::pareto_front;
pub use params::{default_ranges, Parameter, ParameterRange, ParameterVector};
pub use sensitivity::{tornado, ImpactDirection, TornadoChart, TornadoEntry};
pub use tradeoff::{objective_pairs, pearson, trade_offs, TradeOffAnalysis};

use crate::kpi::KpiSection;

/// Written to the `optimization_results` KPI section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResults {
    pub baseline: OptimizationSolution,
    pub pareto_solutions: Vec<OptimizationSolution>,
    /// Solutions scored, baseline included.
    pub evaluated_count: usize,
    pub trade_offs: TradeOffAnalysis,
    pub tornado: TornadoChart,
    pub parameter_ranges: BTreeMap<Parameter, ParameterRange>,
    pub weights: ObjectiveWeights,
    pub constraints: Constraints,
    pub seed: u64,
    /// The time budget ran out before every candidate was scored.
    pub truncated: bool,
}

impl KpiSection for OptimizationResults {
    const KEY: &'static str = "optimization_results";
}
