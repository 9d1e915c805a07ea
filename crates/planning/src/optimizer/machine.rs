use std::time::{Duration, Instant};

use bevy::log::{debug, info, warn};
use rayon::prelude::*;

use super::evaluator::ScenarioEvaluator;
use super::objectives::OptimizationSolution;
use super::pareto::pareto_front;
use super::params::ParameterVector;
use super::sensitivity::{tornado, TornadoChart};
use super::tradeoff::{trade_offs, TradeOffAnalysis};
use super::OptimizationResults;
use crate::config::PlanningConfig;
use crate::error::PlanningError;
use crate::network::NetworkAnalysis;
use crate::rng::PlanningRng;
use crate::scenario::{Link, Parcel};

/// Optimizer progress. Each call to [`ScenarioOptimizer::step`] runs the
/// current phase and moves to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizerPhase {
    /// Evaluate the scenario's current parameters.
    #[default]
    Baseline,
    /// Draw candidate vectors from the seeded RNG.
    Sample,
    /// Evaluate candidates in parallel.
    Score,
    /// Keep the non-dominated solutions.
    Filter,
    TradeOffs,
    /// Tornado analysis around the baseline.
    Sensitivity,
    Done,
}

pub struct ScenarioOptimizer<'a> {
    evaluator: ScenarioEvaluator<'a>,
    config: &'a PlanningConfig,
    rng: PlanningRng,
    phase: OptimizerPhase,
    baseline: Option<OptimizationSolution>,
    candidates: Vec<(String, ParameterVector)>,
    solutions: Vec<OptimizationSolution>,
    pareto: Vec<OptimizationSolution>,
    trade_offs: TradeOffAnalysis,
    tornado: TornadoChart,
    truncated: bool,
}

impl<'a> ScenarioOptimizer<'a> {
    /// Fails with `NotFound` without parcels and with `InvalidConfig` when
    /// the objective or category weights do not sum to 1.
    pub fn new(
        parcels: &'a [Parcel],
        links: &'a [Link],
        network: Option<&'a NetworkAnalysis>,
        config: &'a PlanningConfig,
    ) -> Result<Self, PlanningError> {
        if parcels.is_empty() {
            return Err(PlanningError::NotFound("baseline scenario parcels".into()));
        }
        config.optimizer.validate()?;
        config.sustainability.validate()?;

        Ok(Self {
            evaluator: ScenarioEvaluator::new(parcels, links, network, config),
            config,
            rng: PlanningRng::from_seed_u64(config.optimizer.seed),
            phase: OptimizerPhase::Baseline,
            baseline: None,
            candidates: Vec::new(),
            solutions: Vec::new(),
            pareto: Vec::new(),
            trade_offs: TradeOffAnalysis::default(),
            tornado: TornadoChart::default(),
            truncated: false,
        })
    }

    pub fn phase(&self) -> OptimizerPhase {
        self.phase
    }

    pub fn evaluator(&self) -> &ScenarioEvaluator<'a> {
        &self.evaluator
    }

    /// Run the current phase and return the phase that follows it.
    pub fn step(&mut self) -> OptimizerPhase {
        debug!("optimizer: {:?}", self.phase);
        self.phase = match self.phase {
            OptimizerPhase::Baseline => {
                let parameters = self.evaluator.baseline_parameters();
                let baseline = self.evaluator.evaluate("Baseline", &parameters);
                debug!("optimizer: baseline total {:.1}", baseline.total_score);
                self.baseline = Some(baseline);
                OptimizerPhase::Sample
            }
            OptimizerPhase::Sample => {
                self.draw_candidates();
                OptimizerPhase::Score
            }
            OptimizerPhase::Score => {
                self.score_candidates();
                OptimizerPhase::Filter
            }
            OptimizerPhase::Filter => {
                self.pareto = pareto_front(&self.solutions);
                OptimizerPhase::TradeOffs
            }
            OptimizerPhase::TradeOffs => {
                self.trade_offs = trade_offs(&self.pareto);
                OptimizerPhase::Sensitivity
            }
            OptimizerPhase::Sensitivity => {
                if let Some(baseline) = &self.baseline {
                    self.tornado = tornado(
                        &self.evaluator,
                        &baseline.parameters,
                        baseline.total_score,
                        &self.config.optimizer,
                    );
                }
                OptimizerPhase::Done
            }
            OptimizerPhase::Done => OptimizerPhase::Done,
        };
        self.phase
    }

    fn draw_candidates(&mut self) {
        let config = self.config;
        let optimizer = &config.optimizer;
        let count = optimizer.effective_samples();
        if optimizer.sample_count > optimizer.max_samples {
            warn!(
                "optimizer: sample_count {} capped at max_samples {}",
                optimizer.sample_count, optimizer.max_samples
            );
        }
        if count > optimizer.quadratic_warning_threshold {
            warn!(
                "optimizer: {} samples exceeds {}; Pareto filtering is quadratic",
                count, optimizer.quadratic_warning_threshold
            );
        }
        self.candidates = (0..count)
            .map(|i| {
                (
                    format!("Solution {}", i + 1),
                    ParameterVector::sample(&optimizer.ranges, &mut self.rng),
                )
            })
            .collect();
    }

    fn score_candidates(&mut self) {
        let budget = self.config.optimizer.time_budget_ms.map(Duration::from_millis);
        let started = Instant::now();
        let evaluator = &self.evaluator;

        let evaluated: Vec<Option<OptimizationSolution>> = self
            .candidates
            .par_iter()
            .map(|(name, parameters)| {
                if budget.is_some_and(|b| started.elapsed() >= b) {
                    return None;
                }
                Some(evaluator.evaluate(name.clone(), parameters))
            })
            .collect();

        let skipped = evaluated.iter().filter(|s| s.is_none()).count();
        if skipped > 0 {
            warn!(
                "optimizer: time budget exhausted, skipped {} of {} candidates",
                skipped,
                evaluated.len()
            );
            self.truncated = true;
        }
        self.solutions = self.baseline.iter().cloned().collect();
        self.solutions.extend(evaluated.into_iter().flatten());
    }

    /// Step through every remaining phase.
    pub fn run(mut self) -> OptimizationResults {
        while self.phase != OptimizerPhase::Done {
            self.step();
        }
        self.into_results()
    }

    fn into_results(self) -> OptimizationResults {
        let optimizer = &self.config.optimizer;
        let evaluator = &self.evaluator;
        let baseline = self
            .baseline
            .unwrap_or_else(|| evaluator.evaluate("Baseline", &evaluator.baseline_parameters()));
        let results = OptimizationResults {
            baseline,
            evaluated_count: self.solutions.len(),
            pareto_solutions: self.pareto,
            trade_offs: self.trade_offs,
            tornado: self.tornado,
            parameter_ranges: optimizer.ranges.clone(),
            weights: optimizer.weights,
            constraints: optimizer.constraints,
            seed: optimizer.seed,
            truncated: self.truncated,
        };
        info!(
            "optimizer: {} Pareto-optimal of {} evaluated (seed {}{})",
            results.pareto_solutions.len(),
            results.evaluated_count,
            results.seed,
            if results.truncated { ", truncated" } else { "" }
        );
        results
    }
}
