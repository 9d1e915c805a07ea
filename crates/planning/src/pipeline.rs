//! Sequential stage runner for one scenario.
//!
//! Each stage reads the scenario and the KPI sections written by earlier
//! stages, then merges its own section(s) back into `scenario.kpis`:
//!
//! | Stage          | Reads                                    | Writes                                |
//! |----------------|------------------------------------------|---------------------------------------|
//! | subdivision    | boundary, links                          | parcels, `parcelization`              |
//! | capacity       | parcels                                  | parcel capacity, `capacity`, `zoning_validation` |
//! | network        | links, parcels                           | `network_analysis`                    |
//! | mobility       | parcels, links, amenities                | `mobility_analysis`                   |
//! | energy         | parcels                                  | `energy_analysis`                     |
//! | budget         | parcels, links, `energy_analysis`        | `budget_analysis`                     |
//! | sustainability | parcels, energy, network, mobility KPIs  | `sustainability_score`                |
//! | optimizer      | parcels, links, `network_analysis`       | `optimization_results`                |
//!
//! A failed stage leaves the document untouched and later stages fall back to
//! defaults for the sections it would have written.

use bevy::log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::budget::{BudgetAnalysis, BudgetModel};
use crate::capacity::{CapacityEngine, CapacitySummary};
use crate::config::PlanningConfig;
use crate::energy::{EnergyAnalysis, EnergyModel};
use crate::error::PlanningError;
use crate::kpi::KpiSection;
use crate::mobility::{MobilityAnalysis, MobilityModel};
use crate::network::{NetworkAnalysis, NetworkAnalyzer};
use crate::optimizer::{OptimizationResults, ScenarioOptimizer};
use crate::report::{StageOutcome, StageReport};
use crate::scenario::Scenario;
use crate::subdivision::{GeometrySubdivider, ParcelizationSummary};
use crate::sustainability::{ScoringInputs, SustainabilityScore, SustainabilityScorer};

/// Which optional stages `run_all` includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Replace the scenario's parcels by subdividing its boundary first.
    pub subdivide: bool,
    pub optimize: bool,
}

impl PipelineOptions {
    pub fn full() -> Self {
        Self {
            subdivide: true,
            optimize: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineReport {
    pub scenario_id: u32,
    pub stages: Vec<StageOutcome>,
}

impl PipelineReport {
    pub fn all_succeeded(&self) -> bool {
        self.stages.iter().all(|s| s.success)
    }

    pub fn failed_stages(&self) -> Vec<&str> {
        self.stages
            .iter()
            .filter(|s| !s.success)
            .map(|s| s.stage.as_str())
            .collect()
    }

    pub fn outcome(&self, stage: &str) -> Option<&StageOutcome> {
        self.stages.iter().find(|s| s.stage == stage)
    }
}

/// Merge `section` and wrap it in a report, or turn the error into a
/// failed report.
fn record<T: KpiSection>(
    scenario: &mut Scenario,
    stage: &str,
    result: Result<T, PlanningError>,
    message: impl FnOnce(&T) -> String,
) -> StageReport<T> {
    let merged = result.and_then(|section| {
        scenario.kpis.merge(&section)?;
        Ok(section)
    });
    match merged {
        Ok(section) => {
            debug!("pipeline: scenario {} finished {}", scenario.id, stage);
            let message = message(&section);
            StageReport::ok(message, section)
        }
        Err(err) => {
            warn!("pipeline: scenario {} {} failed: {}", scenario.id, stage, err);
            StageReport::failed(&err)
        }
    }
}

pub struct ScenarioPipeline<'a> {
    config: &'a PlanningConfig,
}

impl<'a> ScenarioPipeline<'a> {
    pub fn new(config: &'a PlanningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlanningConfig {
        self.config
    }

    pub fn subdivide(&self, scenario: &mut Scenario) -> StageReport<ParcelizationSummary> {
        debug!("pipeline: scenario {} subdivision", scenario.id);
        let result = GeometrySubdivider::new(&self.config.subdivision)
            .subdivide(scenario.boundary.as_ref(), &scenario.links)
            .map(|subdivision| {
                scenario.parcels = subdivision.parcels;
                subdivision.summary
            });
        record(scenario, "subdivision", result, |s| {
            format!("Generated {} parcels", s.parcel_count)
        })
    }

    /// Writes capacity onto every parcel, then merges the summary and the
    /// zoning validation.
    pub fn capacity(&self, scenario: &mut Scenario) -> StageReport<CapacitySummary> {
        debug!("pipeline: scenario {} capacity", scenario.id);
        let result = CapacityEngine::new(&self.config.capacity)
            .run(&mut scenario.parcels)
            .and_then(|outcome| {
                scenario.kpis.merge(&outcome.validation)?;
                Ok(outcome.summary)
            });
        record(scenario, "capacity", result, |s| {
            format!(
                "Computed capacity for {} of {} parcels",
                s.computed_parcels, s.parcel_count
            )
        })
    }

    pub fn network(&self, scenario: &mut Scenario) -> StageReport<NetworkAnalysis> {
        debug!("pipeline: scenario {} network", scenario.id);
        let result = NetworkAnalyzer::new(&self.config.network)
            .analyze(&scenario.links, &scenario.parcels);
        record(scenario, "network", result, |n| {
            format!("Analyzed {} links", n.link_count)
        })
    }

    pub fn mobility(&self, scenario: &mut Scenario) -> StageReport<MobilityAnalysis> {
        debug!("pipeline: scenario {} mobility", scenario.id);
        let result = MobilityModel::new(&self.config.mobility).analyze(
            &scenario.parcels,
            &scenario.links,
            &scenario.amenities,
        );
        record(scenario, "mobility", result, |m| {
            format!("Estimated {:.0} daily trips", m.trips.total_daily_trips)
        })
    }

    pub fn energy(&self, scenario: &mut Scenario) -> StageReport<EnergyAnalysis> {
        debug!("pipeline: scenario {} energy", scenario.id);
        let result = EnergyModel::new(&self.config.energy).analyze(&scenario.parcels);
        record(scenario, "energy", result, |e| {
            format!("Modeled {:.0} kWh/day demand", e.demand.daily_kwh)
        })
    }

    pub fn budget(&self, scenario: &mut Scenario) -> StageReport<BudgetAnalysis> {
        debug!("pipeline: scenario {} budget", scenario.id);
        let energy = scenario.kpis.section::<EnergyAnalysis>();
        let result = BudgetModel::new(&self.config.budget).analyze(
            &scenario.parcels,
            &scenario.links,
            energy.as_ref(),
        );
        record(scenario, "budget", result, |b| {
            format!("Total cost ${:.0}", b.total_cost)
        })
    }

    pub fn sustainability(&self, scenario: &mut Scenario) -> StageReport<SustainabilityScore> {
        debug!("pipeline: scenario {} sustainability", scenario.id);
        let energy = scenario.kpis.section::<EnergyAnalysis>();
        let network = scenario.kpis.section::<NetworkAnalysis>();
        let mobility = scenario.kpis.section::<MobilityAnalysis>();
        let inputs = ScoringInputs {
            parcels: &scenario.parcels,
            energy: energy.as_ref(),
            network: network.as_ref(),
            mobility: mobility.as_ref(),
        };
        let result = SustainabilityScorer::new(&self.config.sustainability).score(&inputs);
        record(scenario, "sustainability", result, |s| {
            format!("Overall {:.1} ({})", s.overall_score, s.overall_grade)
        })
    }

    pub fn optimize(&self, scenario: &mut Scenario) -> StageReport<OptimizationResults> {
        debug!("pipeline: scenario {} optimizer", scenario.id);
        let network = scenario.kpis.section::<NetworkAnalysis>();
        let result = ScenarioOptimizer::new(
            &scenario.parcels,
            &scenario.links,
            network.as_ref(),
            self.config,
        )
        .map(ScenarioOptimizer::run);
        record(scenario, "optimizer", result, |r| {
            format!(
                "Found {} Pareto-optimal solutions",
                r.pareto_solutions.len()
            )
        })
    }

    /// Run every stage in order. A failing stage is recorded and the run
    /// continues.
    pub fn run_all(&self, scenario: &mut Scenario, options: PipelineOptions) -> PipelineReport {
        let mut report = PipelineReport {
            scenario_id: scenario.id,
            stages: Vec::new(),
        };
        if options.subdivide {
            report.stages.push(self.subdivide(scenario).outcome("subdivision"));
        }
        report.stages.push(self.capacity(scenario).outcome("capacity"));
        report.stages.push(self.network(scenario).outcome("network"));
        report.stages.push(self.mobility(scenario).outcome("mobility"));
        report.stages.push(self.energy(scenario).outcome("energy"));
        report.stages.push(self.budget(scenario).outcome("budget"));
        report
            .stages
            .push(self.sustainability(scenario).outcome("sustainability"));
        if options.optimize {
            report.stages.push(self.optimize(scenario).outcome("optimizer"));
        }

        info!(
            "pipeline: scenario {} ran {} stages, {} failed",
            scenario.id,
            report.stages.len(),
            report.failed_stages().len()
        );
        report
    }
}
