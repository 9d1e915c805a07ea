//! Bevy integration: every scenario entity carrying an [`AnalysisRequest`]
//! is pushed through the pipeline in one `Update`.
//!
//! Stages are systems ordered by `PipelineSet`:
//!
//! ```text
//! Parcels  →  Analysis  →  Costing  →  Scoring  →  Optimization  →  Finish
//! ```
//!
//! * **Parcels** – subdivision (when requested), then capacity.
//! * **Analysis** – network, mobility and energy. Each writes its own KPI key.
//! * **Costing** – budget, which reads `energy_analysis`.
//! * **Scoring** – sustainability, which reads the analysis sections.
//! * **Optimization** – the optimizer, when requested.
//! * **Finish** – swaps the request for an [`AnalysisStatus`] and sends
//!   [`AnalysisCompleted`].
//!
//! Scenario entities are processed with `par_iter_mut`, so one system never
//! writes the same scenario from two threads.

use bevy::prelude::*;

use crate::config::PlanningSettings;
use crate::pipeline::{PipelineOptions, PipelineReport, ScenarioPipeline};
use crate::scenario::Scenario;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PipelineSet {
    Parcels,
    Analysis,
    Costing,
    Scoring,
    Optimization,
    Finish,
}

/// Ask for a scenario to be analyzed on the next update. Stage outcomes
/// accumulate in `report` until the request finishes.
#[derive(Component, Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub options: PipelineOptions,
    pub report: PipelineReport,
}

impl AnalysisRequest {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            report: PipelineReport::default(),
        }
    }
}

/// Outcome of the most recent analysis of a scenario.
#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct AnalysisStatus {
    pub report: PipelineReport,
}

#[derive(Event, Debug, Clone)]
pub struct AnalysisCompleted {
    pub entity: Entity,
    pub scenario_id: u32,
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Stage systems
// ---------------------------------------------------------------------------

type Pending<'w, 's> = Query<'w, 's, (&'static mut Scenario, &'static mut AnalysisRequest)>;

pub fn subdivide_scenarios(settings: Res<PlanningSettings>, mut pending: Pending) {
    let pipeline = ScenarioPipeline::new(&settings.0);
    pending.par_iter_mut().for_each(|(mut scenario, mut request)| {
        if request.options.subdivide {
            let outcome = pipeline.subdivide(&mut scenario).outcome("subdivision");
            request.report.stages.push(outcome);
        }
    });
}

pub fn compute_capacity(settings: Res<PlanningSettings>, mut pending: Pending) {
    let pipeline = ScenarioPipeline::new(&settings.0);
    pending.par_iter_mut().for_each(|(mut scenario, mut request)| {
        request.report.scenario_id = scenario.id;
        let outcome = pipeline.capacity(&mut scenario).outcome("capacity");
        request.report.stages.push(outcome);
    });
}

pub fn analyze_network(settings: Res<PlanningSettings>, mut pending: Pending) {
    let pipeline = ScenarioPipeline::new(&settings.0);
    pending.par_iter_mut().for_each(|(mut scenario, mut request)| {
        let outcome = pipeline.network(&mut scenario).outcome("network");
        request.report.stages.push(outcome);
    });
}

pub fn analyze_mobility(settings: Res<PlanningSettings>, mut pending: Pending) {
    let pipeline = ScenarioPipeline::new(&settings.0);
    pending.par_iter_mut().for_each(|(mut scenario, mut request)| {
        let outcome = pipeline.mobility(&mut scenario).outcome("mobility");
        request.report.stages.push(outcome);
    });
}

pub fn analyze_energy(settings: Res<PlanningSettings>, mut pending: Pending) {
    let pipeline = ScenarioPipeline::new(&settings.0);
    pending.par_iter_mut().for_each(|(mut scenario, mut request)| {
        let outcome = pipeline.energy(&mut scenario).outcome("energy");
        request.report.stages.push(outcome);
    });
}

pub fn estimate_budget(settings: Res<PlanningSettings>, mut pending: Pending) {
    let pipeline = ScenarioPipeline::new(&settings.0);
    pending.par_iter_mut().for_each(|(mut scenario, mut request)| {
        let outcome = pipeline.budget(&mut scenario).outcome("budget");
        request.report.stages.push(outcome);
    });
}

pub fn score_sustainability(settings: Res<PlanningSettings>, mut pending: Pending) {
    let pipeline = ScenarioPipeline::new(&settings.0);
    pending.par_iter_mut().for_each(|(mut scenario, mut request)| {
        let outcome = pipeline
            .sustainability(&mut scenario)
            .outcome("sustainability");
        request.report.stages.push(outcome);
    });
}

pub fn optimize_scenarios(settings: Res<PlanningSettings>, mut pending: Pending) {
    let pipeline = ScenarioPipeline::new(&settings.0);
    pending.par_iter_mut().for_each(|(mut scenario, mut request)| {
        if request.options.optimize {
            let outcome = pipeline.optimize(&mut scenario).outcome("optimizer");
            request.report.stages.push(outcome);
        }
    });
}

pub fn finish_analysis(
    mut commands: Commands,
    finished: Query<(Entity, &AnalysisRequest)>,
    mut completed: EventWriter<AnalysisCompleted>,
) {
    for (entity, request) in &finished {
        let report = request.report.clone();
        info!(
            "analysis of scenario {} finished: {}/{} stages succeeded",
            report.scenario_id,
            report.stages.iter().filter(|s| s.success).count(),
            report.stages.len()
        );
        completed.send(AnalysisCompleted {
            entity,
            scenario_id: report.scenario_id,
            success: report.all_succeeded(),
        });
        commands
            .entity(entity)
            .remove::<AnalysisRequest>()
            .insert(AnalysisStatus { report });
    }
}

fn validate_settings(settings: Res<PlanningSettings>) {
    if let Err(err) = settings.0.validate() {
        warn!("planning settings are invalid, affected stages will fail: {}", err);
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct PlanningPlugin;

impl Plugin for PlanningPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlanningSettings>()
            .add_event::<AnalysisCompleted>()
            .configure_sets(
                Update,
                (
                    PipelineSet::Parcels,
                    PipelineSet::Analysis,
                    PipelineSet::Costing,
                    PipelineSet::Scoring,
                    PipelineSet::Optimization,
                    PipelineSet::Finish,
                )
                    .chain(),
            )
            .add_systems(Startup, validate_settings)
            .add_systems(
                Update,
                (subdivide_scenarios, compute_capacity)
                    .chain()
                    .in_set(PipelineSet::Parcels),
            )
            .add_systems(
                Update,
                (analyze_network, analyze_mobility, analyze_energy)
                    .chain()
                    .in_set(PipelineSet::Analysis),
            )
            .add_systems(Update, estimate_budget.in_set(PipelineSet::Costing))
            .add_systems(Update, score_sustainability.in_set(PipelineSet::Scoring))
            .add_systems(Update, optimize_scenarios.in_set(PipelineSet::Optimization))
            .add_systems(Update, finish_analysis.in_set(PipelineSet::Finish));
    }
}
