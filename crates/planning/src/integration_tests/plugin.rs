use bevy::prelude::*;

use crate::config::PlanningSettings;
use crate::optimizer::OptimizationResults;
use crate::pipeline::PipelineOptions;
use crate::plugin::{AnalysisRequest, AnalysisStatus};
use crate::scenario::Scenario;
use crate::sustainability::SustainabilityScore;
use crate::test_harness::TestScenario;

// ====================================================================
// PlanningPlugin in a headless App
// ====================================================================

#[test]
fn test_request_is_processed_in_one_update() {
    let app = TestScenario::grid(2, 2, 100.0).spawn(PipelineOptions::default());
    assert!(!app.has_pending_request());
    let status = app.status().expect("status inserted");
    assert!(status.report.all_succeeded(), "{:?}", status.report);
    assert_eq!(status.report.scenario_id, 1);
    assert_eq!(status.report.stages.len(), 7);
    assert!(app.scenario().kpis.contains("sustainability_score"));
}

#[test]
fn test_completion_event_is_sent() {
    let mut app = TestScenario::grid(2, 2, 100.0)
        .with_id(5)
        .spawn(PipelineOptions::default());
    let events = app.completed_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].entity, app.entity());
    assert_eq!(events[0].scenario_id, 5);
    assert!(events[0].success);
}

#[test]
fn test_stage_order_matches_pipeline() {
    let app = TestScenario::grid(2, 2, 100.0)
        .with_config(|c| c.optimizer.sample_count = 4)
        .spawn(PipelineOptions::full());
    let stages: Vec<&str> = app
        .status()
        .expect("status")
        .report
        .stages
        .iter()
        .map(|s| s.stage.as_str())
        .collect();
    assert_eq!(
        stages,
        vec![
            "subdivision",
            "capacity",
            "network",
            "mobility",
            "energy",
            "budget",
            "sustainability",
            "optimizer",
        ]
    );
    assert!(app
        .scenario()
        .kpis
        .section::<OptimizationResults>()
        .is_some());
}

#[test]
fn test_idle_update_changes_nothing() {
    let mut app = TestScenario::grid(2, 2, 100.0).spawn(PipelineOptions::default());
    let kpis = app.scenario().kpis.clone();
    assert_eq!(app.completed_events().len(), 1);
    app.update();
    assert_eq!(app.scenario().kpis, kpis);
    assert!(app.completed_events().is_empty());
}

#[test]
fn test_second_request_bumps_revisions() {
    let mut app = TestScenario::grid(2, 2, 100.0).spawn(PipelineOptions::default());
    assert_eq!(app.scenario().kpis.revision("capacity"), 1);
    app.completed_events();
    app.request(PipelineOptions::default());
    app.update();
    assert_eq!(app.scenario().kpis.revision("capacity"), 2);
    assert_eq!(app.scenario().kpis.revision("budget_analysis"), 2);
    assert_eq!(app.completed_events().len(), 1);
}

#[test]
fn test_scenario_without_request_is_ignored() {
    let mut app = TestScenario::grid(1, 1, 100.0).spawn(PipelineOptions::default());
    let (idle, _) = TestScenario::grid(1, 1, 100.0).with_id(2).build();
    let idle_entity = app.app_mut().world_mut().spawn(idle).id();
    app.update();

    let world = app.app_mut().world();
    let scenario = world.get::<Scenario>(idle_entity).expect("idle scenario");
    assert!(scenario.kpis.is_empty());
    assert!(world.get::<AnalysisStatus>(idle_entity).is_none());
}

#[test]
fn test_many_scenarios_in_parallel() {
    let mut app = TestScenario::new().spawn(PipelineOptions::default());
    app.completed_events();
    let entities: Vec<Entity> = (10..14)
        .map(|id| {
            let (scenario, _) = TestScenario::grid(2, 2, 100.0).with_id(id).build();
            app.app_mut()
                .world_mut()
                .spawn((scenario, AnalysisRequest::default()))
                .id()
        })
        .collect();
    app.update();
    assert_eq!(app.completed_events().len(), 4);

    let world = app.app_mut().world();
    let first = world
        .get::<Scenario>(entities[0])
        .and_then(|s| s.kpis.section::<SustainabilityScore>())
        .expect("score");
    for (id, entity) in (10..14).zip(&entities) {
        let status = world.get::<AnalysisStatus>(*entity).expect("status");
        assert_eq!(status.report.scenario_id, id);
        assert!(status.report.all_succeeded());
        let score = world
            .get::<Scenario>(*entity)
            .and_then(|s| s.kpis.section::<SustainabilityScore>())
            .expect("score");
        assert_eq!(score, first);
    }
}

#[test]
fn test_invalid_settings_fail_the_analysis() {
    let mut app = TestScenario::grid(2, 2, 100.0)
        .with_config(|c| c.sustainability.weights.energy = 0.9)
        .spawn(PipelineOptions::default());
    let events = app.completed_events();
    assert_eq!(events.len(), 1);
    assert!(!events[0].success);
    let status = app.status().expect("status");
    assert_eq!(status.report.failed_stages(), vec!["sustainability"]);
    assert!(!app.scenario().kpis.contains("sustainability_score"));
}

#[test]
fn test_settings_resource_holds_config() {
    let mut app = TestScenario::grid(1, 1, 100.0)
        .with_config(|c| c.optimizer.seed = 9)
        .spawn(PipelineOptions::default());
    let settings = app.app_mut().world().resource::<PlanningSettings>();
    assert_eq!(settings.0.optimizer.seed, 9);
}
