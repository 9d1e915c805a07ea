use crate::network::NetworkAnalysis;
use crate::optimizer::{accessibility_band, OptimizationResults, Parameter};
use crate::pipeline::{PipelineOptions, ScenarioPipeline};
use crate::test_harness::TestScenario;

fn small_search() -> TestScenario {
    TestScenario::grid(3, 3, 100.0).with_config(|c| c.optimizer.sample_count = 8)
}

// ====================================================================
// Optimizer as a pipeline stage
// ====================================================================

#[test]
fn test_optimizer_stage_writes_results() {
    let (scenario, report) = small_search().run_pipeline(PipelineOptions {
        subdivide: false,
        optimize: true,
    });
    assert!(report.all_succeeded(), "failed: {:?}", report.failed_stages());
    let results = scenario
        .kpis
        .section::<OptimizationResults>()
        .expect("optimization section");
    assert_eq!(results.evaluated_count, 9);
    assert_eq!(results.seed, 42);
    assert!(!results.truncated);
    assert!(!results.pareto_solutions.is_empty());
    for a in &results.pareto_solutions {
        for b in &results.pareto_solutions {
            assert!(
                !b.objectives.dominates(&a.objectives),
                "{} dominates {}",
                b.name,
                a.name
            );
        }
    }
}

#[test]
fn test_optimizer_uses_network_section_for_accessibility() {
    let (scenario, _) = small_search().run_pipeline(PipelineOptions {
        subdivide: false,
        optimize: true,
    });
    let network = scenario
        .kpis
        .section::<NetworkAnalysis>()
        .expect("network section");
    let results = scenario
        .kpis
        .section::<OptimizationResults>()
        .expect("optimization section");
    let expected = accessibility_band(Some(network.intersection_density));
    assert!((results.baseline.objectives.accessibility - expected).abs() < f64::EPSILON);

    let bike = results
        .baseline
        .parameters
        .get(Parameter::BikeInfrastructure)
        .expect("bike parameter");
    assert!((bike - 0.5).abs() < 1e-9);
}

#[test]
fn test_optimizer_without_network_section_scores_neutral_accessibility() {
    let (mut scenario, config) = small_search().build();
    let pipeline = ScenarioPipeline::new(&config);
    assert!(pipeline.capacity(&mut scenario).success);
    let results = pipeline.optimize(&mut scenario).data.expect("results");
    assert!((results.baseline.objectives.accessibility - 50.0).abs() < f64::EPSILON);
}

#[test]
fn test_optimizer_does_not_touch_parcels() {
    let (mut scenario, config) = small_search().build();
    let pipeline = ScenarioPipeline::new(&config);
    pipeline.run_all(&mut scenario, PipelineOptions::default());
    let parcels = scenario.parcels.clone();
    let revisions: Vec<(String, u64)> = scenario
        .kpis
        .keys()
        .map(|k| (k.to_string(), scenario.kpis.revision(k)))
        .collect();

    assert!(pipeline.optimize(&mut scenario).success);
    assert_eq!(scenario.parcels, parcels);
    for (key, revision) in revisions {
        assert_eq!(scenario.kpis.revision(&key), revision, "{key}");
    }
}

#[test]
fn test_seeded_pipeline_runs_match() {
    let run = || {
        let (scenario, _) = small_search().run_pipeline(PipelineOptions {
            subdivide: false,
            optimize: true,
        });
        scenario.kpis.section::<OptimizationResults>()
    };
    let first = run();
    assert!(first.is_some());
    assert_eq!(first, run());
}

#[test]
fn test_optimizer_on_empty_scenario_is_not_found() {
    let (mut scenario, config) = TestScenario::new().build();
    let report = ScenarioPipeline::new(&config).optimize(&mut scenario);
    assert!(!report.success);
    assert_eq!(report.error.as_deref(), Some("not_found"));
    assert!(!scenario.kpis.contains("optimization_results"));
}

#[test]
fn test_optimizer_rejects_bad_objective_weights() {
    let (mut scenario, config) = small_search()
        .with_config(|c| c.optimizer.weights.sustainability = 0.9)
        .build();
    let report = ScenarioPipeline::new(&config).optimize(&mut scenario);
    assert_eq!(report.error.as_deref(), Some("invalid_config"));
}
