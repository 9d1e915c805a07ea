use crate::budget::BudgetAnalysis;
use crate::capacity::{CapacitySummary, ZoningValidation};
use crate::energy::EnergyAnalysis;
use crate::kpi::KpiDocument;
use crate::mobility::MobilityAnalysis;
use crate::network::NetworkAnalysis;
use crate::pipeline::{PipelineOptions, ScenarioPipeline};
use crate::subdivision::ParcelizationSummary;
use crate::sustainability::{Grade, SustainabilityScore};
use crate::test_harness::TestScenario;

// ====================================================================
// Full pipeline over a 3 x 3 block grid
// ====================================================================

#[test]
fn test_all_stages_succeed_on_grid() {
    let (scenario, report) =
        TestScenario::grid(3, 3, 100.0).run_pipeline(PipelineOptions::default());
    assert!(report.all_succeeded(), "failed: {:?}", report.failed_stages());
    assert_eq!(report.scenario_id, 1);
    assert_eq!(report.stages.len(), 7);

    let keys: Vec<&str> = scenario.kpis.keys().collect();
    assert_eq!(
        keys,
        vec![
            "budget_analysis",
            "capacity",
            "energy_analysis",
            "mobility_analysis",
            "network_analysis",
            "sustainability_score",
            "zoning_validation",
        ]
    );
}

#[test]
fn test_capacity_summary_matches_parcels() {
    let (scenario, _) = TestScenario::grid(3, 3, 100.0).run_pipeline(PipelineOptions::default());
    let summary = scenario
        .kpis
        .section::<CapacitySummary>()
        .expect("capacity section");
    let units: u32 = scenario
        .parcels
        .iter()
        .filter_map(|p| p.capacity.as_ref())
        .map(|c| c.units)
        .sum();
    assert_eq!(summary.total_units, units);
    assert_eq!(summary.computed_parcels, 9);
    assert!(summary.skipped_parcels.is_empty());

    let validation = scenario
        .kpis
        .section::<ZoningValidation>()
        .expect("validation section");
    assert!(validation.issues.is_empty());
}

#[test]
fn test_invalid_parcel_is_skipped_not_fatal() {
    let (scenario, report) = TestScenario::grid(2, 1, 100.0)
        .with_zoning(|z| z.far = -1.0)
        .run_pipeline(PipelineOptions::default());
    assert!(report.outcome("capacity").expect("capacity ran").success);
    let summary = scenario
        .kpis
        .section::<CapacitySummary>()
        .expect("capacity section");
    assert_eq!(summary.computed_parcels, 0);
    assert_eq!(summary.skipped_parcels, vec![1, 2]);
    assert!(scenario.parcels.iter().all(|p| p.capacity.is_none()));
}

#[test]
fn test_network_section_describes_grid() {
    let (scenario, _) = TestScenario::grid(3, 3, 100.0).run_pipeline(PipelineOptions::default());
    let network = scenario
        .kpis
        .section::<NetworkAnalysis>()
        .expect("network section");
    assert_eq!(network.link_count, 24);
    assert_eq!(network.node_count, 16);
    assert_eq!(network.edge_count, 24);
    assert_eq!(network.component_count, 1);
    assert!((network.total_length - 2_400.0).abs() < 1e-6);
    assert!((network.bike_lane_length - 1_200.0).abs() < 1e-6);
    assert_eq!(
        scenario.kpis.get_path(&["network_analysis", "link_count"]),
        Some(&serde_json::json!(24))
    );
}

#[test]
fn test_budget_reads_energy_section() {
    let (scenario, _) = TestScenario::grid(2, 2, 100.0).run_pipeline(PipelineOptions::default());
    let energy = scenario
        .kpis
        .section::<EnergyAnalysis>()
        .expect("energy section");
    let budget = scenario
        .kpis
        .section::<BudgetAnalysis>()
        .expect("budget section");
    let expected = energy.solar.capacity_kw * 2_000.0;
    assert!(expected > 0.0);
    assert!((budget.sustainability.solar - expected).abs() < 1e-6);

    let capacity = scenario
        .kpis
        .section::<CapacitySummary>()
        .expect("capacity section");
    assert_eq!(budget.total_units, capacity.total_units);
}

#[test]
fn test_budget_without_energy_section_has_no_solar_cost() {
    let harness = TestScenario::grid(2, 2, 100.0);
    let (mut scenario, config) = harness.build();
    let pipeline = ScenarioPipeline::new(&config);
    assert!(pipeline.capacity(&mut scenario).success);
    let report = pipeline.budget(&mut scenario);
    assert!(report.success);
    let budget = report.data.expect("budget payload");
    assert!(budget.sustainability.solar.abs() < f64::EPSILON);
    assert!(budget.total_cost > 0.0);
}

#[test]
fn test_sustainability_uses_upstream_sections() {
    let (scenario, _) = TestScenario::grid(3, 3, 100.0).run_pipeline(PipelineOptions::default());
    let score = scenario
        .kpis
        .section::<SustainabilityScore>()
        .expect("score section");
    assert!((0.0..=100.0).contains(&score.overall_score));
    assert_eq!(score.overall_grade, Grade::from_score(score.overall_score));
    assert_eq!(score.category_scores.len(), 6);

    // Without any analysis sections the score falls back to placeholders.
    let (mut bare, config) = TestScenario::grid(3, 3, 100.0).build();
    let fallback = ScenarioPipeline::new(&config)
        .sustainability(&mut bare)
        .data
        .expect("score payload");
    assert!(fallback.overall_score < score.overall_score);
}

#[test]
fn test_mobility_shares_sum_to_one() {
    let (scenario, _) = TestScenario::grid(3, 3, 100.0)
        .with_amenity("school", 150.0, 150.0)
        .with_amenity("park", 50.0, 250.0)
        .run_pipeline(PipelineOptions::default());
    let mobility = scenario
        .kpis
        .section::<MobilityAnalysis>()
        .expect("mobility section");
    let shares = mobility.mode_shares;
    let sum = shares.walk + shares.bike + shares.transit + shares.car;
    assert!((sum - 1.0).abs() < 0.01);
    assert!(mobility.trips.total_daily_trips > 0.0);
}

#[test]
fn test_missing_links_fail_only_link_stages() {
    let (scenario, report) = TestScenario::grid(2, 2, 100.0)
        .without_links()
        .run_pipeline(PipelineOptions::default());
    assert_eq!(report.failed_stages(), vec!["network", "mobility"]);
    let network = report.outcome("network").expect("network ran");
    assert_eq!(network.message, "No links found");
    assert!(!scenario.kpis.contains("network_analysis"));
    assert!(scenario.kpis.contains("sustainability_score"));
}

// ====================================================================
// Subdivision
// ====================================================================

#[test]
fn test_subdivision_replaces_parcels() {
    let (scenario, report) = TestScenario::new()
        .with_boundary(200.0, 200.0)
        .with_street_grid(100.0)
        .run_pipeline(PipelineOptions {
            subdivide: true,
            optimize: false,
        });
    assert!(report.all_succeeded(), "failed: {:?}", report.failed_stages());
    assert_eq!(report.stages[0].stage, "subdivision");
    let summary = scenario
        .kpis
        .section::<ParcelizationSummary>()
        .expect("parcelization section");
    assert!(summary.parcel_count > 0);
    assert_eq!(summary.parcel_count, scenario.parcels.len());
    assert!(summary.total_area <= summary.boundary_area + 1e-6);
    assert!(scenario.parcels.iter().all(|p| p.capacity.is_some()));
}

// ====================================================================
// Re-runs and the KPI document
// ====================================================================

#[test]
fn test_rerun_bumps_revisions_and_is_idempotent() {
    let (mut scenario, config) = TestScenario::grid(2, 2, 100.0).build();
    let pipeline = ScenarioPipeline::new(&config);
    pipeline.run_all(&mut scenario, PipelineOptions::default());
    let first = scenario.kpis.section::<CapacitySummary>();
    let parcels = scenario.parcels.clone();

    pipeline.run_all(&mut scenario, PipelineOptions::default());
    assert_eq!(scenario.kpis.revision("capacity"), 2);
    assert_eq!(scenario.kpis.revision("sustainability_score"), 2);
    assert_eq!(scenario.kpis.section::<CapacitySummary>(), first);
    assert_eq!(scenario.parcels, parcels);
}

#[test]
fn test_single_stage_leaves_other_sections_alone() {
    let (mut scenario, config) = TestScenario::grid(2, 2, 100.0).build();
    let pipeline = ScenarioPipeline::new(&config);
    pipeline.run_all(&mut scenario, PipelineOptions::default());
    let before = scenario.kpis.clone();

    pipeline.energy(&mut scenario);
    assert_eq!(scenario.kpis.revision("energy_analysis"), 2);
    for key in before.keys().filter(|k| *k != "energy_analysis") {
        assert_eq!(scenario.kpis.entry(key), before.entry(key), "{key} changed");
    }
}

#[test]
fn test_kpi_snapshot_of_full_run() {
    let (scenario, _) = TestScenario::grid(2, 2, 100.0).run_pipeline(PipelineOptions::default());
    let bytes = scenario.kpis.to_snapshot_bytes().expect("encode");
    let restored = KpiDocument::from_snapshot_bytes(&bytes).expect("decode");
    assert_eq!(restored, scenario.kpis);
    assert_eq!(
        restored.section::<SustainabilityScore>(),
        scenario.kpis.section::<SustainabilityScore>()
    );
}

#[test]
fn test_scenario_survives_json_roundtrip() {
    let (scenario, _) = TestScenario::grid(2, 2, 100.0).run_pipeline(PipelineOptions::default());
    let json = serde_json::to_string(&scenario).expect("serialize");
    let restored: crate::scenario::Scenario = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored.parcels, scenario.parcels);
    assert_eq!(restored.kpis, scenario.kpis);
}
