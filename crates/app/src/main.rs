//! `site-planner`: run the planning pipeline on one scenario file.
//!
//! Builds a headless Bevy App (`MinimalPlugins`, `LogPlugin`,
//! `PlanningPlugin`), spawns the scenario with an `AnalysisRequest`, runs one
//! update and prints the resulting KPI document as JSON on stdout. Logs go
//! to stderr. The exit code is 1 on bad input and 2 when any stage failed.

mod cli;

use std::fs;
use std::process::ExitCode;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use serde::Serialize;

use planning::kpi::KpiDocument;
use planning::pipeline::{PipelineOptions, PipelineReport};
use planning::scenario::Scenario;
use planning::{AnalysisRequest, AnalysisStatus, PlanningConfig, PlanningPlugin, PlanningSettings};

use cli::CliArgs;

#[derive(Serialize)]
struct Output<'a> {
    scenario_id: u32,
    name: &'a str,
    report: &'a PipelineReport,
    kpis: serde_json::Value,
}

fn load(args: &CliArgs) -> Result<(Scenario, PlanningConfig), String> {
    let read = |path: &std::path::Path| {
        fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
    };
    let scenario: Scenario = serde_json::from_str(&read(&args.scenario)?)
        .map_err(|e| format!("invalid scenario {}: {e}", args.scenario.display()))?;
    let config = match &args.config {
        Some(path) => PlanningConfig::from_json_str(&read(path)?)
            .map_err(|e| format!("invalid config {}: {e}", path.display()))?,
        None => PlanningConfig::default(),
    };
    Ok((scenario, config))
}

fn analyze(args: &CliArgs, scenario: Scenario, config: PlanningConfig) -> (Scenario, PipelineReport) {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin {
            level: args.log_level,
            ..default()
        })
        .insert_resource(PlanningSettings(config))
        .add_plugins(PlanningPlugin);

    let options = PipelineOptions {
        subdivide: args.subdivide,
        optimize: args.optimize,
    };
    let entity = app
        .world_mut()
        .spawn((scenario, AnalysisRequest::new(options)))
        .id();
    app.update();

    let mut entity = app.world_mut().entity_mut(entity);
    let report = entity
        .take::<AnalysisStatus>()
        .map(|status| status.report)
        .unwrap_or_default();
    let scenario = entity.take::<Scenario>().unwrap_or_default();
    (scenario, report)
}

fn write_snapshot(kpis: &KpiDocument, path: &std::path::Path) -> Result<(), String> {
    let bytes = kpis
        .to_snapshot_bytes()
        .map_err(|e| format!("cannot encode snapshot: {e}"))?;
    fs::write(path, bytes).map_err(|e| format!("cannot write {}: {e}", path.display()))
}

fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            // --help and --version land here too.
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let (scenario, config) = match load(&args) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("site-planner: {err}");
            return ExitCode::from(1);
        }
    };

    let (scenario, report) = analyze(&args, scenario, config);

    if let Some(path) = &args.snapshot {
        if let Err(err) = write_snapshot(&scenario.kpis, path) {
            eprintln!("site-planner: {err}");
            return ExitCode::from(1);
        }
    }

    let output = Output {
        scenario_id: scenario.id,
        name: &scenario.name,
        report: &report,
        kpis: scenario.kpis.to_json(),
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("site-planner: cannot serialize output: {err}");
            return ExitCode::from(1);
        }
    }

    if report.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}
