//! Land-development scenario analysis.
//!
//! A [`Scenario`](scenario::Scenario) (site boundary, street links, parcels,
//! amenities) runs through subdivision, capacity, network, mobility, energy,
//! budget and sustainability stages, and optionally a multi-objective
//! optimizer over the zoning parameters. Every stage writes a typed section
//! into the scenario's [`KpiDocument`](kpi::KpiDocument).
//!
//! Use [`pipeline::ScenarioPipeline`] directly, or add [`PlanningPlugin`] to
//! a Bevy `App` and tag scenario entities with
//! [`AnalysisRequest`](plugin::AnalysisRequest).

pub mod budget;
pub mod capacity;
pub mod config;
pub mod energy;
pub mod error;
pub mod geometry;
pub mod kpi;
pub mod mobility;
pub mod network;
pub mod optimizer;
pub mod pipeline;
pub mod plugin;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod spatial_index;
pub mod subdivision;
pub mod sustainability;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;


pub use config::{PlanningConfig, PlanningSettings};
pub use error::PlanningError;
pub use pipeline::{PipelineOptions, PipelineReport, ScenarioPipeline};
pub use plugin::{AnalysisCompleted, AnalysisRequest, AnalysisStatus, PipelineSet, PlanningPlugin};
