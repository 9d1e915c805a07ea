//! Site subdivision: boundary polygon to development parcels.
//!
//! Two strategies:
//!
//! | Strategy  | Method                                                        |
//! |-----------|---------------------------------------------------------------|
//! | Grid      | Lattice of ~target-area cells clipped to the boundary          |
//! | Irregular | Road corridors subtracted from the boundary, or recursive      |
//! |           | bisection along the longer axis when there are no roads        |
//!
//! Every generated parcel receives the configured default zoning. Geometry
//! failures inside a split keep the unsplit polygon; only a degenerate
//! boundary fails the stage.

use bevy::log::info;
use geo::Area;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod grid;
pub mod irregular;

mod tests;

pub use config::{SubdivisionConfig, SubdivisionStrategy};
pub use grid::grid_parcels;
pub use irregular::irregular_parcels;

use crate::error::PlanningError;
use crate::geometry::ensure_valid;
use crate::kpi::KpiSection;
use crate::scenario::{Link, Parcel, SiteBoundary};

/// Summary written to the `parcelization` KPI section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelizationSummary {
    pub strategy: SubdivisionStrategy,
    pub parcel_count: usize,
    pub total_area: f64,
    pub average_area: f64,
    pub boundary_area: f64,
}

impl KpiSection for ParcelizationSummary {
    const KEY: &'static str = "parcelization";
}

pub struct Subdivision {
    pub parcels: Vec<Parcel>,
    pub summary: ParcelizationSummary,
}

pub struct GeometrySubdivider<'a> {
    config: &'a SubdivisionConfig,
}

impl<'a> GeometrySubdivider<'a> {
    pub fn new(config: &'a SubdivisionConfig) -> Self {
        Self { config }
    }

    pub fn subdivide(
        &self,
        boundary: Option<&SiteBoundary>,
        links: &[Link],
    ) -> Result<Subdivision, PlanningError> {
        let boundary = boundary.ok_or_else(|| PlanningError::NotFound("site boundary".into()))?;
        let report = ensure_valid(&boundary.geometry)?;

        let polygons = match self.config.strategy {
            SubdivisionStrategy::Grid => grid_parcels(&boundary.geometry, self.config),
            SubdivisionStrategy::Irregular => {
                irregular_parcels(&boundary.geometry, links, self.config)
            }
        };

        let parcels: Vec<Parcel> = polygons
            .into_iter()
            .enumerate()
            .map(|(i, geometry)| {
                Parcel::new(i as u32 + 1, geometry, self.config.default_zoning.clone())
            })
            .collect();

        let total_area: f64 = parcels.iter().map(|p| p.geometry.unsigned_area()).sum();
        let summary = ParcelizationSummary {
            strategy: self.config.strategy,
            parcel_count: parcels.len(),
            total_area,
            average_area: if parcels.is_empty() {
                0.0
            } else {
                total_area / parcels.len() as f64
            },
            boundary_area: report.area,
        };

        info!(
            "subdivision: {} strategy produced {} parcels ({:.0} m² of {:.0} m² site)",
            self.config.strategy.label(),
            summary.parcel_count,
            summary.total_area,
            summary.boundary_area
        );

        Ok(Subdivision { parcels, summary })
    }
}
