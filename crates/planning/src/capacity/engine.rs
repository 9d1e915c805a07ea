use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::config::CapacityConfig;
use super::validation::{validate_parcels, ZoningValidation};
use crate::error::PlanningError;
use crate::kpi::KpiSection;
use crate::scenario::{Capacity, Parcel, UseType};

/// Derive the build-out of one parcel from its zoning.
pub fn compute_capacity(parcel: &Parcel, config: &CapacityConfig) -> Capacity {
    let zoning = &parcel.zoning;
    let floor_area = parcel.area() * zoning.far * zoning.lot_coverage;

    let mut floor_area_by_use = BTreeMap::new();
    let mut jobs_by_use = BTreeMap::new();
    let mut residential_floor_area = 0.0;
    let mut jobs = 0u32;

    for (use_type, share) in zoning.use_mix.iter() {
        let use_floor_area = floor_area * share;
        floor_area_by_use.insert(use_type, use_floor_area);
        if use_type.is_residential() {
            residential_floor_area += use_floor_area;
        } else {
            let use_jobs = (use_floor_area / 1000.0 * config.job_density(use_type))
                .floor()
                .max(0.0) as u32;
            jobs_by_use.insert(use_type, use_jobs);
            jobs += use_jobs;
        }
    }

    let units = (residential_floor_area / config.avg_unit_size * config.efficiency)
        .floor()
        .max(0.0) as u32;
    let affordable_units = (units as f64 * zoning.inclusionary).round().max(0.0) as u32;

    Capacity {
        floor_area,
        residential_floor_area,
        units,
        affordable_units,
        population: units as f64 * config.household_size,
        jobs,
        parking_spaces: units as f64 * zoning.parking_ratio,
        floors: (zoning.height / config.floor_height).floor().max(0.0) as u32,
        floor_area_by_use,
        jobs_by_use,
    }
}

/// Scenario totals written to the `capacity` KPI section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CapacitySummary {
    pub parcel_count: usize,
    pub computed_parcels: usize,
    pub skipped_parcels: Vec<u32>,
    pub total_units: u32,
    pub total_affordable_units: u32,
    pub total_population: f64,
    pub total_jobs: u32,
    pub total_floor_area: f64,
    pub total_parking: f64,
    pub floor_area_by_use: BTreeMap<UseType, f64>,
    pub jobs_by_use: BTreeMap<UseType, u32>,
}

impl KpiSection for CapacitySummary {
    const KEY: &'static str = "capacity";
}

impl CapacitySummary {
    pub fn from_parcels(parcels: &[Parcel]) -> Self {
        let mut summary = CapacitySummary {
            parcel_count: parcels.len(),
            ..Default::default()
        };
        for parcel in parcels {
            let Some(capacity) = &parcel.capacity else {
                summary.skipped_parcels.push(parcel.id);
                continue;
            };
            summary.computed_parcels += 1;
            summary.total_units += capacity.units;
            summary.total_affordable_units += capacity.affordable_units;
            summary.total_population += capacity.population;
            summary.total_jobs += capacity.jobs;
            summary.total_floor_area += capacity.floor_area;
            summary.total_parking += capacity.parking_spaces;
            for (use_type, area) in &capacity.floor_area_by_use {
                *summary.floor_area_by_use.entry(*use_type).or_insert(0.0) += area;
            }
            for (use_type, jobs) in &capacity.jobs_by_use {
                *summary.jobs_by_use.entry(*use_type).or_insert(0) += jobs;
            }
        }
        summary
    }
}

pub struct CapacityOutcome {
    pub validation: ZoningValidation,
    pub summary: CapacitySummary,
}

pub struct CapacityEngine<'a> {
    config: &'a CapacityConfig,
}

impl<'a> CapacityEngine<'a> {
    pub fn new(config: &'a CapacityConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self, parcels: &[Parcel]) -> Result<ZoningValidation, PlanningError> {
        if parcels.is_empty() {
            return Err(PlanningError::NotFound("parcels".into()));
        }
        Ok(validate_parcels(parcels, &self.config.limits))
    }

    /// Validate and compute every parcel. Parcels with a validation issue are
    /// left without capacity; the others are always recomputed from scratch.
    pub fn run(&self, parcels: &mut [Parcel]) -> Result<CapacityOutcome, PlanningError> {
        if parcels.is_empty() {
            return Err(PlanningError::NotFound("parcels".into()));
        }
        let validation = self.recompute(parcels);
        let summary = CapacitySummary::from_parcels(parcels);
        bevy::log::info!(
            "capacity: {} units, {:.0} residents, {} jobs across {}/{} parcels",
            summary.total_units,
            summary.total_population,
            summary.total_jobs,
            summary.computed_parcels,
            summary.parcel_count
        );
        Ok(CapacityOutcome {
            validation,
            summary,
        })
    }

    /// Validate and recompute in place without logging. An empty slice
    /// yields an empty validation.
    pub fn recompute(&self, parcels: &mut [Parcel]) -> ZoningValidation {
        let validation = validate_parcels(parcels, &self.config.limits);
        for parcel in parcels.iter_mut() {
            parcel.capacity = if validation.has_issue(parcel.id) {
                None
            } else {
                Some(compute_capacity(parcel, self.config))
            };
        }
        validation
    }
}
