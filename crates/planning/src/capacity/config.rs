use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PlanningError;
use crate::scenario::UseType;

/// Build-out assumptions used to turn zoning into units and jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    /// Average net dwelling size in m².
    pub avg_unit_size: f64,
    /// Net-to-gross efficiency of residential floor area.
    pub efficiency: f64,
    /// Persons per dwelling unit.
    pub household_size: f64,
    /// Storey height in metres.
    pub floor_height: f64,
    /// Jobs per 1 000 m² of floor area, by use.
    pub job_density: BTreeMap<UseType, f64>,
    pub limits: ZoningLimits,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            avg_unit_size: 85.0,
            efficiency: 0.85,
            household_size: 2.5,
            floor_height: 3.5,
            job_density: BTreeMap::from([
                (UseType::Residential, 0.0),
                (UseType::Commercial, 50.0),
                (UseType::Industrial, 25.0),
                (UseType::Institutional, 15.0),
                (UseType::MixedUse, 30.0),
            ]),
            limits: ZoningLimits::default(),
        }
    }
}

impl CapacityConfig {
    pub fn job_density(&self, use_type: UseType) -> f64 {
        self.job_density.get(&use_type).copied().unwrap_or(0.0)
    }

    pub fn validate(&self) -> Result<(), PlanningError> {
        for (name, value) in [
            ("avg_unit_size", self.avg_unit_size),
            ("efficiency", self.efficiency),
            ("household_size", self.household_size),
            ("floor_height", self.floor_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PlanningError::InvalidConfig(format!(
                    "capacity {name} must be positive, got {value}"
                )));
            }
        }
        if self.job_density.values().any(|d| *d < 0.0) {
            return Err(PlanningError::InvalidConfig(
                "capacity job densities must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Thresholds for zoning validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoningLimits {
    pub use_mix_tolerance: f64,
    pub max_far: f64,
    /// Lot coverage above this leaves no room for the setbacks.
    pub max_coverage: f64,
    pub min_parcel_area: f64,
}

impl Default for ZoningLimits {
    fn default() -> Self {
        Self {
            use_mix_tolerance: 0.01,
            max_far: 10.0,
            max_coverage: 0.9,
            min_parcel_area: 100.0,
        }
    }
}
