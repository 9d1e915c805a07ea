use serde::{Deserialize, Serialize};

use super::criteria::Category;
use crate::error::PlanningError;

/// Allowed deviation of the category weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub energy: f64,
    pub mobility: f64,
    pub land_use: f64,
    pub water: f64,
    pub materials: f64,
    pub resilience: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            energy: 0.25,
            mobility: 0.20,
            land_use: 0.20,
            water: 0.15,
            materials: 0.10,
            resilience: 0.10,
        }
    }
}

impl CategoryWeights {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Energy => self.energy,
            Category::Mobility => self.mobility,
            Category::LandUse => self.land_use,
            Category::Water => self.water,
            Category::Materials => self.materials,
            Category::Resilience => self.resilience,
        }
    }

    pub fn sum(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }

    pub fn validate(&self) -> Result<(), PlanningError> {
        if Category::ALL.iter().any(|c| self.get(*c) < 0.0) {
            return Err(PlanningError::InvalidConfig(
                "sustainability weights must be non-negative".to_string(),
            ));
        }
        let total = self.sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(PlanningError::InvalidConfig(format!(
                "sustainability weights must sum to 1.0, got {total:.3}"
            )));
        }
        Ok(())
    }
}

/// Stand-in values for sub-metrics that no analysis stage measures yet.
///
/// `bike_coverage` is only used when the mobility section is missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderInputs {
    pub transit_access: f64,
    pub bike_coverage: f64,
    pub green_space: f64,
    pub stormwater_management: f64,
    pub water_efficiency: f64,
    pub water_reuse: f64,
    pub recycled_content: f64,
    pub local_sourcing: f64,
    pub embodied_carbon_reduction: f64,
    pub climate_adaptation: f64,
    pub disaster_preparedness: f64,
    pub social_equity: f64,
}

impl Default for PlaceholderInputs {
    fn default() -> Self {
        Self {
            transit_access: 0.6,
            bike_coverage: 0.5,
            green_space: 0.15,
            stormwater_management: 0.6,
            water_efficiency: 0.7,
            water_reuse: 0.3,
            recycled_content: 0.5,
            local_sourcing: 0.6,
            embodied_carbon_reduction: 0.2,
            climate_adaptation: 0.6,
            disaster_preparedness: 0.5,
            social_equity: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SustainabilityConfig {
    pub weights: CategoryWeights,
    pub placeholders: PlaceholderInputs,
}

impl SustainabilityConfig {
    pub fn validate(&self) -> Result<(), PlanningError> {
        self.weights.validate()
    }
}
