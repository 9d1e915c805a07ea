use serde::{Deserialize, Serialize};

use crate::error::PlanningError;
use crate::scenario::ZoningProperties;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubdivisionStrategy {
    #[default]
    Grid,
    Irregular,
}

impl SubdivisionStrategy {
    pub fn label(self) -> &'static str {
        match self {
            SubdivisionStrategy::Grid => "grid",
            SubdivisionStrategy::Irregular => "irregular",
        }
    }
}

/// Parameters for turning a site boundary into parcels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubdivisionConfig {
    pub strategy: SubdivisionStrategy,
    /// Target parcel area in m².
    pub target_area: f64,
    /// Grid cell width bounds in metres.
    pub min_width: f64,
    pub max_width: f64,
    /// Grid pieces smaller than this share of the target are dropped.
    pub grid_keep_ratio: f64,
    /// Irregular parcels outside `[min_area_ratio, max_area_ratio] x target`
    /// are dropped.
    pub min_area_ratio: f64,
    pub max_area_ratio: f64,
    /// Bisection stops once a branch is deeper than this.
    pub max_depth: u32,
    /// Bisection parts above this share of the target keep splitting.
    pub continue_ratio: f64,
    /// Road right-of-way on each side of a link centreline, in metres.
    pub road_buffer: f64,
    /// Zoning given to every generated parcel.
    pub default_zoning: ZoningProperties,
}

impl Default for SubdivisionConfig {
    fn default() -> Self {
        Self {
            strategy: SubdivisionStrategy::Grid,
            target_area: 1000.0,
            min_width: 20.0,
            max_width: 50.0,
            grid_keep_ratio: 0.5,
            min_area_ratio: 0.5,
            max_area_ratio: 2.0,
            max_depth: 3,
            continue_ratio: 0.3,
            road_buffer: 10.0,
            default_zoning: ZoningProperties::default(),
        }
    }
}

impl SubdivisionConfig {
    pub fn min_area(&self) -> f64 {
        self.target_area * self.min_area_ratio
    }

    pub fn max_area(&self) -> f64 {
        self.target_area * self.max_area_ratio
    }

    /// Grid cell width: the square root of the target, clamped to the
    /// configured width bounds.
    pub fn cell_width(&self) -> f64 {
        self.target_area.sqrt().clamp(self.min_width, self.max_width)
    }

    pub fn validate(&self) -> Result<(), PlanningError> {
        if !(self.target_area.is_finite() && self.target_area > 0.0) {
            return Err(PlanningError::InvalidConfig(format!(
                "subdivision target_area must be positive, got {}",
                self.target_area
            )));
        }
        if self.min_width <= 0.0 || self.min_width > self.max_width {
            return Err(PlanningError::InvalidConfig(format!(
                "subdivision width bounds [{}, {}] are not a valid range",
                self.min_width, self.max_width
            )));
        }
        if self.min_area_ratio < 0.0 || self.min_area_ratio > self.max_area_ratio {
            return Err(PlanningError::InvalidConfig(format!(
                "subdivision area ratios [{}, {}] are not a valid range",
                self.min_area_ratio, self.max_area_ratio
            )));
        }
        if self.road_buffer < 0.0 {
            return Err(PlanningError::InvalidConfig(
                "subdivision road_buffer must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
