use serde::{Deserialize, Serialize};

use super::mode_choice::ModeShares;
use super::trips::PurposeShares;
use crate::error::PlanningError;

/// How strongly each mode responds to its supply-side factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Elasticities {
    pub walkability: f64,
    pub bike_infrastructure: f64,
    pub transit_access: f64,
    /// Negative: more parking pushes trips towards the car.
    pub parking: f64,
}

impl Default for Elasticities {
    fn default() -> Self {
        Self {
            walkability: 0.6,
            bike_infrastructure: 0.4,
            transit_access: 0.5,
            parking: -0.3,
        }
    }
}

/// Upper bounds on how much of the car share each mode can absorb in the
/// mode-shift scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeShiftCaps {
    pub walk_max: f64,
    pub walk_rate: f64,
    pub bike_max: f64,
    pub bike_rate: f64,
    pub transit_max: f64,
    pub transit_rate: f64,
}

impl Default for ModeShiftCaps {
    fn default() -> Self {
        Self {
            walk_max: 0.4,
            walk_rate: 0.3,
            bike_max: 0.15,
            bike_rate: 0.2,
            transit_max: 0.25,
            transit_rate: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobilityConfig {
    pub trips_per_person: f64,
    pub purpose_shares: PurposeShares,
    pub elasticities: Elasticities,
    /// Minimum share each mode keeps after normalization.
    pub share_floors: ModeShares,
    /// Kerbside parking spaces per metre of local street.
    pub parking_per_metre: f64,
    /// 15-minute walking distance in metres.
    pub walk_radius: f64,
    /// Distance assumed when there are no parcels or amenities.
    pub default_amenity_distance: f64,
    pub metres_per_mile: f64,
    pub mode_shift: ModeShiftCaps,
}

impl Default for MobilityConfig {
    fn default() -> Self {
        Self {
            trips_per_person: 3.5,
            purpose_shares: PurposeShares::default(),
            elasticities: Elasticities::default(),
            share_floors: ModeShares {
                walk: 0.05,
                bike: 0.05,
                transit: 0.05,
                car: 0.20,
            },
            parking_per_metre: 0.1,
            walk_radius: 1200.0,
            default_amenity_distance: 1000.0,
            metres_per_mile: 1609.34,
            mode_shift: ModeShiftCaps::default(),
        }
    }
}

impl MobilityConfig {
    pub fn validate(&self) -> Result<(), PlanningError> {
        let purpose_sum = self.purpose_shares.sum();
        if (purpose_sum - 1.0).abs() > 0.01 {
            return Err(PlanningError::InvalidConfig(format!(
                "trip purpose shares sum to {purpose_sum:.3}, expected 1.0"
            )));
        }
        let floors = self.share_floors;
        if floors.as_array().iter().any(|f| *f < 0.0) || floors.sum() > 1.0 {
            return Err(PlanningError::InvalidConfig(format!(
                "mode share floors must be non-negative and sum to at most 1.0, got {:.3}",
                floors.sum()
            )));
        }
        if self.trips_per_person < 0.0 || self.walk_radius <= 0.0 || self.metres_per_mile <= 0.0 {
            return Err(PlanningError::InvalidConfig(
                "mobility trip rate, walk radius and mile length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
