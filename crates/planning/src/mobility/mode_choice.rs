//! Aggregate mode split from supply-side factors.

use serde::{Deserialize, Serialize};

use super::config::Elasticities;

/// Walk factor before the elasticity is applied never drops below this.
pub const MIN_WALK_FACTOR: f64 = 0.1;
pub const MIN_BIKE_SCORE: f64 = 0.05;
pub const MIN_TRANSIT_SCORE: f64 = 0.05;
pub const MIN_CAR_SCORE: f64 = 0.2;

/// Guard against a pathological loop; four modes pin in at most four rounds.
const MAX_NORMALIZE_ROUNDS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Walk,
    Bike,
    Transit,
    Car,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModeShares {
    pub walk: f64,
    pub bike: f64,
    pub transit: f64,
    pub car: f64,
}

impl ModeShares {
    pub fn as_array(&self) -> [f64; 4] {
        [self.walk, self.bike, self.transit, self.car]
    }

    pub fn from_array(values: [f64; 4]) -> Self {
        Self {
            walk: values[0],
            bike: values[1],
            transit: values[2],
            car: values[3],
        }
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    pub fn get(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Walk => self.walk,
            Mode::Bike => self.bike,
            Mode::Transit => self.transit,
            Mode::Car => self.car,
        }
    }
}

/// Supply-side inputs to the mode split.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModeChoiceInputs {
    pub avg_amenity_distance: f64,
    /// Bike-lane length over total network length.
    pub bike_coverage: f64,
    pub major_link_count: usize,
    pub parcel_count: usize,
    /// Estimated kerbside parking spaces.
    pub kerb_parking: f64,
    pub population: f64,
}

/// Unnormalized attractiveness of each mode.
pub fn raw_scores(inputs: &ModeChoiceInputs, elasticities: &Elasticities) -> ModeShares {
    let walk_factor = (1.0 - inputs.avg_amenity_distance / 1000.0).max(MIN_WALK_FACTOR);
    let walk = walk_factor * elasticities.walkability;

    let bike = (inputs.bike_coverage * elasticities.bike_infrastructure).max(MIN_BIKE_SCORE);

    let transit_ratio = if inputs.parcel_count == 0 {
        0.0
    } else {
        inputs.major_link_count as f64 / inputs.parcel_count as f64
    };
    let transit = (transit_ratio * elasticities.transit_access).max(MIN_TRANSIT_SCORE);

    let parking_per_person = if inputs.population > 0.0 {
        inputs.kerb_parking / inputs.population
    } else {
        0.0
    };
    let car = (1.0 - parking_per_person * elasticities.parking).max(MIN_CAR_SCORE);

    ModeShares {
        walk,
        bike,
        transit,
        car,
    }
}

/// Normalize scores to shares summing to 1 with every share at or above its
/// floor. Shares that fall below their floor are pinned to it and the
/// remainder is redistributed over the others until nothing moves.
///
/// Floors must be non-negative and sum to at most 1.
pub fn normalize_with_floors(raw: ModeShares, floors: ModeShares) -> ModeShares {
    let floors = floors.as_array();
    let mut shares = [0.0; 4];
    for (i, value) in raw.as_array().into_iter().enumerate() {
        let value = if value.is_finite() { value } else { 0.0 };
        shares[i] = value.max(floors[i]).max(0.0);
    }

    let total: f64 = shares.iter().sum();
    if total <= 0.0 {
        return ModeShares::from_array([0.25; 4]);
    }
    for s in &mut shares {
        *s /= total;
    }

    let mut pinned = [false; 4];
    for _ in 0..MAX_NORMALIZE_ROUNDS {
        let mut changed = false;
        for i in 0..4 {
            if !pinned[i] && shares[i] < floors[i] {
                pinned[i] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let pinned_sum: f64 = (0..4).filter(|&i| pinned[i]).map(|i| floors[i]).sum();
        let free_sum: f64 = (0..4).filter(|&i| !pinned[i]).map(|i| shares[i]).sum();
        let remaining = (1.0 - pinned_sum).max(0.0);
        for i in 0..4 {
            if pinned[i] {
                shares[i] = floors[i];
            } else if free_sum > 0.0 {
                shares[i] *= remaining / free_sum;
            }
        }
    }

    // Everything pinned with floors below 1: spread the leftover evenly.
    let sum: f64 = shares.iter().sum();
    if sum < 1.0 {
        let extra = (1.0 - sum) / 4.0;
        for s in &mut shares {
            *s += extra;
        }
    }

    ModeShares::from_array(shares)
}
