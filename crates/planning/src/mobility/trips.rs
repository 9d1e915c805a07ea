use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurposeShares {
    pub work: f64,
    pub shopping: f64,
    pub recreation: f64,
    pub other: f64,
}

impl Default for PurposeShares {
    fn default() -> Self {
        Self {
            work: 0.25,
            shopping: 0.30,
            recreation: 0.25,
            other: 0.20,
        }
    }
}

impl PurposeShares {
    pub fn sum(&self) -> f64 {
        self.work + self.shopping + self.recreation + self.other
    }
}

/// Daily person trips by purpose.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TripGeneration {
    pub population: f64,
    pub total_daily_trips: f64,
    pub work: f64,
    pub shopping: f64,
    pub recreation: f64,
    pub other: f64,
}

pub fn generate_trips(population: f64, trips_per_person: f64, shares: &PurposeShares) -> TripGeneration {
    let total = population * trips_per_person;
    TripGeneration {
        population,
        total_daily_trips: total,
        work: total * shares.work,
        shopping: total * shares.shopping,
        recreation: total * shares.recreation,
        other: total * shares.other,
    }
}
