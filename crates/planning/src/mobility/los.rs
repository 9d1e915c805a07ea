//! Walk and bike level-of-service grades.
//!
//! Scores run 0..100 and map onto letter grades:
//! - A: >= 80
//! - B: >= 60
//! - C: >= 40
//! - D: >= 20
//! - F: below 20

use serde::{Deserialize, Serialize};

/// Level of Service grade from A (best) to F (worst).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LosGrade {
    #[default]
    A,
    B,
    C,
    D,
    F,
}

impl LosGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            LosGrade::A
        } else if score >= 60.0 {
            LosGrade::B
        } else if score >= 40.0 {
            LosGrade::C
        } else if score >= 20.0 {
            LosGrade::D
        } else {
            LosGrade::F
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LosGrade::A => "LOS A (Excellent)",
            LosGrade::B => "LOS B (Good)",
            LosGrade::C => "LOS C (Fair)",
            LosGrade::D => "LOS D (Poor)",
            LosGrade::F => "LOS F (Failing)",
        }
    }

    pub fn letter(self) -> char {
        match self {
            LosGrade::A => 'A',
            LosGrade::B => 'B',
            LosGrade::C => 'C',
            LosGrade::D => 'D',
            LosGrade::F => 'F',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WalkFactors {
    pub amenity_density: f64,
    pub avg_distance: f64,
    /// Share of network length on streets with sidewalks.
    pub sidewalk_coverage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WalkLos {
    pub score: f64,
    pub grade: LosGrade,
    pub factors: WalkFactors,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BikeFactors {
    /// Bike-lane length over total network length.
    pub coverage: f64,
    pub bike_lane_km: f64,
    pub total_network_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BikeLos {
    pub score: f64,
    pub grade: LosGrade,
    pub factors: BikeFactors,
}

pub fn walk_los(avg_distance: f64, amenity_density: f64, sidewalk_coverage: f64) -> WalkLos {
    let score = (100.0 - avg_distance / 10.0).clamp(0.0, 100.0);
    WalkLos {
        score,
        grade: LosGrade::from_score(score),
        factors: WalkFactors {
            amenity_density,
            avg_distance,
            sidewalk_coverage,
        },
    }
}

pub fn bike_los(bike_lane_length: f64, total_length: f64) -> BikeLos {
    let coverage = if total_length > 0.0 {
        (bike_lane_length / total_length).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let score = coverage * 100.0;
    BikeLos {
        score,
        grade: LosGrade::from_score(score),
        factors: BikeFactors {
            coverage,
            bike_lane_km: bike_lane_length / 1000.0,
            total_network_km: total_length / 1000.0,
        },
    }
}
