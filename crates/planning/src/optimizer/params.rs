use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rng::PlanningRng;

/// A tunable zoning or infrastructure parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Far,
    Height,
    LotCoverage,
    ParkingRatio,
    GreenSpaceRatio,
    MixedUseRatio,
    SolarCoverage,
    BikeInfrastructure,
    TransitPriority,
    InclusionaryHousing,
}

impl Parameter {
    pub const ALL: [Parameter; 10] = [
        Parameter::Far,
        Parameter::Height,
        Parameter::LotCoverage,
        Parameter::ParkingRatio,
        Parameter::GreenSpaceRatio,
        Parameter::MixedUseRatio,
        Parameter::SolarCoverage,
        Parameter::BikeInfrastructure,
        Parameter::TransitPriority,
        Parameter::InclusionaryHousing,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Parameter::Far => "far",
            Parameter::Height => "height",
            Parameter::LotCoverage => "lot_coverage",
            Parameter::ParkingRatio => "parking_ratio",
            Parameter::GreenSpaceRatio => "green_space_ratio",
            Parameter::MixedUseRatio => "mixed_use_ratio",
            Parameter::SolarCoverage => "solar_coverage",
            Parameter::BikeInfrastructure => "bike_infrastructure",
            Parameter::TransitPriority => "transit_priority",
            Parameter::InclusionaryHousing => "inclusionary_housing",
        }
    }

    pub fn default_range(self) -> ParameterRange {
        let (min, max, default) = match self {
            Parameter::Far => (0.5, 8.0, 2.0),
            Parameter::Height => (3.0, 50.0, 15.0),
            Parameter::LotCoverage => (0.2, 0.8, 0.5),
            Parameter::ParkingRatio => (0.5, 2.0, 1.0),
            Parameter::GreenSpaceRatio => (0.05, 0.4, 0.15),
            Parameter::MixedUseRatio => (0.1, 0.9, 0.3),
            Parameter::SolarCoverage => (0.1, 0.8, 0.3),
            Parameter::BikeInfrastructure => (0.1, 0.9, 0.3),
            Parameter::TransitPriority => (0.0, 1.0, 0.5),
            Parameter::InclusionaryHousing => (0.0, 0.3, 0.1),
        };
        ParameterRange { min, max, default }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    /// Used when the scenario gives no baseline value.
    pub default: f64,
}

impl ParameterRange {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub fn default_ranges() -> BTreeMap<Parameter, ParameterRange> {
    Parameter::ALL
        .iter()
        .map(|p| (*p, p.default_range()))
        .collect()
}

/// One candidate assignment of parameter values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterVector(pub BTreeMap<Parameter, f64>);

impl ParameterVector {
    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        self.0.get(&parameter).copied()
    }

    pub fn set(&mut self, parameter: Parameter, value: f64) {
        self.0.insert(parameter, value);
    }

    /// Copy of `self` with one parameter replaced.
    pub fn with(&self, parameter: Parameter, value: f64) -> Self {
        let mut out = self.clone();
        out.set(parameter, value);
        out
    }

    /// Draw every parameter uniformly from its range, in `Parameter::ALL`
    /// order so a seed always produces the same vector.
    pub fn sample(ranges: &BTreeMap<Parameter, ParameterRange>, rng: &mut PlanningRng) -> Self {
        let mut out = Self::default();
        for parameter in Parameter::ALL {
            let range = ranges
                .get(&parameter)
                .copied()
                .unwrap_or_else(|| parameter.default_range());
            out.set(parameter, rng.0.gen_range(range.min..=range.max));
        }
        out
    }
}
