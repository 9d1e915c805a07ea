use serde::{Deserialize, Serialize};

use super::config::{Constraints, ObjectiveWeights};
use super::params::ParameterVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Sustainability,
    CostEfficiency,
    Density,
    Accessibility,
}

impl Objective {
    pub const ALL: [Objective; 4] = [
        Objective::Sustainability,
        Objective::CostEfficiency,
        Objective::Density,
        Objective::Accessibility,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Objective::Sustainability => "sustainability",
            Objective::CostEfficiency => "cost_efficiency",
            Objective::Density => "density",
            Objective::Accessibility => "accessibility",
        }
    }
}

// ---------------------------------------------------------------------------
// Bands
// ---------------------------------------------------------------------------

/// Cheaper per unit scores higher; no units scores 0.
pub fn cost_efficiency_band(total_cost: f64, units: u32) -> f64 {
    if units == 0 {
        return 0.0;
    }
    let per_unit = total_cost / units as f64;
    if per_unit < 200_000.0 {
        100.0
    } else if per_unit < 300_000.0 {
        80.0
    } else if per_unit < 400_000.0 {
        60.0
    } else if per_unit < 500_000.0 {
        40.0
    } else {
        20.0
    }
}

/// Residents per hectare.
pub fn density_band(people_per_ha: f64) -> f64 {
    if people_per_ha >= 150.0 {
        100.0
    } else if people_per_ha >= 100.0 {
        80.0
    } else if people_per_ha >= 50.0 {
        60.0
    } else if people_per_ha >= 25.0 {
        40.0
    } else {
        20.0
    }
}

/// Intersections per km of network; `None` without a network analysis.
pub fn accessibility_band(intersection_density: Option<f64>) -> f64 {
    let Some(density) = intersection_density else {
        return 50.0;
    };
    if density >= 8.0 {
        100.0
    } else if density >= 6.0 {
        80.0
    } else if density >= 4.0 {
        60.0
    } else if density >= 2.0 {
        40.0
    } else {
        20.0
    }
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// The four objectives, each on 0..100 and maximized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectiveScores {
    pub sustainability: f64,
    pub cost_efficiency: f64,
    pub density: f64,
    pub accessibility: f64,
}

impl ObjectiveScores {
    pub fn get(&self, objective: Objective) -> f64 {
        match objective {
            Objective::Sustainability => self.sustainability,
            Objective::CostEfficiency => self.cost_efficiency,
            Objective::Density => self.density,
            Objective::Accessibility => self.accessibility,
        }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [
            self.sustainability,
            self.cost_efficiency,
            self.density,
            self.accessibility,
        ]
    }

    /// At least as good on every objective and strictly better on one.
    pub fn dominates(&self, other: &ObjectiveScores) -> bool {
        let (a, b) = (self.as_array(), other.as_array());
        a.iter().zip(&b).all(|(x, y)| x >= y) && a.iter().zip(&b).any(|(x, y)| x > y)
    }

    pub fn total(&self, weights: &ObjectiveWeights) -> f64 {
        self.sustainability * weights.sustainability
            + self.cost_efficiency * weights.cost_efficiency
            + self.density * weights.density
            + self.accessibility * weights.accessibility
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintViolation {
    TooFewUnits { units: u32, min: u32 },
    OverBudget { budget: f64, max: f64 },
    LowSustainability { score: f64, min: f64 },
}

pub fn check_constraints(
    units: u32,
    budget: f64,
    sustainability: f64,
    constraints: &Constraints,
) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();
    if units < constraints.min_units {
        violations.push(ConstraintViolation::TooFewUnits {
            units,
            min: constraints.min_units,
        });
    }
    if budget > constraints.max_budget {
        violations.push(ConstraintViolation::OverBudget {
            budget,
            max: constraints.max_budget,
        });
    }
    if sustainability < constraints.min_sustainability_score {
        violations.push(ConstraintViolation::LowSustainability {
            score: sustainability,
            min: constraints.min_sustainability_score,
        });
    }
    violations
}

/// One evaluated candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSolution {
    pub name: String,
    pub parameters: ParameterVector,
    pub objectives: ObjectiveScores,
    pub total_score: f64,
    pub budget: f64,
    pub units: u32,
    pub population: f64,
    /// Total parcel area in m².
    pub area: f64,
    pub feasible: bool,
    pub violations: Vec<ConstraintViolation>,
}
