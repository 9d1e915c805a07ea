//! Threshold tables for the eighteen sub-metrics.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Energy,
    Mobility,
    LandUse,
    Water,
    Materials,
    Resilience,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Energy,
        Category::Mobility,
        Category::LandUse,
        Category::Water,
        Category::Materials,
        Category::Resilience,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Energy => "Energy",
            Category::Mobility => "Mobility",
            Category::LandUse => "Land Use",
            Category::Water => "Water",
            Category::Materials => "Materials",
            Category::Resilience => "Resilience",
        }
    }

    /// The three sub-metrics of this category with their blend weights.
    pub fn metrics(self) -> [(Metric, f64); 3] {
        match self {
            Category::Energy => [
                (Metric::SelfSufficiency, 0.4),
                (Metric::EmissionsReduction, 0.4),
                (Metric::RenewableRatio, 0.2),
            ],
            Category::Mobility => [
                (Metric::Walkability, 0.4),
                (Metric::TransitAccess, 0.4),
                (Metric::BikeInfrastructure, 0.2),
            ],
            Category::LandUse => [
                (Metric::Density, 0.4),
                (Metric::MixedUse, 0.4),
                (Metric::GreenSpace, 0.2),
            ],
            Category::Water => [
                (Metric::StormwaterManagement, 0.4),
                (Metric::WaterEfficiency, 0.4),
                (Metric::WaterReuse, 0.2),
            ],
            Category::Materials => [
                (Metric::RecycledContent, 0.4),
                (Metric::LocalSourcing, 0.4),
                (Metric::EmbodiedCarbon, 0.2),
            ],
            Category::Resilience => [
                (Metric::ClimateAdaptation, 0.4),
                (Metric::DisasterPreparedness, 0.3),
                (Metric::SocialEquity, 0.3),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SelfSufficiency,
    EmissionsReduction,
    RenewableRatio,
    Walkability,
    TransitAccess,
    BikeInfrastructure,
    Density,
    MixedUse,
    GreenSpace,
    StormwaterManagement,
    WaterEfficiency,
    WaterReuse,
    RecycledContent,
    LocalSourcing,
    EmbodiedCarbon,
    ClimateAdaptation,
    DisasterPreparedness,
    SocialEquity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    /// For thresholds on raw burdens such as embodied carbon per m². The
    /// built-in table scores reductions and shares, so every shipped metric
    /// is `HigherIsBetter`.
    LowerIsBetter,
}

/// Tier boundaries, best first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
    pub direction: Direction,
}

const fn higher(excellent: f64, good: f64, fair: f64, poor: f64) -> Thresholds {
    Thresholds {
        excellent,
        good,
        fair,
        poor,
        direction: Direction::HigherIsBetter,
    }
}

/// Multipliers for excellent, good, fair, poor; anything worse gets the last.
pub const TIER_MULTIPLIERS: [f64; 5] = [1.0, 0.8, 0.6, 0.4, 0.2];

impl Thresholds {
    pub fn multiplier(&self, value: f64) -> f64 {
        let tiers = [self.excellent, self.good, self.fair, self.poor];
        let passes = |bound: f64| match self.direction {
            Direction::HigherIsBetter => value >= bound,
            Direction::LowerIsBetter => value <= bound,
        };
        tiers
            .iter()
            .position(|bound| passes(*bound))
            .map_or(TIER_MULTIPLIERS[4], |i| TIER_MULTIPLIERS[i])
    }
}

impl Metric {
    pub fn key(self) -> &'static str {
        match self {
            Metric::SelfSufficiency => "self_sufficiency",
            Metric::EmissionsReduction => "emissions_reduction",
            Metric::RenewableRatio => "renewable_ratio",
            Metric::Walkability => "walkability",
            Metric::TransitAccess => "transit_access",
            Metric::BikeInfrastructure => "bike_infrastructure",
            Metric::Density => "density",
            Metric::MixedUse => "mixed_use",
            Metric::GreenSpace => "green_space",
            Metric::StormwaterManagement => "stormwater_management",
            Metric::WaterEfficiency => "water_efficiency",
            Metric::WaterReuse => "water_reuse",
            Metric::RecycledContent => "recycled_content",
            Metric::LocalSourcing => "local_sourcing",
            Metric::EmbodiedCarbon => "embodied_carbon",
            Metric::ClimateAdaptation => "climate_adaptation",
            Metric::DisasterPreparedness => "disaster_preparedness",
            Metric::SocialEquity => "social_equity",
        }
    }

    pub fn thresholds(self) -> Thresholds {
        match self {
            Metric::SelfSufficiency => higher(0.8, 0.6, 0.4, 0.2),
            Metric::EmissionsReduction => higher(0.7, 0.5, 0.3, 0.1),
            Metric::RenewableRatio => higher(0.9, 0.7, 0.5, 0.3),
            Metric::Walkability => higher(0.9, 0.7, 0.5, 0.3),
            Metric::TransitAccess => higher(0.8, 0.6, 0.4, 0.2),
            Metric::BikeInfrastructure => higher(0.8, 0.6, 0.4, 0.2),
            // people per hectare
            Metric::Density => higher(150.0, 100.0, 50.0, 25.0),
            Metric::MixedUse => higher(0.8, 0.6, 0.4, 0.2),
            Metric::GreenSpace => higher(0.3, 0.2, 0.1, 0.05),
            Metric::StormwaterManagement => higher(0.9, 0.7, 0.5, 0.3),
            Metric::WaterEfficiency => higher(0.8, 0.6, 0.4, 0.2),
            Metric::WaterReuse => higher(0.7, 0.5, 0.3, 0.1),
            Metric::RecycledContent => higher(0.8, 0.6, 0.4, 0.2),
            Metric::LocalSourcing => higher(0.9, 0.7, 0.5, 0.3),
            // fraction of embodied carbon avoided
            Metric::EmbodiedCarbon => higher(0.3, 0.2, 0.1, 0.05),
            Metric::ClimateAdaptation => higher(0.9, 0.7, 0.5, 0.3),
            Metric::DisasterPreparedness => higher(0.8, 0.6, 0.4, 0.2),
            Metric::SocialEquity => higher(0.8, 0.6, 0.4, 0.2),
        }
    }
}
