//! Composite sustainability score.
//!
//! Six categories, each blending three sub-metrics:
//!
//! | Category   | Weight | Sub-metrics (blend)                                   |
//! |------------|--------|-------------------------------------------------------|
//! | Energy     | 0.25   | self-sufficiency, emissions reduction, renewables     |
//! | Mobility   | 0.20   | walkability, transit access, bike infrastructure      |
//! | Land use   | 0.20   | density, mixed use, green space                       |
//! | Water      | 0.15   | stormwater, efficiency, reuse                         |
//! | Materials  | 0.10   | recycled content, local sourcing, embodied carbon     |
//! | Resilience | 0.10   | adaptation (0.4), preparedness (0.3), equity (0.3)    |
//!
//! Other categories blend 0.4/0.4/0.2. A sub-metric scores 1.0/0.8/0.6/0.4
//! when it reaches the excellent/good/fair/poor tier and 0.2 below that.
//! Water, materials and resilience have no upstream analysis and read from
//! `PlaceholderInputs`.

pub mod config;
pub mod criteria;
pub mod grades;
pub mod scorer;


pub use config::{CategoryWeights, PlaceholderInputs, SustainabilityConfig, WEIGHT_SUM_TOLERANCE};
pub use criteria::{Category, Direction, Metric, Thresholds, TIER_MULTIPLIERS};
pub use grades::Grade;
pub use scorer::{
    metric_value, mixed_use_share, population_density, score_category, CategoryScore,
    MetricScore, ScoringInputs, SustainabilityScore, SustainabilityScorer,
};
