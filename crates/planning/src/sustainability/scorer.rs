use std::collections::BTreeMap;

use bevy::log::{debug, info};
use serde::{Deserialize, Serialize};

use super::config::{CategoryWeights, PlaceholderInputs, SustainabilityConfig};
use super::criteria::{Category, Metric};
use super::grades::Grade;
use crate::energy::EnergyAnalysis;
use crate::error::PlanningError;
use crate::kpi::KpiSection;
use crate::mobility::MobilityAnalysis;
use crate::network::NetworkAnalysis;
use crate::scenario::Parcel;

/// What the scorer reads. Missing sections score their metrics as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringInputs<'a> {
    pub parcels: &'a [Parcel],
    pub energy: Option<&'a EnergyAnalysis>,
    pub network: Option<&'a NetworkAnalysis>,
    pub mobility: Option<&'a MobilityAnalysis>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricScore {
    pub value: f64,
    /// Tier multiplier x 100.
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: f64,
    pub grade: Grade,
    pub metrics: BTreeMap<Metric, MetricScore>,
}

/// Written to the `sustainability_score` KPI section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SustainabilityScore {
    pub overall_score: f64,
    pub overall_grade: Grade,
    pub category_scores: BTreeMap<Category, CategoryScore>,
    pub weights: CategoryWeights,
}

impl KpiSection for SustainabilityScore {
    const KEY: &'static str = "sustainability_score";
}

impl SustainabilityScore {
    pub fn category(&self, category: Category) -> f64 {
        self.category_scores.get(&category).map_or(0.0, |c| c.score)
    }
}

/// Raw value of a sub-metric before it is mapped through its thresholds.
pub fn metric_value(metric: Metric, inputs: &ScoringInputs, placeholders: &PlaceholderInputs) -> f64 {
    match metric {
        Metric::SelfSufficiency => inputs.energy.map_or(0.0, |e| e.self_sufficiency),
        Metric::EmissionsReduction => inputs.energy.map_or(0.0, |e| e.emissions.reduction_fraction),
        Metric::RenewableRatio => inputs.energy.map_or(0.0, |e| e.renewable_ratio),
        Metric::Walkability => inputs.network.map_or(0.0, |n| n.intersection_density / 100.0),
        Metric::TransitAccess => placeholders.transit_access,
        Metric::BikeInfrastructure => inputs
            .mobility
            .map_or(placeholders.bike_coverage, |m| m.bike_los.factors.coverage),
        Metric::Density => population_density(inputs.parcels),
        Metric::MixedUse => mixed_use_share(inputs.parcels),
        Metric::GreenSpace => placeholders.green_space,
        Metric::StormwaterManagement => placeholders.stormwater_management,
        Metric::WaterEfficiency => placeholders.water_efficiency,
        Metric::WaterReuse => placeholders.water_reuse,
        Metric::RecycledContent => placeholders.recycled_content,
        Metric::LocalSourcing => placeholders.local_sourcing,
        Metric::EmbodiedCarbon => placeholders.embodied_carbon_reduction,
        Metric::ClimateAdaptation => placeholders.climate_adaptation,
        Metric::DisasterPreparedness => placeholders.disaster_preparedness,
        Metric::SocialEquity => placeholders.social_equity,
    }
}

/// People per hectare of parcel area.
pub fn population_density(parcels: &[Parcel]) -> f64 {
    let hectares = parcels.iter().map(Parcel::area).sum::<f64>() / 10_000.0;
    if hectares <= 0.0 {
        return 0.0;
    }
    parcels.iter().map(Parcel::population).sum::<f64>() / hectares
}

/// Share of parcels zoned for more than one use.
pub fn mixed_use_share(parcels: &[Parcel]) -> f64 {
    if parcels.is_empty() {
        return 0.0;
    }
    let mixed = parcels
        .iter()
        .filter(|p| p.zoning.use_mix.active_uses() > 1)
        .count();
    mixed as f64 / parcels.len() as f64
}

pub fn score_category(
    category: Category,
    inputs: &ScoringInputs,
    placeholders: &PlaceholderInputs,
) -> CategoryScore {
    let mut metrics = BTreeMap::new();
    let mut blended = 0.0;
    for (metric, weight) in category.metrics() {
        let value = metric_value(metric, inputs, placeholders);
        let multiplier = metric.thresholds().multiplier(value);
        blended += multiplier * weight;
        metrics.insert(
            metric,
            MetricScore {
                value,
                score: multiplier * 100.0,
            },
        );
    }
    let score = blended * 100.0;
    CategoryScore {
        score,
        grade: Grade::from_score(score),
        metrics,
    }
}

pub struct SustainabilityScorer<'a> {
    config: &'a SustainabilityConfig,
}

impl<'a> SustainabilityScorer<'a> {
    pub fn new(config: &'a SustainabilityConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, inputs: &ScoringInputs) -> Result<SustainabilityScore, PlanningError> {
        self.score_with_weights(inputs, &self.config.weights)
    }

    /// Score with caller-supplied category weights instead of the configured
    /// ones. The weights must sum to 1.0 within 1%.
    pub fn score_with_weights(
        &self,
        inputs: &ScoringInputs,
        weights: &CategoryWeights,
    ) -> Result<SustainabilityScore, PlanningError> {
        weights.validate()?;
        let result = self.compute(inputs, weights);
        for (category, scored) in &result.category_scores {
            debug!("sustainability: {} {:.1}", category.label(), scored.score);
        }
        info!(
            "sustainability: {} ({:.1}/100)",
            result.overall_grade, result.overall_score
        );
        Ok(result)
    }

    /// Scoring without weight validation or logging, for repeated
    /// evaluation with weights that were validated once up front.
    pub fn compute(&self, inputs: &ScoringInputs, weights: &CategoryWeights) -> SustainabilityScore {
        let mut category_scores = BTreeMap::new();
        let mut overall = 0.0;
        for category in Category::ALL {
            let scored = score_category(category, inputs, &self.config.placeholders);
            overall += scored.score * weights.get(category);
            category_scores.insert(category, scored);
        }
        let overall_score = overall.clamp(0.0, 100.0);

        SustainabilityScore {
            overall_score,
            overall_grade: Grade::from_score(overall_score),
            category_scores,
            weights: *weights,
        }
    }
}
