use std::collections::BTreeMap;

use super::objectives::{
    accessibility_band, check_constraints, cost_efficiency_band, density_band, ObjectiveScores,
    OptimizationSolution,
};
use super::params::{Parameter, ParameterVector};
use crate::budget::BudgetModel;
use crate::capacity::CapacityEngine;
use crate::config::PlanningConfig;
use crate::energy::{EnergyConfig, EnergyModel};
use crate::network::NetworkAnalysis;
use crate::scenario::{Link, Parcel, UseMix, UseType, ZoningProperties};
use crate::sustainability::{
    population_density, ScoringInputs, SustainabilityConfig, SustainabilityScorer,
};

/// Scores candidate parameter vectors against a fixed baseline scenario.
///
/// Evaluation works on copies of the parcels and configs, so any number of
/// evaluations can run concurrently over one evaluator.
pub struct ScenarioEvaluator<'a> {
    parcels: &'a [Parcel],
    links: &'a [Link],
    network: Option<&'a NetworkAnalysis>,
    config: &'a PlanningConfig,
}

impl<'a> ScenarioEvaluator<'a> {
    pub fn new(
        parcels: &'a [Parcel],
        links: &'a [Link],
        network: Option<&'a NetworkAnalysis>,
        config: &'a PlanningConfig,
    ) -> Self {
        Self {
            parcels,
            links,
            network,
            config,
        }
    }

    pub fn site_area(&self) -> f64 {
        self.parcels.iter().map(Parcel::area).sum()
    }

    /// Current parameter values of the scenario.
    ///
    /// Zoning parameters are parcel means; solar coverage comes from the
    /// energy config, bike coverage from the network analysis, and transit
    /// and green space from the sustainability placeholders.
    pub fn baseline_parameters(&self) -> ParameterVector {
        let optimizer = &self.config.optimizer;
        let placeholders = &self.config.sustainability.placeholders;
        let mean = |f: fn(&ZoningProperties) -> f64, parameter: Parameter| {
            if self.parcels.is_empty() {
                optimizer.range(parameter).default
            } else {
                self.parcels.iter().map(|p| f(&p.zoning)).sum::<f64>() / self.parcels.len() as f64
            }
        };

        let bike = self
            .network
            .filter(|n| n.total_length > 0.0)
            .map_or(placeholders.bike_coverage, |n| {
                n.bike_lane_length / n.total_length
            });

        let mut vector = ParameterVector::default();
        vector.set(Parameter::Far, mean(|z| z.far, Parameter::Far));
        vector.set(Parameter::Height, mean(|z| z.height, Parameter::Height));
        vector.set(
            Parameter::LotCoverage,
            mean(|z| z.lot_coverage, Parameter::LotCoverage),
        );
        vector.set(
            Parameter::ParkingRatio,
            mean(|z| z.parking_ratio, Parameter::ParkingRatio),
        );
        vector.set(
            Parameter::InclusionaryHousing,
            mean(|z| z.inclusionary, Parameter::InclusionaryHousing),
        );
        vector.set(
            Parameter::MixedUseRatio,
            mean(|z| z.use_mix.non_residential(), Parameter::MixedUseRatio),
        );
        vector.set(Parameter::SolarCoverage, self.config.energy.roof_coverage);
        vector.set(Parameter::BikeInfrastructure, bike);
        vector.set(Parameter::TransitPriority, placeholders.transit_access);
        vector.set(Parameter::GreenSpaceRatio, placeholders.green_space);
        vector
    }

    /// Run capacity, energy, budget and scoring for one candidate.
    pub fn evaluate(&self, name: impl Into<String>, parameters: &ParameterVector) -> OptimizationSolution {
        let config = self.config;

        let mut parcels = self.parcels.to_vec();
        for parcel in &mut parcels {
            apply_to_zoning(&mut parcel.zoning, parameters);
        }
        CapacityEngine::new(&config.capacity).recompute(&mut parcels);

        let energy_config = energy_config_for(&config.energy, parameters);
        let energy = EnergyModel::new(&energy_config).estimate(&parcels);
        let budget = BudgetModel::new(&config.budget).estimate(&parcels, self.links, Some(&energy));

        let sustainability_config = sustainability_config_for(&config.sustainability, parameters);
        let score = SustainabilityScorer::new(&sustainability_config).compute(
            &ScoringInputs {
                parcels: &parcels,
                energy: Some(&energy),
                network: self.network,
                mobility: None,
            },
            &sustainability_config.weights,
        );

        let units = budget.total_units;
        let objectives = ObjectiveScores {
            sustainability: score.overall_score,
            cost_efficiency: cost_efficiency_band(budget.total_cost, units),
            density: density_band(population_density(&parcels)),
            accessibility: accessibility_band(self.network.map(|n| n.intersection_density)),
        };
        let violations = check_constraints(
            units,
            budget.total_cost,
            score.overall_score,
            &config.optimizer.constraints,
        );

        OptimizationSolution {
            name: name.into(),
            parameters: parameters.clone(),
            total_score: objectives.total(&config.optimizer.weights),
            objectives,
            budget: budget.total_cost,
            units,
            population: parcels.iter().map(Parcel::population).sum(),
            area: self.site_area(),
            feasible: violations.is_empty(),
            violations,
        }
    }
}

/// Apply the zoning parameters present in `parameters`.
pub fn apply_to_zoning(zoning: &mut ZoningProperties, parameters: &ParameterVector) {
    if let Some(far) = parameters.get(Parameter::Far) {
        zoning.far = far;
    }
    if let Some(height) = parameters.get(Parameter::Height) {
        zoning.height = height;
    }
    if let Some(coverage) = parameters.get(Parameter::LotCoverage) {
        zoning.lot_coverage = coverage;
    }
    if let Some(parking) = parameters.get(Parameter::ParkingRatio) {
        zoning.parking_ratio = parking;
    }
    if let Some(inclusionary) = parameters.get(Parameter::InclusionaryHousing) {
        zoning.inclusionary = inclusionary;
    }
    if let Some(ratio) = parameters.get(Parameter::MixedUseRatio) {
        zoning.use_mix = with_non_residential_share(&zoning.use_mix, ratio);
    }
}

/// Rescale a use mix so non-residential uses take `ratio` of the floor area,
/// keeping their relative proportions. A purely residential mix gains
/// commercial space.
pub fn with_non_residential_share(mix: &UseMix, ratio: f64) -> UseMix {
    let ratio = ratio.clamp(0.0, 1.0);
    let others: Vec<(UseType, f64)> = mix
        .iter()
        .filter(|(use_type, share)| !use_type.is_residential() && *share > 0.0)
        .collect();
    let others_total: f64 = others.iter().map(|(_, share)| share).sum();

    let mut shares = BTreeMap::new();
    shares.insert(UseType::Residential, 1.0 - ratio);
    if others_total > 0.0 {
        for (use_type, share) in others {
            shares.insert(use_type, ratio * share / others_total);
        }
    } else {
        shares.insert(UseType::Commercial, ratio);
    }
    UseMix(shares)
}

fn energy_config_for(base: &EnergyConfig, parameters: &ParameterVector) -> EnergyConfig {
    let mut config = base.clone();
    if let Some(coverage) = parameters.get(Parameter::SolarCoverage) {
        config.roof_coverage = coverage;
    }
    config
}

fn sustainability_config_for(
    base: &SustainabilityConfig,
    parameters: &ParameterVector,
) -> SustainabilityConfig {
    let mut config = *base;
    if let Some(bike) = parameters.get(Parameter::BikeInfrastructure) {
        config.placeholders.bike_coverage = bike;
    }
    if let Some(transit) = parameters.get(Parameter::TransitPriority) {
        config.placeholders.transit_access = transit;
    }
    if let Some(green) = parameters.get(Parameter::GreenSpaceRatio) {
        config.placeholders.green_space = green;
    }
    config
}
