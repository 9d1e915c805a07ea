//! Capital cost of a scenario: infrastructure, buildings, sustainability
//! features and soft costs.

use std::collections::BTreeMap;

use bevy::log::info;
use serde::{Deserialize, Serialize};

use crate::energy::EnergyAnalysis;
use crate::error::PlanningError;
use crate::kpi::KpiSection;
use crate::scenario::{Link, LinkClass, Parcel, UseType};

// =============================================================================
// Cost tables
// =============================================================================

/// Utility trench costs per metre of street.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityCosts {
    pub water: f64,
    pub sewer: f64,
    pub storm: f64,
    pub electrical: f64,
    pub telecom: f64,
    pub gas: f64,
}

impl Default for UtilityCosts {
    fn default() -> Self {
        Self {
            water: 800.0,
            sewer: 1000.0,
            storm: 600.0,
            electrical: 400.0,
            telecom: 200.0,
            gas: 300.0,
        }
    }
}

impl UtilityCosts {
    pub fn per_metre(&self) -> f64 {
        self.water + self.sewer + self.storm + self.electrical + self.telecom + self.gas
    }
}

/// Construction cost per m² of floor area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingCostRates {
    pub low_rise_max_height: f64,
    pub mid_rise_max_height: f64,
    pub low_rise: f64,
    pub mid_rise: f64,
    pub high_rise: f64,
    pub affordable: f64,
    pub commercial: f64,
    pub industrial: f64,
    pub institutional: f64,
    pub mixed_use: f64,
}

impl Default for BuildingCostRates {
    fn default() -> Self {
        Self {
            low_rise_max_height: 12.0,
            mid_rise_max_height: 30.0,
            low_rise: 2000.0,
            mid_rise: 2500.0,
            high_rise: 3500.0,
            affordable: 1800.0,
            commercial: 3000.0,
            industrial: 1500.0,
            institutional: 3500.0,
            mixed_use: 2800.0,
        }
    }
}

impl BuildingCostRates {
    /// Market-rate residential cost for a building of the given height.
    pub fn residential_rate(&self, height: f64) -> f64 {
        if height <= self.low_rise_max_height {
            self.low_rise
        } else if height <= self.mid_rise_max_height {
            self.mid_rise
        } else {
            self.high_rise
        }
    }

    pub fn non_residential_rate(&self, use_type: UseType) -> f64 {
        match use_type {
            UseType::Commercial => self.commercial,
            UseType::Industrial => self.industrial,
            UseType::Institutional => self.institutional,
            UseType::MixedUse => self.mixed_use,
            UseType::Residential => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftCostRates {
    pub design: f64,
    pub permits: f64,
    pub legal: f64,
    pub insurance: f64,
    pub contingency: f64,
}

impl Default for SoftCostRates {
    fn default() -> Self {
        Self {
            design: 0.08,
            permits: 0.02,
            legal: 0.01,
            insurance: 0.015,
            contingency: 0.10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Street construction per metre, by class.
    pub street_cost: BTreeMap<LinkClass, f64>,
    pub bike_lane_per_metre: f64,
    pub utilities: UtilityCosts,
    /// Park area is street length x width x share.
    pub park_street_width: f64,
    pub park_share: f64,
    pub park_cost_per_m2: f64,
    pub buildings: BuildingCostRates,
    pub solar_per_kw: f64,
    pub green_roof_per_m2: f64,
    /// Share of parking spaces fitted with EV chargers.
    pub ev_share: f64,
    pub ev_cost_per_space: f64,
    pub soft_costs: SoftCostRates,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            street_cost: BTreeMap::from([
                (LinkClass::Arterial, 2500.0),
                (LinkClass::Collector, 1800.0),
                (LinkClass::Local, 1200.0),
            ]),
            bike_lane_per_metre: 200.0,
            utilities: UtilityCosts::default(),
            park_street_width: 20.0,
            park_share: 0.10,
            park_cost_per_m2: 150.0,
            buildings: BuildingCostRates::default(),
            solar_per_kw: 2000.0,
            green_roof_per_m2: 300.0,
            ev_share: 0.10,
            ev_cost_per_space: 5000.0,
            soft_costs: SoftCostRates::default(),
        }
    }
}

impl BudgetConfig {
    pub fn street_rate(&self, class: LinkClass) -> f64 {
        self.street_cost.get(&class).copied().unwrap_or(0.0)
    }

    pub fn validate(&self) -> Result<(), PlanningError> {
        if self.street_cost.values().any(|c| *c < 0.0) || !(0.0..=1.0).contains(&self.ev_share) {
            return Err(PlanningError::InvalidConfig(
                "budget street costs must be >= 0 and ev_share within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Results
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InfrastructureCosts {
    pub streets: f64,
    pub bike_lanes: f64,
    pub utilities: f64,
    pub parks: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BuildingCosts {
    pub residential_market: f64,
    pub residential_affordable: f64,
    pub commercial: f64,
    pub industrial: f64,
    pub institutional: f64,
    pub mixed_use: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SustainabilityCosts {
    pub solar: f64,
    pub green_roof: f64,
    pub ev_charging: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SoftCosts {
    pub design: f64,
    pub permits: f64,
    pub legal: f64,
    pub insurance: f64,
    pub contingency: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitMetrics {
    pub cost_per_unit: f64,
    pub cost_per_site_m2: f64,
    pub cost_per_floor_m2: f64,
}

/// Written to the `budget_analysis` KPI section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetAnalysis {
    pub total_cost: f64,
    pub construction_cost: f64,
    pub infrastructure: InfrastructureCosts,
    pub buildings: BuildingCosts,
    pub sustainability: SustainabilityCosts,
    pub soft_costs: SoftCosts,
    pub unit_metrics: UnitMetrics,
    pub total_units: u32,
}

impl KpiSection for BudgetAnalysis {
    const KEY: &'static str = "budget_analysis";
}

// =============================================================================
// Model
// =============================================================================

pub fn infrastructure_costs(links: &[Link], config: &BudgetConfig) -> InfrastructureCosts {
    let mut costs = InfrastructureCosts::default();
    for link in links {
        let length = link.length();
        costs.streets += length * config.street_rate(link.class);
        if link.properties.bike_lane {
            costs.bike_lanes += length * config.bike_lane_per_metre;
        }
        costs.utilities += length * config.utilities.per_metre();
        costs.parks +=
            length * config.park_street_width * config.park_share * config.park_cost_per_m2;
    }
    costs.total = costs.streets + costs.bike_lanes + costs.utilities + costs.parks;
    costs
}

pub fn building_costs(parcels: &[Parcel], rates: &BuildingCostRates) -> BuildingCosts {
    let mut costs = BuildingCosts::default();
    for parcel in parcels {
        let Some(capacity) = &parcel.capacity else {
            continue;
        };
        for (use_type, floor_area) in &capacity.floor_area_by_use {
            match use_type {
                UseType::Residential => {
                    let affordable = floor_area * parcel.zoning.inclusionary.clamp(0.0, 1.0);
                    costs.residential_affordable += affordable * rates.affordable;
                    costs.residential_market += (floor_area - affordable)
                        * rates.residential_rate(parcel.zoning.height);
                }
                UseType::Commercial => {
                    costs.commercial += floor_area * rates.non_residential_rate(*use_type)
                }
                UseType::Industrial => {
                    costs.industrial += floor_area * rates.non_residential_rate(*use_type)
                }
                UseType::Institutional => {
                    costs.institutional += floor_area * rates.non_residential_rate(*use_type)
                }
                UseType::MixedUse => {
                    costs.mixed_use += floor_area * rates.non_residential_rate(*use_type)
                }
            }
        }
    }
    costs.total = costs.residential_market
        + costs.residential_affordable
        + costs.commercial
        + costs.industrial
        + costs.institutional
        + costs.mixed_use;
    costs
}

pub fn sustainability_costs(
    parcels: &[Parcel],
    energy: Option<&EnergyAnalysis>,
    config: &BudgetConfig,
) -> SustainabilityCosts {
    let solar = energy.map_or(0.0, |e| e.solar.capacity_kw) * config.solar_per_kw;
    let mut green_roof = 0.0;
    let mut parking = 0.0;
    for parcel in parcels.iter().filter(|p| p.capacity.is_some()) {
        green_roof += parcel.footprint() * parcel.zoning.green_roof * config.green_roof_per_m2;
        parking += parcel.capacity.as_ref().map_or(0.0, |c| c.parking_spaces);
    }
    let ev_charging = parking * config.ev_share * config.ev_cost_per_space;
    SustainabilityCosts {
        solar,
        green_roof,
        ev_charging,
        total: solar + green_roof + ev_charging,
    }
}

pub fn soft_costs(construction: f64, rates: &SoftCostRates) -> SoftCosts {
    let design = construction * rates.design;
    let permits = construction * rates.permits;
    let legal = construction * rates.legal;
    let insurance = construction * rates.insurance;
    let contingency = construction * rates.contingency;
    SoftCosts {
        design,
        permits,
        legal,
        insurance,
        contingency,
        total: design + permits + legal + insurance + contingency,
    }
}

pub struct BudgetModel<'a> {
    config: &'a BudgetConfig,
}

impl<'a> BudgetModel<'a> {
    pub fn new(config: &'a BudgetConfig) -> Self {
        Self { config }
    }

    /// `energy` is the scenario's energy analysis if one has been run; the
    /// solar line item is zero without it.
    pub fn analyze(
        &self,
        parcels: &[Parcel],
        links: &[Link],
        energy: Option<&EnergyAnalysis>,
    ) -> Result<BudgetAnalysis, PlanningError> {
        if parcels.is_empty() {
            return Err(PlanningError::NotFound("parcels".into()));
        }
        let analysis = self.estimate(parcels, links, energy);

        info!(
            "budget: total ${:.0} (construction ${:.0}, soft ${:.0}), ${:.0} per unit",
            analysis.total_cost,
            analysis.construction_cost,
            analysis.soft_costs.total,
            analysis.unit_metrics.cost_per_unit
        );
        Ok(analysis)
    }

    /// The budget without input checks or logging.
    pub fn estimate(
        &self,
        parcels: &[Parcel],
        links: &[Link],
        energy: Option<&EnergyAnalysis>,
    ) -> BudgetAnalysis {
        let config = self.config;

        let infrastructure = infrastructure_costs(links, config);
        let buildings = building_costs(parcels, &config.buildings);
        let sustainability = sustainability_costs(parcels, energy, config);
        let construction_cost = infrastructure.total + buildings.total + sustainability.total;
        let soft = soft_costs(construction_cost, &config.soft_costs);
        let total_cost = construction_cost + soft.total;

        let total_units: u32 = parcels
            .iter()
            .filter_map(|p| p.capacity.as_ref())
            .map(|c| c.units)
            .sum();
        let site_area: f64 = parcels.iter().map(Parcel::area).sum();
        let floor_area: f64 = parcels
            .iter()
            .filter_map(|p| p.capacity.as_ref())
            .map(|c| c.floor_area)
            .sum();
        let per = |divisor: f64| {
            if divisor > 0.0 {
                total_cost / divisor
            } else {
                0.0
            }
        };

        BudgetAnalysis {
            total_cost,
            construction_cost,
            infrastructure,
            buildings,
            sustainability,
            soft_costs: soft,
            unit_metrics: UnitMetrics {
                cost_per_unit: per(total_units as f64),
                cost_per_site_m2: per(site_area),
                cost_per_floor_m2: per(floor_area),
            },
            total_units,
        }
    }
}

// =============================================================================
// Unit tests
// =============================================================================
