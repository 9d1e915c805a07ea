//! Rooftop solar supply against building demand.
//!
//! Daily demand comes from the capacity of each parcel:
//! - Residential: 30 kWh per dwelling unit
//! - Other uses: 0.15 kWh per m² of floor area
//!
//! Supply is rooftop PV on the building footprint. Storage is sized to cover
//! the daily deficit, and emissions compare grid-only supply against the
//! solar scenario (including PV manufacturing emissions).

use std::collections::BTreeMap;

use bevy::log::info;
use serde::{Deserialize, Serialize};

use crate::error::PlanningError;
use crate::kpi::KpiSection;
use crate::scenario::{Parcel, UseType};

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Solar irradiance in kWh/m²/day.
    pub irradiance: f64,
    pub panel_efficiency: f64,
    /// System losses (inverter, wiring, soiling).
    pub system_losses: f64,
    /// Share of the roof covered by panels.
    pub roof_coverage: f64,
    pub residential_kwh_per_unit: f64,
    pub non_residential_kwh_per_m2: f64,
    pub battery_efficiency: f64,
    pub depth_of_discharge: f64,
    /// Hours of storage at rated power.
    pub battery_hours: f64,
    pub grid_kg_per_kwh: f64,
    pub solar_kg_per_kwh: f64,
    pub solar_cost_per_kw: f64,
    pub battery_cost_per_kwh: f64,
    pub kg_co2_per_tree_year: f64,
    pub carbon_price_per_kg: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            irradiance: 4.5,
            panel_efficiency: 0.20,
            system_losses: 0.14,
            roof_coverage: 0.7,
            residential_kwh_per_unit: 30.0,
            non_residential_kwh_per_m2: 0.15,
            battery_efficiency: 0.9,
            depth_of_discharge: 0.8,
            battery_hours: 4.0,
            grid_kg_per_kwh: 0.4,
            solar_kg_per_kwh: 0.04,
            solar_cost_per_kw: 2000.0,
            battery_cost_per_kwh: 500.0,
            kg_co2_per_tree_year: 22.0,
            carbon_price_per_kg: 0.05,
        }
    }
}

impl EnergyConfig {
    pub fn validate(&self) -> Result<(), PlanningError> {
        for (name, value) in [
            ("panel_efficiency", self.panel_efficiency),
            ("roof_coverage", self.roof_coverage),
            ("battery_efficiency", self.battery_efficiency),
            ("depth_of_discharge", self.depth_of_discharge),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PlanningError::InvalidConfig(format!(
                    "energy {name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.depth_of_discharge <= 0.0 || self.battery_hours <= 0.0 {
            return Err(PlanningError::InvalidConfig(
                "energy depth_of_discharge and battery_hours must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.system_losses) {
            return Err(PlanningError::InvalidConfig(format!(
                "energy system_losses must be within [0, 1), got {}",
                self.system_losses
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Results
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyDemand {
    pub daily_kwh: f64,
    pub annual_kwh: f64,
    pub by_use: BTreeMap<UseType, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SolarGeneration {
    pub roof_area: f64,
    pub panel_area: f64,
    pub capacity_kw: f64,
    pub daily_kwh: f64,
    pub annual_kwh: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StorageSizing {
    pub daily_deficit_kwh: f64,
    pub daily_surplus_kwh: f64,
    pub capacity_kwh: f64,
    pub power_kw: f64,
    pub solar_cost: f64,
    pub battery_cost: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmissionsAnalysis {
    pub baseline_kg: f64,
    pub scenario_kg: f64,
    pub reduction_kg: f64,
    pub reduction_fraction: f64,
    pub reduction_percent: f64,
    pub trees_equivalent: f64,
    pub carbon_offset_value: f64,
}

/// Written to the `energy_analysis` KPI section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyAnalysis {
    pub demand: EnergyDemand,
    pub solar: SolarGeneration,
    pub storage: StorageSizing,
    /// Solar generation over demand, capped at 1.
    pub renewable_ratio: f64,
    /// Solar delivered through storage over demand, capped at 1.
    pub self_sufficiency: f64,
    pub emissions: EmissionsAnalysis,
}

impl KpiSection for EnergyAnalysis {
    const KEY: &'static str = "energy_analysis";
}

// =============================================================================
// Model
// =============================================================================

pub fn daily_demand(parcels: &[Parcel], config: &EnergyConfig) -> EnergyDemand {
    let mut by_use: BTreeMap<UseType, f64> = BTreeMap::new();
    for capacity in parcels.iter().filter_map(|p| p.capacity.as_ref()) {
        *by_use.entry(UseType::Residential).or_insert(0.0) +=
            capacity.units as f64 * config.residential_kwh_per_unit;
        for (use_type, floor_area) in &capacity.floor_area_by_use {
            if !use_type.is_residential() {
                *by_use.entry(*use_type).or_insert(0.0) +=
                    floor_area * config.non_residential_kwh_per_m2;
            }
        }
    }
    let daily_kwh: f64 = by_use.values().sum();
    EnergyDemand {
        daily_kwh,
        annual_kwh: daily_kwh * 365.0,
        by_use,
    }
}

pub fn solar_generation(parcels: &[Parcel], config: &EnergyConfig) -> SolarGeneration {
    let roof_area: f64 = parcels
        .iter()
        .filter(|p| p.capacity.is_some())
        .map(Parcel::footprint)
        .sum();
    let panel_area = roof_area * config.roof_coverage;
    let daily_kwh =
        panel_area * config.irradiance * config.panel_efficiency * (1.0 - config.system_losses);
    // System size is the daily yield over irradiance and panel efficiency.
    SolarGeneration {
        roof_area,
        panel_area,
        capacity_kw: panel_area * (1.0 - config.system_losses),
        daily_kwh,
        annual_kwh: daily_kwh * 365.0,
    }
}

pub fn size_storage(demand_kwh: f64, solar: &SolarGeneration, config: &EnergyConfig) -> StorageSizing {
    let daily_deficit_kwh = (demand_kwh - solar.daily_kwh).max(0.0);
    let daily_surplus_kwh = (solar.daily_kwh - demand_kwh).max(0.0);
    let capacity_kwh = daily_deficit_kwh / config.depth_of_discharge;
    let solar_cost = solar.capacity_kw * config.solar_cost_per_kw;
    let battery_cost = capacity_kwh * config.battery_cost_per_kwh;
    StorageSizing {
        daily_deficit_kwh,
        daily_surplus_kwh,
        capacity_kwh,
        power_kw: capacity_kwh / config.battery_hours,
        solar_cost,
        battery_cost,
        total_cost: solar_cost + battery_cost,
    }
}

pub fn emissions(annual_demand: f64, annual_solar: f64, config: &EnergyConfig) -> EmissionsAnalysis {
    let baseline_kg = annual_demand * config.grid_kg_per_kwh;
    let displaced = annual_solar.min(annual_demand);
    let scenario_kg =
        (annual_demand - displaced) * config.grid_kg_per_kwh + annual_solar * config.solar_kg_per_kwh;
    let reduction_kg = baseline_kg - scenario_kg;
    let reduction_fraction = if baseline_kg > 0.0 {
        reduction_kg / baseline_kg
    } else {
        0.0
    };
    EmissionsAnalysis {
        baseline_kg,
        scenario_kg,
        reduction_kg,
        reduction_fraction,
        reduction_percent: reduction_fraction * 100.0,
        trees_equivalent: (reduction_kg / config.kg_co2_per_tree_year).max(0.0),
        carbon_offset_value: (reduction_kg * config.carbon_price_per_kg).max(0.0),
    }
}

pub struct EnergyModel<'a> {
    config: &'a EnergyConfig,
}

impl<'a> EnergyModel<'a> {
    pub fn new(config: &'a EnergyConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, parcels: &[Parcel]) -> Result<EnergyAnalysis, PlanningError> {
        if parcels.is_empty() {
            return Err(PlanningError::NotFound("parcels".into()));
        }
        let analysis = self.estimate(parcels);

        info!(
            "energy: demand {:.0} kWh/day, solar {:.0} kWh/day ({:.0} kWp), self-sufficiency {:.2}",
            analysis.demand.daily_kwh,
            analysis.solar.daily_kwh,
            analysis.solar.capacity_kw,
            analysis.self_sufficiency
        );
        Ok(analysis)
    }

    /// The analysis without input checks or logging, for repeated
    /// evaluation by the optimizer.
    pub fn estimate(&self, parcels: &[Parcel]) -> EnergyAnalysis {
        let config = self.config;
        let demand = daily_demand(parcels, config);
        let solar = solar_generation(parcels, config);
        let storage = size_storage(demand.daily_kwh, &solar, config);

        let (renewable_ratio, self_sufficiency) = if demand.daily_kwh > 0.0 {
            (
                (solar.daily_kwh / demand.daily_kwh).min(1.0),
                (solar.daily_kwh * config.battery_efficiency / demand.daily_kwh).min(1.0),
            )
        } else {
            (0.0, 0.0)
        };

        EnergyAnalysis {
            emissions: emissions(demand.annual_kwh, solar.annual_kwh, config),
            demand,
            solar,
            storage,
            renewable_ratio,
            self_sufficiency,
        }
    }
}

// =============================================================================
// Unit tests
// =============================================================================
