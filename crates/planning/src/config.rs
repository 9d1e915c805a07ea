//! Configuration for every analysis stage.
//!
//! `PlanningConfig` is built once (from defaults or JSON), validated, and
//! then only ever borrowed: each engine takes `&` to its own section at
//! construction. Missing JSON fields fall back to their defaults.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::budget::BudgetConfig;
use crate::capacity::CapacityConfig;
use crate::energy::EnergyConfig;
use crate::error::PlanningError;
use crate::mobility::MobilityConfig;
use crate::network::NetworkConfig;
use crate::optimizer::OptimizerConfig;
use crate::subdivision::SubdivisionConfig;
use crate::sustainability::SustainabilityConfig;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    pub subdivision: SubdivisionConfig,
    pub capacity: CapacityConfig,
    pub network: NetworkConfig,
    pub mobility: MobilityConfig,
    pub energy: EnergyConfig,
    pub budget: BudgetConfig,
    pub sustainability: SustainabilityConfig,
    pub optimizer: OptimizerConfig,
}

impl PlanningConfig {
    pub fn validate(&self) -> Result<(), PlanningError> {
        self.subdivision.validate()?;
        self.capacity.validate()?;
        self.network.validate()?;
        self.mobility.validate()?;
        self.energy.validate()?;
        self.budget.validate()?;
        self.sustainability.validate()?;
        self.optimizer.validate()?;
        Ok(())
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, PlanningError> {
        let config: PlanningConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// The configuration used by `PlanningPlugin` systems.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlanningSettings(pub PlanningConfig);
