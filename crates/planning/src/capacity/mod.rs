//! Build-out capacity of parcels.
//!
//! ```text
//! floor area   = parcel area x FAR x lot coverage
//! units        = floor(residential floor area / unit size x efficiency)
//! population   = units x household size
//! jobs per use = floor(use floor area / 1000 x job density)
//! ```
//!
//! Zoning is validated first. Problems are collected into a
//! `ZoningValidation` rather than raised; parcels with an issue are skipped,
//! parcels with only warnings are still computed.

pub mod config;
pub mod engine;
pub mod validation;

mod tests;

pub use config::{CapacityConfig, ZoningLimits};
pub use engine::{compute_capacity, CapacityEngine, CapacityOutcome, CapacitySummary};
pub use validation::{validate_parcels, ValidationEntry, ValidationKind, ZoningValidation};
