// ---------------------------------------------------------------------------
// PlanningError: typed failures for the analysis stages
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors a stage can return instead of a result.
///
/// Validation problems on individual parcels are not errors; they are
/// collected into `ZoningValidation`. Geometry failures inside subdivision are
/// recovered locally and never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanningError {
    /// A required input is missing (no parcels, no links, no boundary).
    NotFound(String),
    /// The top-level geometry cannot be worked with (degenerate boundary).
    InvalidGeometry(String),
    /// A configuration value is out of range (weights not summing to 1, ...).
    InvalidConfig(String),
    /// A KPI merge was attempted against an outdated section revision.
    StaleRevision {
        key: String,
        expected: u64,
        found: u64,
    },
    /// A KPI snapshot could not be decoded.
    Snapshot(String),
    /// JSON (de)serialization of a KPI section failed.
    Serialization(String),
}

impl PlanningError {
    /// Short machine-readable kind, used in stage reports.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanningError::NotFound(_) => "not_found",
            PlanningError::InvalidGeometry(_) => "invalid_geometry",
            PlanningError::InvalidConfig(_) => "invalid_config",
            PlanningError::StaleRevision { .. } => "stale_revision",
            PlanningError::Snapshot(_) => "snapshot",
            PlanningError::Serialization(_) => "serialization",
        }
    }
}

impl fmt::Display for PlanningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningError::NotFound(what) => write!(f, "No {what} found"),
            PlanningError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {msg}"),
            PlanningError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            PlanningError::StaleRevision {
                key,
                expected,
                found,
            } => write!(
                f,
                "Stale KPI revision for '{key}': expected r{expected}, document is at r{found}"
            ),
            PlanningError::Snapshot(msg) => write!(f, "Snapshot error: {msg}"),
            PlanningError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for PlanningError {}

impl From<serde_json::Error> for PlanningError {
    fn from(e: serde_json::Error) -> Self {
        PlanningError::Serialization(e.to_string())
    }
}

impl From<bitcode::Error> for PlanningError {
    fn from(e: bitcode::Error) -> Self {
        PlanningError::Snapshot(e.to_string())
    }
}
