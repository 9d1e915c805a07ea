use serde::{Deserialize, Serialize};

use super::config::ZoningLimits;
use crate::kpi::KpiSection;
use crate::scenario::Parcel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    UseMixSum,
    NegativeFar,
    HighFar,
    HighCoverage,
    SmallArea,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationEntry {
    pub parcel_id: u32,
    pub kind: ValidationKind,
    pub message: String,
}

/// Collected zoning problems. Issues block the capacity calculation for
/// their parcel; warnings are informational.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoningValidation {
    pub issues: Vec<ValidationEntry>,
    pub warnings: Vec<ValidationEntry>,
}

impl KpiSection for ZoningValidation {
    const KEY: &'static str = "zoning_validation";
}

impl ZoningValidation {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_issue(&self, parcel_id: u32) -> bool {
        self.issues.iter().any(|e| e.parcel_id == parcel_id)
    }

    fn issue(&mut self, parcel_id: u32, kind: ValidationKind, message: String) {
        self.issues.push(ValidationEntry {
            parcel_id,
            kind,
            message,
        });
    }

    fn warning(&mut self, parcel_id: u32, kind: ValidationKind, message: String) {
        self.warnings.push(ValidationEntry {
            parcel_id,
            kind,
            message,
        });
    }
}

pub fn validate_parcels(parcels: &[Parcel], limits: &ZoningLimits) -> ZoningValidation {
    let mut result = ZoningValidation::default();

    for parcel in parcels {
        let zoning = &parcel.zoning;

        let mix_sum = zoning.use_mix.sum();
        if (mix_sum - 1.0).abs() > limits.use_mix_tolerance {
            result.issue(
                parcel.id,
                ValidationKind::UseMixSum,
                format!("use mix sums to {mix_sum:.3}, expected 1.0"),
            );
        }

        if zoning.far < 0.0 {
            result.issue(
                parcel.id,
                ValidationKind::NegativeFar,
                format!("FAR {} is negative", zoning.far),
            );
        } else if zoning.far > limits.max_far {
            result.warning(
                parcel.id,
                ValidationKind::HighFar,
                format!("FAR {} exceeds {}", zoning.far, limits.max_far),
            );
        }

        if zoning.lot_coverage > limits.max_coverage {
            result.warning(
                parcel.id,
                ValidationKind::HighCoverage,
                format!(
                    "lot coverage {:.2} leaves no room for setbacks",
                    zoning.lot_coverage
                ),
            );
        }

        let area = parcel.area();
        if area < limits.min_parcel_area {
            result.issue(
                parcel.id,
                ValidationKind::SmallArea,
                format!(
                    "parcel area {area:.1} m² is below {} m²",
                    limits.min_parcel_area
                ),
            );
        }
    }

    result
}
