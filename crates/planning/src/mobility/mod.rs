//! Mobility model: trips, mode split, VMT, and access to amenities.
//!
//! ## Pipeline
//!
//! | Step             | Output                                                  |
//! |------------------|---------------------------------------------------------|
//! | Trip generation  | population x 3.5 trips, split by purpose                |
//! | Mode choice      | walk/bike/transit/car shares, each above its floor      |
//! | VMT              | daily/annual/per-capita miles, plus a mode-shift case   |
//! | 15-minute access | % of population within 1.2 km of each amenity type      |
//! | LOS              | walk and bike scores with A-F grades                    |
//!
//! Parcels without capacity count as zero population. Without parcels or
//! amenities the amenity distance defaults to 1 000 m, which scores a walk
//! LOS of 0.

use bevy::log::info;
use serde::{Deserialize, Serialize};

pub mod access;
pub mod config;
pub mod los;
pub mod mode_choice;
pub mod trips;
pub mod vmt;


pub use access::{
    accessibility_metrics, avg_nearest_distance, fifteen_minute_access, AccessibilityMetrics,
    AmenityTypeAccess, FifteenMinuteAccess,
};
pub use config::{Elasticities, MobilityConfig, ModeShiftCaps};
pub use los::{bike_los, walk_los, BikeLos, LosGrade, WalkLos};
pub use mode_choice::{normalize_with_floors, raw_scores, Mode, ModeChoiceInputs, ModeShares};
pub use trips::{generate_trips, PurposeShares, TripGeneration};
pub use vmt::{mode_shift, vmt_analysis, ModeShiftScenario, VmtAnalysis};

use crate::error::PlanningError;
use crate::kpi::KpiSection;
use crate::scenario::{Amenity, Link, LinkClass, Parcel};

/// Everything the mobility model produces, written to the
/// `mobility_analysis` KPI section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MobilityAnalysis {
    pub trips: TripGeneration,
    pub mode_shares: ModeShares,
    pub vmt: VmtAnalysis,
    pub fifteen_minute: FifteenMinuteAccess,
    pub walk_los: WalkLos,
    pub bike_los: BikeLos,
    pub accessibility: AccessibilityMetrics,
}

impl KpiSection for MobilityAnalysis {
    const KEY: &'static str = "mobility_analysis";
}

pub struct MobilityModel<'a> {
    config: &'a MobilityConfig,
}

impl<'a> MobilityModel<'a> {
    pub fn new(config: &'a MobilityConfig) -> Self {
        Self { config }
    }

    pub fn analyze(
        &self,
        parcels: &[Parcel],
        links: &[Link],
        amenities: &[Amenity],
    ) -> Result<MobilityAnalysis, PlanningError> {
        if links.is_empty() {
            return Err(PlanningError::NotFound("links".into()));
        }
        let config = self.config;

        let population: f64 = parcels.iter().map(Parcel::population).sum();
        let total_length: f64 = links.iter().map(Link::length).sum();
        let avg_link_length = total_length / links.len() as f64;
        let bike_length: f64 = links
            .iter()
            .filter(|l| l.properties.bike_lane)
            .map(Link::length)
            .sum();
        let major_length: f64 = links
            .iter()
            .filter(|l| l.class.is_major())
            .map(Link::length)
            .sum();
        let local_length: f64 = links
            .iter()
            .filter(|l| l.class == LinkClass::Local)
            .map(Link::length)
            .sum();

        let trips = generate_trips(population, config.trips_per_person, &config.purpose_shares);

        let avg_distance =
            avg_nearest_distance(parcels, amenities, config.default_amenity_distance);
        let bike = bike_los(bike_length, total_length);
        let inputs = ModeChoiceInputs {
            avg_amenity_distance: avg_distance,
            bike_coverage: bike.factors.coverage,
            major_link_count: links.iter().filter(|l| l.class.is_major()).count(),
            parcel_count: parcels.len(),
            kerb_parking: local_length * config.parking_per_metre,
            population,
        };
        let mode_shares = normalize_with_floors(
            raw_scores(&inputs, &config.elasticities),
            config.share_floors,
        );

        let vmt = vmt_analysis(
            trips.total_daily_trips,
            &mode_shares,
            avg_link_length,
            population,
            config.metres_per_mile,
            &config.mode_shift,
        );

        let accessibility = accessibility_metrics(
            parcels,
            amenities,
            total_length,
            links.len(),
            config.walk_radius,
            config.default_amenity_distance,
        );
        let sidewalk_coverage = if total_length > 0.0 {
            major_length / total_length
        } else {
            0.0
        };

        let analysis = MobilityAnalysis {
            trips,
            mode_shares,
            vmt,
            fifteen_minute: fifteen_minute_access(parcels, amenities, config.walk_radius),
            walk_los: walk_los(avg_distance, accessibility.amenity_density, sidewalk_coverage),
            bike_los: bike,
            accessibility,
        };

        info!(
            "mobility: {:.0} daily trips, car share {:.2}, walk LOS {}, bike LOS {}",
            analysis.trips.total_daily_trips,
            analysis.mode_shares.car,
            analysis.walk_los.grade.letter(),
            analysis.bike_los.grade.letter()
        );
        Ok(analysis)
    }
}
