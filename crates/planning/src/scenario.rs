//! Scenario data model: site boundary, street links, parcels, amenities.
//!
//! All coordinates are planar and measured in metres. A `Scenario` is the
//! unit of analysis; it owns its inputs and the `KpiDocument` that stages
//! write their results into.

use std::collections::BTreeMap;

use bevy::prelude::*;
use geo::{Area, EuclideanLength, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::kpi::KpiDocument;

// =============================================================================
// Land use
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseType {
    Residential,
    Commercial,
    Industrial,
    Institutional,
    MixedUse,
}

impl UseType {
    pub const ALL: [UseType; 5] = [
        UseType::Residential,
        UseType::Commercial,
        UseType::Industrial,
        UseType::Institutional,
        UseType::MixedUse,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UseType::Residential => "residential",
            UseType::Commercial => "commercial",
            UseType::Industrial => "industrial",
            UseType::Institutional => "institutional",
            UseType::MixedUse => "mixed_use",
        }
    }

    pub fn is_residential(self) -> bool {
        self == UseType::Residential
    }
}

/// Share of a parcel's floor area given to each use.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UseMix(pub BTreeMap<UseType, f64>);

impl UseMix {
    pub fn new(entries: &[(UseType, f64)]) -> Self {
        Self(entries.iter().copied().collect())
    }

    pub fn fraction(&self, use_type: UseType) -> f64 {
        self.0.get(&use_type).copied().unwrap_or(0.0)
    }

    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    /// Total share of every use other than residential.
    pub fn non_residential(&self) -> f64 {
        self.0
            .iter()
            .filter(|(use_type, _)| !use_type.is_residential())
            .map(|(_, share)| share)
            .sum()
    }

    /// Number of uses with a positive share.
    pub fn active_uses(&self) -> usize {
        self.0.values().filter(|share| **share > 0.0).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UseType, f64)> + '_ {
        self.0.iter().map(|(use_type, share)| (*use_type, *share))
    }
}

// =============================================================================
// Zoning
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Setbacks {
    pub front: f64,
    pub side: f64,
    pub rear: f64,
}

impl Default for Setbacks {
    fn default() -> Self {
        Self {
            front: 3.0,
            side: 1.5,
            rear: 3.0,
        }
    }
}

/// Development controls attached to a parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoningProperties {
    pub use_mix: UseMix,
    /// Floor area ratio: gross floor area over parcel area.
    pub far: f64,
    /// Maximum building height in metres.
    pub height: f64,
    /// Share of the parcel covered by the building footprint.
    pub lot_coverage: f64,
    pub setbacks: Setbacks,
    /// Share of residential units reserved as affordable (0.15 = 15%).
    pub inclusionary: f64,
    /// Parking spaces per dwelling unit.
    pub parking_ratio: f64,
    pub phase: u32,
    pub ground_floor_activation: bool,
    /// Share of the roof given to a green roof.
    pub green_roof: f64,
}

impl Default for ZoningProperties {
    fn default() -> Self {
        Self {
            use_mix: UseMix::new(&[
                (UseType::Residential, 0.7),
                (UseType::Commercial, 0.2),
                (UseType::Institutional, 0.1),
            ]),
            far: 2.0,
            height: 15.0,
            lot_coverage: 0.6,
            setbacks: Setbacks::default(),
            inclusionary: 0.15,
            parking_ratio: 1.5,
            phase: 1,
            ground_floor_activation: true,
            green_roof: 0.0,
        }
    }
}

// =============================================================================
// Parcels
// =============================================================================

/// Build-out derived from a parcel's zoning.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Capacity {
    pub floor_area: f64,
    pub residential_floor_area: f64,
    pub units: u32,
    pub affordable_units: u32,
    pub population: f64,
    pub jobs: u32,
    pub parking_spaces: f64,
    pub floors: u32,
    pub floor_area_by_use: BTreeMap<UseType, f64>,
    pub jobs_by_use: BTreeMap<UseType, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: u32,
    pub geometry: Polygon<f64>,
    #[serde(default)]
    pub zoning: ZoningProperties,
    #[serde(default)]
    pub capacity: Option<Capacity>,
}

impl Parcel {
    pub fn new(id: u32, geometry: Polygon<f64>, zoning: ZoningProperties) -> Self {
        Self {
            id,
            geometry,
            zoning,
            capacity: None,
        }
    }

    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }

    /// Ground area covered by the building.
    pub fn footprint(&self) -> f64 {
        self.area() * self.zoning.lot_coverage
    }

    pub fn perimeter(&self) -> f64 {
        self.geometry.exterior().euclidean_length()
    }

    pub fn population(&self) -> f64 {
        self.capacity.as_ref().map_or(0.0, |c| c.population)
    }
}

// =============================================================================
// Street network
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkClass {
    Arterial,
    Collector,
    Local,
}

impl LinkClass {
    pub const ALL: [LinkClass; 3] = [LinkClass::Arterial, LinkClass::Collector, LinkClass::Local];

    /// Arterials and collectors carry sidewalks and transit.
    pub fn is_major(self) -> bool {
        matches!(self, LinkClass::Arterial | LinkClass::Collector)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkProperties {
    /// Explicit length; falls back to the geometric length when absent.
    pub length: Option<f64>,
    pub lanes: u32,
    pub speed_limit: f64,
    pub bike_lane: bool,
}

impl Default for LinkProperties {
    fn default() -> Self {
        Self {
            length: None,
            lanes: 1,
            speed_limit: 30.0,
            bike_lane: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: u32,
    pub geometry: LineString<f64>,
    pub class: LinkClass,
    #[serde(default)]
    pub properties: LinkProperties,
}

impl Link {
    pub fn new(id: u32, geometry: LineString<f64>, class: LinkClass) -> Self {
        Self {
            id,
            geometry,
            class,
            properties: LinkProperties::default(),
        }
    }

    pub fn with_bike_lane(mut self) -> Self {
        self.properties.bike_lane = true;
        self
    }

    pub fn length(&self) -> f64 {
        self.properties
            .length
            .unwrap_or_else(|| self.geometry.euclidean_length())
    }
}

// =============================================================================
// Amenities and site
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    pub id: u32,
    pub location: Point<f64>,
    /// Free-form type such as `school`, `park` or `clinic`.
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteBoundary {
    pub geometry: Polygon<f64>,
}

/// One development scenario and everything computed about it.
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub id: u32,
    pub name: String,
    pub boundary: Option<SiteBoundary>,
    pub links: Vec<Link>,
    pub parcels: Vec<Parcel>,
    pub amenities: Vec<Amenity>,
    pub kpis: KpiDocument,
}

impl Scenario {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn total_parcel_area(&self) -> f64 {
        self.parcels.iter().map(Parcel::area).sum()
    }
}
