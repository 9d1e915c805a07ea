//! Parcel-to-amenity proximity: nearest distances, 15-minute coverage and
//! the composite accessibility score.

use std::collections::{BTreeMap, BTreeSet};

use geo::{Centroid, Coord};
use serde::{Deserialize, Serialize};

use crate::scenario::{Amenity, Parcel};
use crate::spatial_index::PointIndex;

/// Share of the population that can walk to each amenity type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FifteenMinuteAccess {
    pub walk_radius: f64,
    /// Percent of population (0..100) with the type within the radius.
    pub by_type: BTreeMap<String, f64>,
    /// Mean of the per-type percentages.
    pub overall_score: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AmenityTypeAccess {
    pub count: usize,
    pub avg_distance: f64,
    pub accessible_population: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccessibilityMetrics {
    pub avg_distance_to_amenity: f64,
    /// Amenities per parcel.
    pub amenity_density: f64,
    pub network_length_per_parcel: f64,
    pub links_per_parcel: f64,
    pub by_type: BTreeMap<String, AmenityTypeAccess>,
    /// 0.4 distance + 0.4 density + 0.2 network, in 0..100.
    pub accessibility_score: f64,
}

/// Representative point of a parcel.
pub fn parcel_point(parcel: &Parcel) -> Option<Coord<f64>> {
    parcel
        .geometry
        .centroid()
        .map(|p| p.0)
        .or_else(|| parcel.geometry.exterior().0.first().copied())
}

fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

fn nearest<'a>(from: Coord<f64>, amenities: impl Iterator<Item = &'a Amenity>) -> Option<f64> {
    amenities
        .map(|a| distance(from, a.location.0))
        .min_by(f64::total_cmp)
}

/// Mean distance from each parcel to its nearest amenity, or `default` when
/// either side is empty.
pub fn avg_nearest_distance(parcels: &[Parcel], amenities: &[Amenity], default: f64) -> f64 {
    if parcels.is_empty() || amenities.is_empty() {
        return default;
    }
    let distances: Vec<f64> = parcels
        .iter()
        .filter_map(parcel_point)
        .filter_map(|p| nearest(p, amenities.iter()))
        .collect();
    if distances.is_empty() {
        default
    } else {
        distances.iter().sum::<f64>() / distances.len() as f64
    }
}

pub fn fifteen_minute_access(
    parcels: &[Parcel],
    amenities: &[Amenity],
    walk_radius: f64,
) -> FifteenMinuteAccess {
    let kinds: BTreeSet<&str> = amenities.iter().map(|a| a.kind.as_str()).collect();
    let mut result = FifteenMinuteAccess {
        walk_radius,
        ..Default::default()
    };
    if parcels.is_empty() || kinds.is_empty() {
        return result;
    }

    let mut index = PointIndex::new(walk_radius);
    for (i, amenity) in amenities.iter().enumerate() {
        index.insert(i, amenity.location.0);
    }

    let weights: Vec<f64> = parcels.iter().map(Parcel::population).collect();
    let total_weight: f64 = weights.iter().sum();
    let mut covered: BTreeMap<&str, f64> = kinds.iter().map(|k| (*k, 0.0)).collect();

    for (parcel, weight) in parcels.iter().zip(&weights) {
        let Some(point) = parcel_point(parcel) else {
            continue;
        };
        let reachable: BTreeSet<&str> = index
            .query_radius(point, walk_radius)
            .into_iter()
            .map(|(i, _)| amenities[i].kind.as_str())
            .collect();
        for kind in reachable {
            if let Some(c) = covered.get_mut(kind) {
                *c += weight;
            }
        }
    }

    for (kind, weight) in covered {
        let percent = if total_weight > 0.0 {
            weight / total_weight * 100.0
        } else {
            0.0
        };
        result.by_type.insert(kind.to_string(), percent);
    }
    result.overall_score = result.by_type.values().sum::<f64>() / result.by_type.len() as f64;
    result
}

pub fn accessibility_metrics(
    parcels: &[Parcel],
    amenities: &[Amenity],
    network_length: f64,
    link_count: usize,
    walk_radius: f64,
    default_distance: f64,
) -> AccessibilityMetrics {
    let avg_distance = avg_nearest_distance(parcels, amenities, default_distance);
    let parcel_count = parcels.len();
    let per_parcel = |value: f64| {
        if parcel_count == 0 {
            0.0
        } else {
            value / parcel_count as f64
        }
    };

    let amenity_density = per_parcel(amenities.len() as f64);
    let network_length_per_parcel = per_parcel(network_length);

    let points: Vec<(Coord<f64>, f64)> = parcels
        .iter()
        .filter_map(|p| parcel_point(p).map(|pt| (pt, p.population())))
        .collect();

    let mut by_type: BTreeMap<String, AmenityTypeAccess> = BTreeMap::new();
    let kinds: BTreeSet<&str> = amenities.iter().map(|a| a.kind.as_str()).collect();
    for kind in kinds {
        let of_kind = || amenities.iter().filter(move |a| a.kind == kind);
        let distances: Vec<(f64, f64)> = points
            .iter()
            .filter_map(|(pt, pop)| nearest(*pt, of_kind()).map(|d| (d, *pop)))
            .collect();
        let avg = if distances.is_empty() {
            default_distance
        } else {
            distances.iter().map(|(d, _)| d).sum::<f64>() / distances.len() as f64
        };
        by_type.insert(
            kind.to_string(),
            AmenityTypeAccess {
                count: of_kind().count(),
                avg_distance: avg,
                accessible_population: distances
                    .iter()
                    .filter(|(d, _)| *d <= walk_radius)
                    .map(|(_, pop)| pop)
                    .sum(),
            },
        );
    }

    let distance_score = (100.0 - avg_distance / 10.0).max(0.0);
    let density_score = (amenity_density * 100.0).min(100.0);
    let network_score = (network_length_per_parcel / 10.0).min(100.0);
    let score = 0.4 * distance_score + 0.4 * density_score + 0.2 * network_score;

    AccessibilityMetrics {
        avg_distance_to_amenity: avg_distance,
        amenity_density,
        network_length_per_parcel,
        links_per_parcel: per_parcel(link_count as f64),
        by_type,
        accessibility_score: score.clamp(0.0, 100.0),
    }
}
