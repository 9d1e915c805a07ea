use serde::{Deserialize, Serialize};

use crate::scenario::Parcel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockSizeDistribution {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
}

/// Area statistics of the parcels, treated as urban blocks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockStats {
    pub count: usize,
    pub total_area: f64,
    pub mean_area: f64,
    pub median_area: f64,
    pub min_area: f64,
    pub max_area: f64,
    pub mean_perimeter: f64,
    pub size_distribution: BlockSizeDistribution,
}

pub fn block_stats(parcels: &[Parcel], small_below: f64, medium_below: f64) -> Option<BlockStats> {
    if parcels.is_empty() {
        return None;
    }

    let mut areas: Vec<f64> = parcels.iter().map(Parcel::area).collect();
    areas.sort_by(f64::total_cmp);
    let count = areas.len();
    let total_area: f64 = areas.iter().sum();
    let median_area = if count % 2 == 0 {
        (areas[count / 2 - 1] + areas[count / 2]) / 2.0
    } else {
        areas[count / 2]
    };

    let mut size_distribution = BlockSizeDistribution::default();
    for &area in &areas {
        if area < small_below {
            size_distribution.small += 1;
        } else if area < medium_below {
            size_distribution.medium += 1;
        } else {
            size_distribution.large += 1;
        }
    }

    Some(BlockStats {
        count,
        total_area,
        mean_area: total_area / count as f64,
        median_area,
        min_area: areas[0],
        max_area: areas[count - 1],
        mean_perimeter: parcels.iter().map(Parcel::perimeter).sum::<f64>() / count as f64,
        size_distribution,
    })
}
