use bevy::log::{debug, warn};
use geo::{Area, MultiPolygon, Polygon};

use super::config::SubdivisionConfig;
use crate::geometry::{difference, link_corridor, split_in_half, union_all};
use crate::scenario::Link;

/// Cut the boundary into fragments, either along road corridors or by
/// recursive bisection, then keep the fragments inside the area band.
pub fn irregular_parcels(
    boundary: &Polygon<f64>,
    links: &[Link],
    config: &SubdivisionConfig,
) -> Vec<Polygon<f64>> {
    let candidates = if links.is_empty() {
        bisect(boundary, config)
    } else {
        split_by_roads(boundary, links, config)
    };

    let (min_area, max_area) = (config.min_area(), config.max_area());
    candidates
        .into_iter()
        .filter(|p| {
            let area = p.unsigned_area();
            area >= min_area && area <= max_area
        })
        .collect()
}

/// Subtract the buffered street corridors from the boundary.
fn split_by_roads(
    boundary: &Polygon<f64>,
    links: &[Link],
    config: &SubdivisionConfig,
) -> Vec<Polygon<f64>> {
    let corridors: Vec<Polygon<f64>> = links
        .iter()
        .flat_map(|link| {
            link.geometry
                .lines()
                .filter_map(|segment| link_corridor(segment.start, segment.end, config.road_buffer))
                .collect::<Vec<_>>()
        })
        .collect();

    if corridors.is_empty() {
        return vec![boundary.clone()];
    }

    let right_of_way = union_all(corridors);
    let site = MultiPolygon::new(vec![boundary.clone()]);
    match difference(&site, &right_of_way) {
        Some(fragments) => {
            debug!(
                "subdivision: {} links cut the site into {} fragments",
                links.len(),
                fragments.0.len()
            );
            fragments.0
        }
        None => vec![boundary.clone()],
    }
}

/// Recursive halving along the longer bounding-box axis, driven by an
/// explicit work stack.
fn bisect(boundary: &Polygon<f64>, config: &SubdivisionConfig) -> Vec<Polygon<f64>> {
    let stop_area = config.target_area * 0.5;
    let continue_area = config.target_area * config.continue_ratio;

    let mut emitted = Vec::new();
    let mut stack: Vec<(Polygon<f64>, u32)> = vec![(boundary.clone(), 0)];

    while let Some((polygon, depth)) = stack.pop() {
        if depth > config.max_depth || polygon.unsigned_area() < stop_area {
            emitted.push(polygon);
            continue;
        }

        let Some(parts) = split_in_half(&polygon) else {
            warn!("subdivision: bisection failed at depth {depth}, keeping polygon unsplit");
            emitted.push(polygon);
            continue;
        };

        for part in parts {
            if part.unsigned_area() > continue_area {
                stack.push((part, depth + 1));
            } else {
                emitted.push(part);
            }
        }
    }
    emitted
}
