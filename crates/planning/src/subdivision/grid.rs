use geo::{Area, Polygon};

use super::config::SubdivisionConfig;
use crate::geometry::{bounds, intersection, rect_polygon};

/// Upper bound on lattice cells; keeps a tiny target on a huge site from
/// allocating without limit.
pub const MAX_GRID_CELLS: usize = 1_000_000;

/// Lay a rectangular lattice over the boundary and keep the clipped pieces
/// that are large enough.
pub fn grid_parcels(boundary: &Polygon<f64>, config: &SubdivisionConfig) -> Vec<Polygon<f64>> {
    let Some(b) = bounds(boundary) else {
        return Vec::new();
    };

    let width = config.cell_width();
    let height = config.target_area / width;
    let cols = (b.width() / width).ceil().max(1.0) as usize;
    let rows = (b.height() / height).ceil().max(1.0) as usize;
    let keep_area = config.target_area * config.grid_keep_ratio;

    if cols.saturating_mul(rows) > MAX_GRID_CELLS {
        bevy::log::warn!(
            "subdivision: grid of {}x{} cells exceeds limit, no parcels generated",
            cols,
            rows
        );
        return Vec::new();
    }

    let mut parcels = Vec::new();
    for row in 0..rows {
        let y0 = b.min_y + row as f64 * height;
        for col in 0..cols {
            let x0 = b.min_x + col as f64 * width;
            let cell = rect_polygon(x0, y0, x0 + width, y0 + height);
            // A failed clip drops only this cell.
            let Some(pieces) = intersection(boundary, &cell) else {
                continue;
            };
            parcels.extend(
                pieces
                    .0
                    .into_iter()
                    .filter(|piece| piece.unsigned_area() >= keep_area),
            );
        }
    }
    parcels
}
