use std::panic::{catch_unwind, AssertUnwindSafe};

use bevy::log::warn;
use geo::{coord, Area, BooleanOps, BoundingRect, Coord, LineString, MultiPolygon, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounds of a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        }
    }
}

pub fn bounds(polygon: &Polygon<f64>) -> Option<Bounds> {
    polygon.bounding_rect().map(Bounds::from)
}

pub fn rect_polygon(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon<f64> {
    Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y }).to_polygon()
}

/// Run a geometry operation, converting an abort into `None`.
pub fn guarded<T>(label: &str, op: impl FnOnce() -> T) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(op)) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("geometry: {label} failed on degenerate input, keeping original shape");
            None
        }
    }
}

pub fn intersection(a: &Polygon<f64>, b: &Polygon<f64>) -> Option<MultiPolygon<f64>> {
    guarded("intersection", || a.intersection(b))
}

pub fn difference(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Option<MultiPolygon<f64>> {
    guarded("difference", || a.difference(b))
}

/// Union a set of polygons pairwise. Parts whose union fails are skipped.
pub fn union_all(polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    let mut acc = MultiPolygon::new(Vec::new());
    for polygon in polygons {
        let next = MultiPolygon::new(vec![polygon]);
        if acc.0.is_empty() {
            acc = next;
            continue;
        }
        if let Some(merged) = guarded("union", || acc.union(&next)) {
            acc = merged;
        }
    }
    acc
}

/// Square-capped corridor around the segment `a`-`b`, extending
/// `half_width` to each side and past each end.
pub fn link_corridor(a: Coord<f64>, b: Coord<f64>, half_width: f64) -> Option<Polygon<f64>> {
    if half_width <= 0.0 {
        return None;
    }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if !len.is_finite() {
        return None;
    }
    if len < f64::EPSILON {
        return Some(rect_polygon(
            a.x - half_width,
            a.y - half_width,
            a.x + half_width,
            a.y + half_width,
        ));
    }

    let (ux, uy) = (dx / len * half_width, dy / len * half_width);
    // Normal to the segment, scaled to the half width.
    let (nx, ny) = (-uy, ux);
    let start = coord! { x: a.x - ux, y: a.y - uy };
    let end = coord! { x: b.x + ux, y: b.y + uy };

    Some(Polygon::new(
        LineString::from(vec![
            coord! { x: start.x + nx, y: start.y + ny },
            coord! { x: end.x + nx, y: end.y + ny },
            coord! { x: end.x - nx, y: end.y - ny },
            coord! { x: start.x - nx, y: start.y - ny },
        ]),
        Vec::new(),
    ))
}

/// Bisect a polygon across the longer side of its bounding box. Squares are
/// cut horizontally.
///
/// Returns `None` when the cut fails or does not produce at least two
/// non-empty parts.
pub fn split_in_half(polygon: &Polygon<f64>) -> Option<Vec<Polygon<f64>>> {
    let b = bounds(polygon)?;
    let (first, second) = if b.width() > b.height() {
        let mid = b.min_x + b.width() / 2.0;
        (
            rect_polygon(b.min_x, b.min_y, mid, b.max_y),
            rect_polygon(mid, b.min_y, b.max_x, b.max_y),
        )
    } else {
        let mid = b.min_y + b.height() / 2.0;
        (
            rect_polygon(b.min_x, b.min_y, b.max_x, mid),
            rect_polygon(b.min_x, mid, b.max_x, b.max_y),
        )
    };

    let mut parts: Vec<Polygon<f64>> = Vec::new();
    for half in [first, second] {
        let clipped = intersection(polygon, &half)?;
        parts.extend(
            clipped
                .0
                .into_iter()
                .filter(|part| part.unsigned_area() > f64::EPSILON),
        );
    }

    if parts.len() < 2 {
        None
    } else {
        Some(parts)
    }
}
