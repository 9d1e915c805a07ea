use geo::{Area, Coord, Intersects, Line, Polygon};
use serde::{Deserialize, Serialize};

use super::ops::{bounds, Bounds};
use crate::error::PlanningError;

/// Validity, area and extent of a polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryReport {
    pub valid: bool,
    pub area: f64,
    pub bounds: Option<Bounds>,
    pub problems: Vec<String>,
}

/// Distinct consecutive ring vertices, without the closing coordinate.
fn ring_vertices(polygon: &Polygon<f64>) -> Vec<Coord<f64>> {
    let mut vertices: Vec<Coord<f64>> = Vec::new();
    for c in polygon.exterior().coords() {
        if vertices.last() != Some(c) {
            vertices.push(*c);
        }
    }
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    vertices
}

fn self_intersects(vertices: &[Coord<f64>]) -> bool {
    let n = vertices.len();
    if n < 4 {
        return false;
    }
    let edges: Vec<Line<f64>> = (0..n)
        .map(|i| Line::new(vertices[i], vertices[(i + 1) % n]))
        .collect();
    for i in 0..n {
        for j in (i + 2)..n {
            // First and last edges share the closing vertex.
            if i == 0 && j == n - 1 {
                continue;
            }
            if edges[i].intersects(&edges[j]) {
                return true;
            }
        }
    }
    false
}

pub fn validate_polygon(polygon: &Polygon<f64>) -> GeometryReport {
    let mut problems = Vec::new();
    let vertices = ring_vertices(polygon);

    if vertices.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        problems.push("non-finite coordinate".to_string());
    }
    if vertices.len() < 3 {
        problems.push(format!(
            "ring has {} distinct vertices, need at least 3",
            vertices.len()
        ));
    }

    let usable = problems.is_empty();
    let area = if usable {
        polygon.unsigned_area()
    } else {
        0.0
    };
    if usable && area <= f64::EPSILON {
        problems.push("zero area".to_string());
    }
    if usable && self_intersects(&vertices) {
        problems.push("ring self-intersects".to_string());
    }

    GeometryReport {
        valid: problems.is_empty(),
        area,
        bounds: bounds(polygon),
        problems,
    }
}

/// Reject geometry that no stage can work with.
pub fn ensure_valid(polygon: &Polygon<f64>) -> Result<GeometryReport, PlanningError> {
    let report = validate_polygon(polygon);
    if report.valid {
        Ok(report)
    } else {
        Err(PlanningError::InvalidGeometry(report.problems.join("; ")))
    }
}
