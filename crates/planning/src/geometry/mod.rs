//! Planar polygon helpers shared by the subdivider and the analyzers.
//!
//! Boolean operations on degenerate input can abort inside the clipping
//! library. `guarded` turns such an abort into `None` so callers can fall back
//! to the unsplit polygon instead of failing the whole stage.

pub mod ops;
pub mod validation;

mod tests;

pub use ops::{
    bounds, difference, guarded, intersection, link_corridor, rect_polygon, split_in_half,
    union_all, Bounds,
};
pub use validation::{ensure_valid, validate_polygon, GeometryReport};
