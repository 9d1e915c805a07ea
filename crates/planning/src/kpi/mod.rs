//! Per-scenario KPI document.
//!
//! Every analysis stage writes exactly one typed section (its `KEY`), and
//! reads the sections written before it. The document never merges inside a
//! section: a new result replaces the previous payload wholesale and bumps
//! that key's revision, leaving every other key untouched.
//!
//! | Key                    | Written by          |
//! |------------------------|---------------------|
//! | `parcelization`        | subdivision         |
//! | `zoning_validation`    | capacity            |
//! | `capacity`             | capacity            |
//! | `network_analysis`     | network             |
//! | `mobility_analysis`    | mobility            |
//! | `energy_analysis`      | energy              |
//! | `budget_analysis`      | budget              |
//! | `sustainability_score` | sustainability      |
//! | `optimization_results` | optimizer           |
//!
//! Writers that share a document outside `&mut` access use
//! [`KpiDocument::merge_expecting`], which rejects a write made against an
//! outdated revision.

pub mod document;
pub mod snapshot;

mod tests;

pub use document::{KpiDocument, KpiEntry, KpiSection};
pub use snapshot::{SNAPSHOT_FORMAT_VERSION, SNAPSHOT_HEADER_SIZE, SNAPSHOT_MAGIC};
