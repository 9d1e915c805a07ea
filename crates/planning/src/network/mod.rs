//! Street network analysis.
//!
//! Links become an undirected simple graph whose nodes are snapped link
//! endpoints. Self-loops are dropped and parallel links collapse into one
//! edge. Metrics cover size, connectivity, centrality and intersection
//! spacing; parcel areas are summarized separately as block statistics.

pub mod analysis;
pub mod betweenness;
pub mod blocks;
pub mod graph;

mod tests;

pub use analysis::{NetworkAnalysis, NetworkAnalyzer, NetworkConfig};
pub use betweenness::betweenness_centrality;
pub use blocks::{block_stats, BlockSizeDistribution, BlockStats};
pub use graph::{EdgeData, NetworkGraph};
