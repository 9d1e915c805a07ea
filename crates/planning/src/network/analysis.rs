use std::collections::BTreeMap;

use bevy::log::info;
use serde::{Deserialize, Serialize};

use super::betweenness::betweenness_centrality;
use super::blocks::{block_stats, BlockStats};
use super::graph::NetworkGraph;
use crate::error::PlanningError;
use crate::kpi::KpiSection;
use crate::scenario::{Link, LinkClass, Parcel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Endpoints closer than this (metres) are the same intersection.
    pub snap_tolerance: f64,
    /// Blocks below this area (m²) are small.
    pub small_block_area: f64,
    /// Blocks below this area (m²) are medium; larger ones are large.
    pub medium_block_area: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            snap_tolerance: 10.0,
            small_block_area: 1_000.0,
            medium_block_area: 10_000.0,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<(), PlanningError> {
        if self.snap_tolerance < 0.0 || self.small_block_area > self.medium_block_area {
            return Err(PlanningError::InvalidConfig(
                "network snap tolerance must be >= 0 and block bands ascending".to_string(),
            ));
        }
        Ok(())
    }
}

/// Topology and geometry metrics of the street network, written to the
/// `network_analysis` KPI section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkAnalysis {
    pub link_count: usize,
    pub total_length: f64,
    pub avg_link_length: f64,
    pub node_count: usize,
    pub edge_count: usize,
    /// Edges per node.
    pub connectivity_ratio: f64,
    /// Share of possible node pairs that are directly linked.
    pub density: f64,
    pub avg_degree: f64,
    pub avg_betweenness: f64,
    pub component_count: usize,
    pub link_class_distribution: BTreeMap<LinkClass, u32>,
    pub intersection_count: usize,
    /// Intersections per km of network.
    pub intersection_density: f64,
    pub avg_intersection_spacing: f64,
    pub bike_lane_length: f64,
    pub major_length: f64,
    pub blocks: Option<BlockStats>,
}

impl KpiSection for NetworkAnalysis {
    const KEY: &'static str = "network_analysis";
}

pub struct NetworkAnalyzer<'a> {
    config: &'a NetworkConfig,
}

impl<'a> NetworkAnalyzer<'a> {
    pub fn new(config: &'a NetworkConfig) -> Self {
        Self { config }
    }

    pub fn analyze(
        &self,
        links: &[Link],
        parcels: &[Parcel],
    ) -> Result<NetworkAnalysis, PlanningError> {
        if links.is_empty() {
            return Err(PlanningError::NotFound("links".into()));
        }

        let graph = NetworkGraph::from_links(links, self.config.snap_tolerance);
        let nodes = graph.node_count();
        let edges = graph.edge_count();

        let total_length: f64 = links.iter().map(Link::length).sum();
        let mut link_class_distribution = BTreeMap::new();
        for link in links {
            *link_class_distribution.entry(link.class).or_insert(0) += 1;
        }
        let bike_lane_length = links
            .iter()
            .filter(|l| l.properties.bike_lane)
            .map(Link::length)
            .sum();
        let major_length = links
            .iter()
            .filter(|l| l.class.is_major())
            .map(Link::length)
            .sum();

        let betweenness = betweenness_centrality(&graph);
        let avg_betweenness = if nodes == 0 {
            0.0
        } else {
            betweenness.iter().sum::<f64>() / nodes as f64
        };

        let analysis = NetworkAnalysis {
            link_count: links.len(),
            total_length,
            avg_link_length: total_length / links.len() as f64,
            node_count: nodes,
            edge_count: edges,
            connectivity_ratio: if nodes == 0 {
                0.0
            } else {
                edges as f64 / nodes as f64
            },
            density: if nodes > 1 {
                2.0 * edges as f64 / (nodes as f64 * (nodes as f64 - 1.0))
            } else {
                0.0
            },
            avg_degree: if nodes == 0 {
                0.0
            } else {
                2.0 * edges as f64 / nodes as f64
            },
            avg_betweenness,
            component_count: graph.connected_components().len(),
            link_class_distribution,
            intersection_count: nodes,
            intersection_density: if total_length > 0.0 {
                nodes as f64 / (total_length / 1000.0)
            } else {
                0.0
            },
            avg_intersection_spacing: if nodes == 0 {
                0.0
            } else {
                total_length / nodes as f64
            },
            bike_lane_length,
            major_length,
            blocks: block_stats(
                parcels,
                self.config.small_block_area,
                self.config.medium_block_area,
            ),
        };

        info!(
            "network: {} links, {} intersections, {:.2} per km, {} components",
            analysis.link_count,
            analysis.intersection_count,
            analysis.intersection_density,
            analysis.component_count
        );
        Ok(analysis)
    }
}
