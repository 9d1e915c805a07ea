use std::collections::{BTreeMap, HashSet};

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::scenario::{Link, LinkClass};
use crate::spatial_index::PointIndex;

/// Attributes carried by one undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub link_id: u32,
    pub length: f64,
    pub class: LinkClass,
    pub lanes: u32,
    pub speed_limit: f64,
}

/// Compressed Sparse Row street graph.
///
/// Nodes are link endpoints snapped together within a tolerance. Every
/// undirected edge is stored twice, once from each endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkGraph {
    /// Snapped node positions.
    pub nodes: Vec<Coord<f64>>,
    /// node_offsets[i]..node_offsets[i+1] is the slice of `edges` for node i.
    pub node_offsets: Vec<u32>,
    /// Flat array of neighbour indices.
    pub edges: Vec<u32>,
    /// Edge attributes, same length as `edges`.
    pub edge_data: Vec<EdgeData>,
}

/// Greedy endpoint snapping: each point joins the nearest existing node
/// within `tolerance`, otherwise it becomes a new node.
fn snap(
    point: Coord<f64>,
    nodes: &mut Vec<Coord<f64>>,
    index: &mut PointIndex,
    tolerance: f64,
) -> u32 {
    if let Some((idx, _)) = index.query_radius(point, tolerance).first() {
        return *idx as u32;
    }
    let idx = nodes.len();
    nodes.push(point);
    index.insert(idx, point);
    idx as u32
}

impl NetworkGraph {
    pub fn from_links(links: &[Link], tolerance: f64) -> Self {
        let mut nodes = Vec::new();
        let mut index = PointIndex::new(tolerance.max(1.0));
        // Keyed by (low, high) node pair so parallel links collapse.
        let mut adjacency: BTreeMap<(u32, u32), EdgeData> = BTreeMap::new();

        for link in links {
            let coords = &link.geometry.0;
            let (Some(first), Some(last)) = (coords.first(), coords.last()) else {
                continue;
            };
            let a = snap(*first, &mut nodes, &mut index, tolerance);
            let b = snap(*last, &mut nodes, &mut index, tolerance);
            if a == b {
                continue;
            }
            adjacency.entry((a.min(b), a.max(b))).or_insert(EdgeData {
                link_id: link.id,
                length: link.length(),
                class: link.class,
                lanes: link.properties.lanes,
                speed_limit: link.properties.speed_limit,
            });
        }

        let mut per_node: Vec<Vec<(u32, EdgeData)>> = vec![Vec::new(); nodes.len()];
        for (&(a, b), data) in &adjacency {
            per_node[a as usize].push((b, *data));
            per_node[b as usize].push((a, *data));
        }

        let mut node_offsets = Vec::with_capacity(nodes.len() + 1);
        let mut edges = Vec::new();
        let mut edge_data = Vec::new();
        for neighbors in &mut per_node {
            neighbors.sort_by_key(|(n, _)| *n);
            node_offsets.push(edges.len() as u32);
            for (n, data) in neighbors.iter() {
                edges.push(*n);
                edge_data.push(*data);
            }
        }
        node_offsets.push(edges.len() as u32);

        Self {
            nodes,
            node_offsets,
            edges,
            edge_data,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    pub fn neighbors(&self, node_idx: u32) -> &[u32] {
        let start = self.node_offsets[node_idx as usize] as usize;
        let end = self.node_offsets[node_idx as usize + 1] as usize;
        &self.edges[start..end]
    }

    pub fn degree(&self, node_idx: u32) -> usize {
        self.neighbors(node_idx).len()
    }

    pub fn connected_components(&self) -> Vec<HashSet<u32>> {
        let starts: Vec<u32> = (0..self.node_count() as u32).collect();
        pathfinding::prelude::connected_components(&starts, |&n| {
            self.neighbors(n).to_vec()
        })
    }
}
