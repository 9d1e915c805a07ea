#[cfg(test)]
mod tests {
    use geo::line_string;

    use crate::geometry::rect_polygon;
    use crate::network::*;
    use crate::scenario::{Link, LinkClass, Parcel, ZoningProperties};

    fn segment(id: u32, x0: f64, y0: f64, x1: f64, y1: f64, class: LinkClass) -> Link {
        Link::new(id, line_string![(x: x0, y: y0), (x: x1, y: y1)], class)
    }

    fn square_loop() -> Vec<Link> {
        vec![
            segment(1, 0.0, 0.0, 100.0, 0.0, LinkClass::Arterial),
            segment(2, 100.0, 0.0, 100.0, 100.0, LinkClass::Local),
            segment(3, 100.0, 100.0, 0.0, 100.0, LinkClass::Local),
            segment(4, 0.0, 100.0, 0.0, 0.0, LinkClass::Collector),
        ]
    }

    // -------------------------------------------------------------------------
    // Graph construction
    // -------------------------------------------------------------------------

    #[test]
    fn test_endpoints_snap_within_tolerance() {
        let links = vec![
            segment(1, 0.0, 0.0, 100.0, 0.0, LinkClass::Local),
            segment(2, 105.0, 3.0, 200.0, 0.0, LinkClass::Local),
        ];
        let graph = NetworkGraph::from_links(&links, 10.0);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.degree(1), 2);
    }

    #[test]
    fn test_self_loop_is_dropped() {
        let links = vec![segment(1, 0.0, 0.0, 5.0, 0.0, LinkClass::Local)];
        let graph = NetworkGraph::from_links(&links, 10.0);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_parallel_links_collapse() {
        let links = vec![
            segment(1, 0.0, 0.0, 100.0, 0.0, LinkClass::Local),
            segment(2, 100.0, 0.0, 0.0, 0.0, LinkClass::Arterial),
        ];
        let graph = NetworkGraph::from_links(&links, 10.0);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_data[0].link_id, 1);
    }

    #[test]
    fn test_csr_neighbors_are_symmetric() {
        let graph = NetworkGraph::from_links(&square_loop(), 10.0);
        for node in 0..graph.node_count() as u32 {
            for &n in graph.neighbors(node) {
                assert!(graph.neighbors(n).contains(&node));
            }
        }
    }

    #[test]
    fn test_connected_components() {
        let links = vec![
            segment(1, 0.0, 0.0, 100.0, 0.0, LinkClass::Local),
            segment(2, 500.0, 500.0, 600.0, 500.0, LinkClass::Local),
        ];
        let graph = NetworkGraph::from_links(&links, 10.0);
        assert_eq!(graph.connected_components().len(), 2);
    }

    // -------------------------------------------------------------------------
    // Betweenness
    // -------------------------------------------------------------------------

    #[test]
    fn test_betweenness_path_graph() {
        let links = vec![
            segment(1, 0.0, 0.0, 100.0, 0.0, LinkClass::Local),
            segment(2, 100.0, 0.0, 200.0, 0.0, LinkClass::Local),
        ];
        let graph = NetworkGraph::from_links(&links, 10.0);
        let bc = betweenness_centrality(&graph);
        assert!((bc[0] - 0.0).abs() < 1e-12);
        assert!((bc[1] - 1.0).abs() < 1e-12);
        assert!((bc[2] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_betweenness_star_centre() {
        let links = vec![
            segment(1, 0.0, 0.0, 100.0, 0.0, LinkClass::Local),
            segment(2, 0.0, 0.0, 0.0, 100.0, LinkClass::Local),
            segment(3, 0.0, 0.0, -100.0, 0.0, LinkClass::Local),
        ];
        let graph = NetworkGraph::from_links(&links, 10.0);
        let bc = betweenness_centrality(&graph);
        assert!((bc[0] - 1.0).abs() < 1e-12);
        assert!(bc[1..].iter().all(|c| c.abs() < 1e-12));
    }

    #[test]
    fn test_betweenness_cycle_splits_paths() {
        let graph = NetworkGraph::from_links(&square_loop(), 10.0);
        let bc = betweenness_centrality(&graph);
        for c in bc {
            assert!((c - 1.0 / 6.0).abs() < 1e-12);
        }
    }

    // -------------------------------------------------------------------------
    // Analyzer
    // -------------------------------------------------------------------------

    #[test]
    fn test_analysis_square_loop() {
        let config = NetworkConfig::default();
        let analysis = NetworkAnalyzer::new(&config)
            .analyze(&square_loop(), &[])
            .expect("analysis succeeds");
        assert_eq!(analysis.node_count, 4);
        assert_eq!(analysis.edge_count, 4);
        assert!((analysis.total_length - 400.0).abs() < 1e-9);
        assert!((analysis.avg_link_length - 100.0).abs() < 1e-9);
        assert!((analysis.connectivity_ratio - 1.0).abs() < 1e-12);
        assert!((analysis.density - 2.0 / 3.0).abs() < 1e-12);
        assert!((analysis.avg_degree - 2.0).abs() < 1e-12);
        assert!((analysis.intersection_density - 10.0).abs() < 1e-9);
        assert!((analysis.avg_intersection_spacing - 100.0).abs() < 1e-9);
        assert!((analysis.major_length - 200.0).abs() < 1e-9);
        assert_eq!(analysis.component_count, 1);
        assert_eq!(analysis.link_class_distribution.get(&LinkClass::Local), Some(&2));
        assert!(analysis.blocks.is_none());
    }

    #[test]
    fn test_analysis_without_links_is_not_found() {
        let config = NetworkConfig::default();
        let err = NetworkAnalyzer::new(&config)
            .analyze(&[], &[])
            .unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_block_stats_buckets() {
        let parcels = vec![
            Parcel::new(1, rect_polygon(0.0, 0.0, 20.0, 25.0), ZoningProperties::default()),
            Parcel::new(2, rect_polygon(0.0, 0.0, 40.0, 50.0), ZoningProperties::default()),
            Parcel::new(3, rect_polygon(0.0, 0.0, 100.0, 200.0), ZoningProperties::default()),
        ];
        let stats = block_stats(&parcels, 1_000.0, 10_000.0).expect("stats");
        assert_eq!(stats.count, 3);
        assert!((stats.median_area - 2_000.0).abs() < 1e-9);
        assert!((stats.min_area - 500.0).abs() < 1e-9);
        assert!((stats.max_area - 20_000.0).abs() < 1e-9);
        assert_eq!(stats.size_distribution.small, 1);
        assert_eq!(stats.size_distribution.medium, 1);
        assert_eq!(stats.size_distribution.large, 1);
        assert!((stats.mean_perimeter - (90.0 + 180.0 + 600.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_block_stats_empty() {
        assert!(block_stats(&[], 1_000.0, 10_000.0).is_none());
    }
}
