#[cfg(test)]
mod tests {
    use geo::{line_string, polygon, Area};

    use crate::geometry::rect_polygon;
    use crate::scenario::{Link, LinkClass, SiteBoundary};
    use crate::subdivision::*;

    fn square_site(side: f64) -> SiteBoundary {
        SiteBoundary {
            geometry: rect_polygon(0.0, 0.0, side, side),
        }
    }

    fn irregular_config(target_area: f64) -> SubdivisionConfig {
        SubdivisionConfig {
            strategy: SubdivisionStrategy::Irregular,
            target_area,
            ..Default::default()
        }
    }

    // -------------------------------------------------------------------------
    // Grid
    // -------------------------------------------------------------------------

    #[test]
    fn test_cell_width_is_clamped() {
        let mut config = SubdivisionConfig::default();
        assert!((config.cell_width() - 1000f64.sqrt()).abs() < 1e-9);
        config.target_area = 100.0;
        assert!((config.cell_width() - 20.0).abs() < f64::EPSILON);
        config.target_area = 10_000.0;
        assert!((config.cell_width() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grid_square_site_keeps_full_cells() {
        let config = SubdivisionConfig::default();
        let parcels = grid_parcels(&square_site(100.0).geometry, &config);
        // 3x3 full cells; the 5 m slivers along two edges fall below half
        // the target.
        assert_eq!(parcels.len(), 9);
        for p in &parcels {
            assert!((p.unsigned_area() - 1000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_grid_drops_small_pieces_of_triangle() {
        let config = SubdivisionConfig::default();
        let triangle = polygon![(x: 0.0, y: 0.0), (x: 200.0, y: 0.0), (x: 0.0, y: 200.0)];
        let parcels = grid_parcels(&triangle, &config);
        assert!(!parcels.is_empty());
        for p in &parcels {
            assert!(p.unsigned_area() >= 500.0);
        }
        let total: f64 = parcels.iter().map(|p| p.unsigned_area()).sum();
        assert!(total <= triangle.unsigned_area() + 1e-6);
    }

    // -------------------------------------------------------------------------
    // Irregular
    // -------------------------------------------------------------------------

    #[test]
    fn test_bisection_without_roads() {
        let config = irregular_config(1000.0);
        let parcels = irregular_parcels(&square_site(100.0).geometry, &[], &config);
        // 10 000 -> 5 000 -> 2 500 -> 1 250 -> 625 at depth 4.
        assert_eq!(parcels.len(), 16);
        for p in &parcels {
            assert!((p.unsigned_area() - 625.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_bisection_respects_max_depth() {
        let mut config = irregular_config(100.0);
        config.max_depth = 1;
        config.max_area_ratio = 100.0;
        let parcels = irregular_parcels(&square_site(100.0).geometry, &[], &config);
        // Depth 0 and 1 split, depth 2 is emitted: four quarters.
        assert_eq!(parcels.len(), 4);
    }

    #[test]
    fn test_road_corridor_splits_site() {
        let config = irregular_config(4000.0);
        let road = Link::new(
            1,
            line_string![(x: 50.0, y: -10.0), (x: 50.0, y: 110.0)],
            LinkClass::Local,
        );
        let parcels = irregular_parcels(&square_site(100.0).geometry, &[road], &config);
        assert_eq!(parcels.len(), 2);
        for p in &parcels {
            assert!((p.unsigned_area() - 4000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_road_fragments_outside_band_are_dropped() {
        let config = irregular_config(1000.0);
        let road = Link::new(
            1,
            line_string![(x: 50.0, y: -10.0), (x: 50.0, y: 110.0)],
            LinkClass::Local,
        );
        let parcels = irregular_parcels(&square_site(100.0).geometry, &[road], &config);
        assert!(parcels.is_empty());
    }

    // -------------------------------------------------------------------------
    // GeometrySubdivider
    // -------------------------------------------------------------------------

    #[test]
    fn test_subdivider_assigns_ids_and_default_zoning() {
        let config = SubdivisionConfig::default();
        let result = GeometrySubdivider::new(&config)
            .subdivide(Some(&square_site(100.0)), &[])
            .expect("subdivision succeeds");
        assert_eq!(result.parcels.len(), 9);
        let ids: Vec<u32> = result.parcels.iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=9).collect::<Vec<u32>>());
        for p in &result.parcels {
            assert_eq!(p.zoning, config.default_zoning);
            assert!(p.capacity.is_none());
        }
        assert_eq!(result.summary.parcel_count, 9);
        assert!((result.summary.average_area - 1000.0).abs() < 1e-6);
        assert!((result.summary.boundary_area - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_subdivider_missing_boundary_is_not_found() {
        let config = SubdivisionConfig::default();
        let err = GeometrySubdivider::new(&config)
            .subdivide(None, &[])
            .err()
            .expect("missing boundary fails");
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_subdivider_degenerate_boundary_is_invalid_geometry() {
        let config = SubdivisionConfig::default();
        let boundary = SiteBoundary {
            geometry: polygon![(x: 0.0, y: 0.0), (x: 50.0, y: 0.0), (x: 100.0, y: 0.0)],
        };
        let err = GeometrySubdivider::new(&config)
            .subdivide(Some(&boundary), &[])
            .err()
            .expect("degenerate boundary fails");
        assert_eq!(err.kind(), "invalid_geometry");
    }

    #[test]
    fn test_config_validation() {
        assert!(SubdivisionConfig::default().validate().is_ok());
        let bad = SubdivisionConfig {
            min_width: 60.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = SubdivisionConfig {
            target_area: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
