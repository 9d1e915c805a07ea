//! Unit tests for polygon helpers and validation.

#[cfg(test)]
mod tests {
    use geo::{coord, polygon, Area};

    use crate::geometry::*;

    #[test]
    fn test_rect_polygon_area_and_bounds() {
        let rect = rect_polygon(10.0, 20.0, 40.0, 60.0);
        assert!((rect.unsigned_area() - 1200.0).abs() < 1e-9);
        let b = bounds(&rect).expect("rect has bounds");
        assert!((b.width() - 30.0).abs() < 1e-9);
        assert!((b.height() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_in_half_cuts_longer_axis() {
        let rect = rect_polygon(0.0, 0.0, 100.0, 40.0);
        let parts = split_in_half(&rect).expect("rectangle splits");
        assert_eq!(parts.len(), 2);
        for part in &parts {
            assert!((part.unsigned_area() - 2000.0).abs() < 1e-6);
            let b = bounds(part).expect("part has bounds");
            assert!((b.width() - 50.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_split_in_half_cuts_square_horizontally() {
        let square = rect_polygon(0.0, 0.0, 100.0, 100.0);
        let parts = split_in_half(&square).expect("square splits");
        assert_eq!(parts.len(), 2);
        for part in &parts {
            let b = bounds(part).expect("part has bounds");
            assert!((b.width() - 100.0).abs() < 1e-6);
            assert!((b.height() - 50.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_link_corridor_is_square_capped() {
        let corridor = link_corridor(coord! { x: 0.0, y: 0.0 }, coord! { x: 100.0, y: 0.0 }, 10.0)
            .expect("corridor");
        // 120 long (10 past each end) by 20 wide.
        assert!((corridor.unsigned_area() - 2400.0).abs() < 1e-6);
        let b = bounds(&corridor).expect("bounds");
        assert!((b.min_x + 10.0).abs() < 1e-9);
        assert!((b.max_x - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_link_corridor_rejects_zero_width() {
        assert!(link_corridor(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 0.0 }, 0.0).is_none());
    }

    #[test]
    fn test_difference_removes_corridor() {
        let site = geo::MultiPolygon::new(vec![rect_polygon(0.0, 0.0, 100.0, 100.0)]);
        let road = union_all(vec![rect_polygon(40.0, -20.0, 60.0, 120.0)]);
        let remaining = difference(&site, &road).expect("difference succeeds");
        assert_eq!(remaining.0.len(), 2);
        assert!((remaining.unsigned_area() - 8000.0).abs() < 1e-6);
    }

    #[test]
    fn test_guarded_catches_panics() {
        let result: Option<u32> = guarded("test", || panic!("boom"));
        assert!(result.is_none());
        assert_eq!(guarded("test", || 5), Some(5));
    }

    #[test]
    fn test_validate_square_is_valid() {
        let report = validate_polygon(&rect_polygon(0.0, 0.0, 10.0, 10.0));
        assert!(report.valid, "problems: {:?}", report.problems);
        assert!((report.area - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_bow_tie_self_intersects() {
        let bow_tie = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 10.0, y: 0.0),
            (x: 0.0, y: 10.0),
        ];
        let report = validate_polygon(&bow_tie);
        assert!(!report.valid);
        assert!(report.problems.iter().any(|p| p.contains("self-intersects")));
    }

    #[test]
    fn test_validate_degenerate_ring() {
        let line = polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 0.0, y: 0.0)];
        let err = ensure_valid(&line).unwrap_err();
        assert_eq!(err.kind(), "invalid_geometry");
    }

    #[test]
    fn test_validate_collinear_ring_has_zero_area() {
        let flat = polygon![(x: 0.0, y: 0.0), (x: 5.0, y: 0.0), (x: 10.0, y: 0.0)];
        let report = validate_polygon(&flat);
        assert!(!report.valid);
        assert!(report.problems.iter().any(|p| p.contains("zero area")));
    }
}
