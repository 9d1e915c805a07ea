//! Unit tests for zoning validation and capacity derivation.

#[cfg(test)]
mod tests {
    use crate::capacity::*;
    use crate::geometry::rect_polygon;
    use crate::scenario::{Parcel, UseMix, UseType, ZoningProperties};

    fn parcel(id: u32, side: f64, zoning: ZoningProperties) -> Parcel {
        Parcel::new(id, rect_polygon(0.0, 0.0, side, side), zoning)
    }

    fn residential_zoning(far: f64, coverage: f64, residential: f64) -> ZoningProperties {
        ZoningProperties {
            use_mix: UseMix::new(&[
                (UseType::Residential, residential),
                (UseType::Commercial, 1.0 - residential),
            ]),
            far,
            lot_coverage: coverage,
            ..Default::default()
        }
    }

    // -------------------------------------------------------------------------
    // compute_capacity
    // -------------------------------------------------------------------------

    #[test]
    fn test_floor_area_is_area_far_coverage() {
        let config = CapacityConfig::default();
        let p = parcel(1, 50.0, residential_zoning(2.5, 0.4, 1.0));
        let capacity = compute_capacity(&p, &config);
        assert!((capacity.floor_area - 2500.0 * 2.5 * 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_unit_count_reference_case() {
        let config = CapacityConfig {
            avg_unit_size: 80.0,
            ..Default::default()
        };
        let p = parcel(1, 100.0, residential_zoning(2.0, 1.0, 0.7));
        let capacity = compute_capacity(&p, &config);
        assert_eq!(capacity.units, 148);
        assert!((capacity.population - 370.0).abs() < 1e-9);
    }

    #[test]
    fn test_jobs_per_use() {
        let config = CapacityConfig::default();
        // 10 000 m² site, FAR 1, full coverage: 3 000 m² commercial.
        let zoning = ZoningProperties {
            use_mix: UseMix::new(&[(UseType::Residential, 0.7), (UseType::Commercial, 0.3)]),
            far: 1.0,
            lot_coverage: 1.0,
            ..Default::default()
        };
        let p = parcel(1, 100.0, zoning);
        let capacity = compute_capacity(&p, &config);
        assert_eq!(capacity.jobs_by_use.get(&UseType::Commercial), Some(&150));
        assert_eq!(capacity.jobs, 150);
        assert!(!capacity.jobs_by_use.contains_key(&UseType::Residential));
    }

    #[test]
    fn test_floors_affordable_and_parking() {
        let config = CapacityConfig::default();
        let mut zoning = residential_zoning(2.03, 0.5, 1.0);
        zoning.height = 15.0;
        zoning.inclusionary = 0.15;
        zoning.parking_ratio = 1.5;
        let p = parcel(1, 100.0, zoning);
        let capacity = compute_capacity(&p, &config);
        assert_eq!(capacity.floors, 4);
        // 10 150 m² residential / 85 x 0.85 = 101.5 units.
        assert_eq!(capacity.units, 101);
        assert_eq!(capacity.affordable_units, 15);
        assert!((capacity.parking_spaces - 151.5).abs() < 1e-9);
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    #[test]
    fn test_use_mix_outside_tolerance_is_issue() {
        let limits = ZoningLimits::default();
        let mut zoning = ZoningProperties::default();
        zoning.use_mix = UseMix::new(&[(UseType::Residential, 0.9), (UseType::Commercial, 0.2)]);
        let result = validate_parcels(&[parcel(3, 50.0, zoning)], &limits);
        assert!(!result.is_valid());
        assert_eq!(result.issues[0].kind, ValidationKind::UseMixSum);
        assert_eq!(result.issues[0].parcel_id, 3);
    }

    #[test]
    fn test_use_mix_within_tolerance_passes() {
        let limits = ZoningLimits::default();
        let mut zoning = ZoningProperties::default();
        zoning.use_mix = UseMix::new(&[(UseType::Residential, 0.705), (UseType::Commercial, 0.3)]);
        let result = validate_parcels(&[parcel(1, 50.0, zoning)], &limits);
        assert!(result.is_valid());
    }

    #[test]
    fn test_high_far_and_coverage_are_warnings() {
        let limits = ZoningLimits::default();
        let zoning = residential_zoning(12.0, 0.95, 1.0);
        let result = validate_parcels(&[parcel(1, 50.0, zoning)], &limits);
        assert!(result.is_valid());
        let kinds: Vec<ValidationKind> = result.warnings.iter().map(|w| w.kind).collect();
        assert!(kinds.contains(&ValidationKind::HighFar));
        assert!(kinds.contains(&ValidationKind::HighCoverage));
    }

    #[test]
    fn test_small_and_negative_far_are_issues() {
        let limits = ZoningLimits::default();
        let result = validate_parcels(
            &[parcel(1, 5.0, residential_zoning(-1.0, 0.5, 1.0))],
            &limits,
        );
        let kinds: Vec<ValidationKind> = result.issues.iter().map(|w| w.kind).collect();
        assert!(kinds.contains(&ValidationKind::SmallArea));
        assert!(kinds.contains(&ValidationKind::NegativeFar));
    }

    // -------------------------------------------------------------------------
    // CapacityEngine
    // -------------------------------------------------------------------------

    #[test]
    fn test_engine_skips_parcels_with_issues() {
        let config = CapacityConfig::default();
        let mut parcels = vec![
            parcel(1, 100.0, ZoningProperties::default()),
            parcel(2, 5.0, ZoningProperties::default()),
        ];
        let outcome = CapacityEngine::new(&config)
            .run(&mut parcels)
            .expect("engine runs");
        assert!(parcels[0].capacity.is_some());
        assert!(parcels[1].capacity.is_none());
        assert_eq!(outcome.summary.computed_parcels, 1);
        assert_eq!(outcome.summary.skipped_parcels, vec![2]);
        assert!(outcome.validation.has_issue(2));
    }

    #[test]
    fn test_engine_is_idempotent() {
        let config = CapacityConfig::default();
        let mut parcels = vec![
            parcel(1, 100.0, ZoningProperties::default()),
            parcel(2, 40.0, residential_zoning(3.0, 0.5, 0.5)),
        ];
        let engine = CapacityEngine::new(&config);
        let first = engine.run(&mut parcels).expect("first run").summary;
        let snapshot = parcels.clone();
        let second = engine.run(&mut parcels).expect("second run").summary;
        assert_eq!(first, second);
        assert_eq!(snapshot, parcels);
    }

    #[test]
    fn test_engine_summary_totals() {
        let config = CapacityConfig::default();
        let mut parcels = vec![
            parcel(1, 100.0, residential_zoning(2.03, 0.5, 1.0)),
            parcel(2, 100.0, residential_zoning(2.03, 0.5, 1.0)),
        ];
        let summary = CapacityEngine::new(&config)
            .run(&mut parcels)
            .expect("engine runs")
            .summary;
        assert_eq!(summary.total_units, 202);
        assert!((summary.total_population - 505.0).abs() < 1e-9);
        assert!((summary.total_floor_area - 20_300.0).abs() < 1e-6);
        let residential = summary.floor_area_by_use.get(&UseType::Residential);
        assert!(residential.is_some_and(|a| (a - 20_300.0).abs() < 1e-6));
    }

    #[test]
    fn test_engine_without_parcels_is_not_found() {
        let config = CapacityConfig::default();
        let err = CapacityEngine::new(&config)
            .run(&mut [])
            .err()
            .expect("empty input fails");
        assert_eq!(err.kind(), "not_found");
    }
}
