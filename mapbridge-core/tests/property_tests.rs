//! Property-based tests for coordinate handling and change-set bookkeeping.
//!
//! # Invariants tested
//!
//! - **Mercator round trip:** unprojecting a projected in-view position
//!   returns it within tolerance.
//! - **Precision idempotence:** rounding twice equals rounding once.
//! - **Partition detection:** disjoint change-sets report no violations.

use mapbridge_core::test_support::{WebMercator, point_feature};
use mapbridge_core::{ChangeSet, LngLat};
use proptest::prelude::*;

const VIEW: WebMercator = WebMercator {
    center: LngLat::new(-0.1278, 51.5074),
    zoom: 12.0,
    width: 1024.0,
    height: 768.0,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: points inside the viewport survive project then unproject.
    #[test]
    fn mercator_round_trip_inside_viewport(
        fx in 0.0_f64..=1.0,
        fy in 0.0_f64..=1.0,
    ) {
        let (south_west, north_east) = VIEW.bounds();
        let position = LngLat::new(
            south_west.lng + fx * (north_east.lng - south_west.lng),
            south_west.lat + fy * (north_east.lat - south_west.lat),
        );
        let back = VIEW.unproject(VIEW.project(position));
        prop_assert!((back.lng - position.lng).abs() < 1e-9);
        prop_assert!((back.lat - position.lat).abs() < 1e-9);
    }

    /// Property: rounding is idempotent at every supported precision.
    #[test]
    fn limit_precision_is_idempotent(
        lng in -180.0_f64..=180.0,
        lat in -90.0_f64..=90.0,
        digits in 0_u32..=9,
    ) {
        let once = LngLat::new(lng, lat).limit_precision(digits);
        prop_assert_eq!(once.limit_precision(digits), once);
    }

    /// Property: splitting distinct ids across the four sets is never
    /// reported as a violation.
    #[test]
    fn disjoint_change_sets_have_no_violations(
        sizes in proptest::array::uniform4(0_usize..6),
    ) {
        let mut next = 0_usize;
        let mut take = |count: usize| -> Vec<String> {
            let ids = (next..next + count).map(|n| format!("f{n}")).collect();
            next += count;
            ids
        };
        let [unchanged, created, updated, deleted] = sizes;
        let features = |ids: Vec<String>| -> Vec<_> {
            ids.iter().map(|id| point_feature(id, 0.0, 0.0)).collect()
        };
        let changes = ChangeSet::new()
            .with_unchanged(features(take(unchanged)))
            .with_created(features(take(created)))
            .with_updated(features(take(updated)))
            .with_deleted(take(deleted));
        prop_assert!(changes.partition_violations().is_empty());
        prop_assert_eq!(changes.live_features().count(), unchanged + created + updated);
    }
}
