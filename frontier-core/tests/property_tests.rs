//! Property-based tests for distance and radius matching.
//!
//! # Invariants tested
//!
//! - **Symmetry:** `distance_between(a, b) == distance_between(b, a)`.
//! - **Identity:** the distance from a point to itself is zero.
//! - **Radius bound:** `within_radius` never reports a distance above the
//!   radius, in either unit.
//! - **Boundary inclusion:** a record exactly on the radius is returned.

use frontier_core::{
    Coordinates, DistanceUnit, PeopleGroupRecord, RadiusQuery, distance_between, within_radius,
};
use proptest::prelude::*;

fn latitude() -> impl Strategy<Value = f64> {
    -90.0_f64..=90.0
}

fn longitude() -> impl Strategy<Value = f64> {
    -180.0_f64..=180.0
}

fn unit() -> impl Strategy<Value = DistanceUnit> {
    prop_oneof![Just(DistanceUnit::Kilometres), Just(DistanceUnit::Miles)]
}

fn located(name: &str, lat: f64, lon: f64) -> PeopleGroupRecord {
    let location = Coordinates::new(lat, lon).expect("strategy yields valid coordinates");
    PeopleGroupRecord::new(name, "Chad")
        .expect("non-empty name")
        .with_location(location)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn distance_is_symmetric(
        lat1 in latitude(),
        lon1 in longitude(),
        lat2 in latitude(),
        lon2 in longitude(),
    ) {
        let forward = distance_between(lat1, lon1, lat2, lon2);
        let backward = distance_between(lat2, lon2, lat1, lon1);
        prop_assert!(forward >= 0.0);
        prop_assert!((forward - backward).abs() < 1e-9, "{forward} != {backward}");
    }

    #[test]
    fn distance_to_self_is_zero(lat in latitude(), lon in longitude()) {
        prop_assert_eq!(distance_between(lat, lon, lat, lon), 0.0);
    }

    #[test]
    fn reported_distances_never_exceed_radius(
        origin_lat in -60.0_f64..=60.0,
        origin_lon in longitude(),
        points in proptest::collection::vec((latitude(), longitude()), 1..30),
        radius in 0.5_f64..5_000.0,
        unit in unit(),
    ) {
        let origin = Coordinates::new(origin_lat, origin_lon).expect("valid origin");
        let query = RadiusQuery::new(origin, radius, unit).expect("valid query");
        let records: Vec<_> = points
            .iter()
            .enumerate()
            .map(|(i, (lat, lon))| located(&format!("Group {i}"), *lat, *lon))
            .collect();

        for record in within_radius(&records, &query) {
            let distance = record.distance.expect("matched records carry a distance");
            prop_assert!(distance >= 0.0);
            prop_assert!(distance <= radius, "{distance} > {radius}");
        }
    }

    #[test]
    fn record_on_the_radius_is_included(
        origin_lat in -60.0_f64..=60.0,
        origin_lon in longitude(),
        lat in -60.0_f64..=60.0,
        lon in longitude(),
        unit in unit(),
    ) {
        let origin = Coordinates::new(origin_lat, origin_lon).expect("valid origin");
        let record = located("Edge", lat, lon);
        let km = distance_between(origin_lat, origin_lon, lat, lon);
        prop_assume!(km > 0.0);
        let query = RadiusQuery::new(origin, unit.from_km(km), unit).expect("valid query");

        prop_assert_eq!(within_radius([&record], &query).len(), 1);
    }
}
