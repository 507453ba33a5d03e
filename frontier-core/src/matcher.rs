//! Radius matching and distance ordering for people-group records.

use std::cmp::Ordering;

use log::debug;

use crate::{Coordinates, DistanceUnit, PeopleGroupRecord, ValidationError};

/// Slack absorbing the float error of converting a radius between units, so a
/// record lying exactly on the radius stays inside it.
const BOUNDARY_EPSILON_KM: f64 = 1e-9;

/// A validated origin, radius and unit.
///
/// # Examples
/// ```
/// use frontier_core::{Coordinates, DistanceUnit, RadiusQuery};
///
/// let origin = Coordinates::new(12.1, 15.0)?;
/// let query = RadiusQuery::new(origin, 100.0, DistanceUnit::Kilometres)?;
/// assert_eq!(query.radius(), 100.0);
/// assert!(RadiusQuery::new(origin, 0.0, DistanceUnit::Miles).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusQuery {
    origin: Coordinates,
    radius: f64,
    unit: DistanceUnit,
}

impl RadiusQuery {
    /// Validate and construct a query. The radius must be positive and finite.
    pub fn new(
        origin: Coordinates,
        radius: f64,
        unit: DistanceUnit,
    ) -> Result<Self, ValidationError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ValidationError::Radius(radius));
        }
        Ok(Self {
            origin,
            radius,
            unit,
        })
    }

    /// Centre of the search.
    #[must_use]
    pub const fn origin(&self) -> Coordinates {
        self.origin
    }

    /// Radius expressed in [`Self::unit`].
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Unit of the radius and of reported distances.
    #[must_use]
    pub const fn unit(&self) -> DistanceUnit {
        self.unit
    }

    /// Radius converted to kilometres.
    #[must_use]
    pub fn radius_km(&self) -> f64 {
        self.unit.to_km(self.radius)
    }
}

/// Return the records within the query radius, classified and sorted.
///
/// Records without a valid location are skipped. The boundary is inclusive.
/// Each returned record carries its distance in the query unit, rounded to
/// one decimal place and never reported above the radius. Records lacking a
/// classification are classified from their evangelical fraction. Results
/// are ordered by [`sort_by_distance`].
///
/// # Examples
/// ```
/// use frontier_core::{Coordinates, DistanceUnit, PeopleGroupRecord, RadiusQuery, within_radius};
///
/// let near = PeopleGroupRecord::new("Near", "Chad")?
///     .with_location(Coordinates::new(12.2, 15.0)?);
/// let far = PeopleGroupRecord::new("Far", "Chad")?
///     .with_location(Coordinates::new(20.0, 15.0)?);
/// let query = RadiusQuery::new(Coordinates::new(12.1, 15.0)?, 50.0, DistanceUnit::Kilometres)?;
///
/// let found = within_radius([near, far].iter(), &query);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].distance, Some(11.1));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn within_radius<'a, I>(records: I, query: &RadiusQuery) -> Vec<PeopleGroupRecord>
where
    I: IntoIterator<Item = &'a PeopleGroupRecord>,
{
    let radius_km = query.radius_km();
    let mut matches: Vec<PeopleGroupRecord> = records
        .into_iter()
        .filter_map(|record| {
            let location = record.location?;
            let km = query.origin.haversine_km(&location);
            (km <= radius_km + BOUNDARY_EPSILON_KM).then(|| {
                let mut matched = record.clone();
                matched.group_type = Some(record.classification());
                matched.distance = Some(report_distance(km, query));
                matched
            })
        })
        .collect();
    sort_by_distance(&mut matches);
    debug!(
        "{} records within {} {} of ({:.6}, {:.6})",
        matches.len(),
        query.radius,
        query.unit,
        query.origin.latitude(),
        query.origin.longitude()
    );
    matches
}

fn report_distance(km: f64, query: &RadiusQuery) -> f64 {
    let rounded = round_tenth(query.unit.from_km(km));
    rounded.min(floor_tenth(query.radius))
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Largest one-decimal value not above `value`.
fn floor_tenth(value: f64) -> f64 {
    (value * 10.0 + 1e-9).floor() / 10.0
}

/// Order records by ascending distance, then case-insensitively by name.
///
/// Records without a distance sort last.
pub fn sort_by_distance(records: &mut [PeopleGroupRecord]) {
    records.sort_by(compare_by_distance);
}

pub(crate) fn compare_by_distance(a: &PeopleGroupRecord, b: &PeopleGroupRecord) -> Ordering {
    let by_distance = match (a.distance, b.distance) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_distance.then_with(|| compare_names(a, b))
}

pub(crate) fn compare_names(a: &PeopleGroupRecord, b: &PeopleGroupRecord) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GroupType;
    use rstest::{fixture, rstest};

    fn record(name: &str, lat: f64, lon: f64, evangelical: f64) -> PeopleGroupRecord {
        PeopleGroupRecord::new(name, "Chad")
            .expect("valid record")
            .with_location(Coordinates::new(lat, lon).expect("valid coordinates"))
            .with_evangelical(evangelical)
    }

    #[fixture]
    fn origin() -> Coordinates {
        Coordinates::new(12.0, 15.0).expect("valid origin")
    }

    #[rstest]
    fn includes_record_exactly_on_the_boundary(origin: Coordinates) {
        let edge = record("Edge", 12.5, 15.5, 0.2);
        let exact = origin.haversine_km(&edge.location.expect("located"));
        let query = RadiusQuery::new(origin, exact, DistanceUnit::Kilometres).expect("query");

        let found = within_radius([&edge], &query);

        assert_eq!(found.len(), 1);
        let distance = found[0].distance.expect("distance attached");
        assert!(distance <= query.radius());
    }

    #[rstest]
    fn boundary_distance_stays_on_one_decimal() {
        let equator = Coordinates::new(0.0, 0.0).expect("valid origin");
        let edge = record("Edge", 0.0, 0.899, 0.2);
        let query = RadiusQuery::new(equator, 99.994, DistanceUnit::Kilometres).expect("query");

        let found = within_radius([&edge], &query);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].distance, Some(99.9));
    }

    #[rstest]
    fn includes_boundary_record_in_miles(origin: Coordinates) {
        let edge = record("Edge", 12.5, 15.5, 0.2);
        let exact_km = origin.haversine_km(&edge.location.expect("located"));
        let radius = DistanceUnit::Miles.from_km(exact_km);
        let query = RadiusQuery::new(origin, radius, DistanceUnit::Miles).expect("query");

        assert_eq!(within_radius([&edge], &query).len(), 1);
    }

    #[rstest]
    fn excludes_records_beyond_the_radius(origin: Coordinates) {
        let far = record("Far", 14.0, 15.0, 0.2);
        let query = RadiusQuery::new(origin, 100.0, DistanceUnit::Kilometres).expect("query");
        assert!(within_radius([&far], &query).is_empty());
    }

    #[rstest]
    fn skips_records_without_location(origin: Coordinates) {
        let unlocated = PeopleGroupRecord::new("Nowhere", "Chad").expect("valid record");
        let query = RadiusQuery::new(origin, 20_000.0, DistanceUnit::Kilometres).expect("query");
        assert!(within_radius([&unlocated], &query).is_empty());
    }

    #[rstest]
    fn reports_distance_in_requested_unit(origin: Coordinates) {
        let near = record("Near", 12.1, 15.0, 0.2);
        let km_query = RadiusQuery::new(origin, 50.0, DistanceUnit::Kilometres).expect("query");
        let mi_query = RadiusQuery::new(origin, 50.0, DistanceUnit::Miles).expect("query");

        let km = within_radius([&near], &km_query)[0].distance;
        let miles = within_radius([&near], &mi_query)[0].distance;

        assert_eq!(km, Some(11.1));
        assert_eq!(miles, Some(6.9));
    }

    #[rstest]
    fn classifies_unclassified_records(origin: Coordinates) {
        let frontier = record("Frontier", 12.1, 15.0, 0.05);
        let unengaged = record("Unengaged", 12.2, 15.0, 0.15);
        let query = RadiusQuery::new(origin, 100.0, DistanceUnit::Kilometres).expect("query");

        let found = within_radius([&frontier, &unengaged], &query);

        assert_eq!(found[0].group_type, Some(GroupType::Fpg));
        assert_eq!(found[1].group_type, Some(GroupType::Uupg));
    }

    #[rstest]
    fn sorts_by_distance_then_name(origin: Coordinates) {
        let records = vec![
            record("zaghawa", 12.3, 15.0, 0.2),
            record("Beria", 12.1, 15.0, 0.2),
            record("arab", 12.1, 15.0, 0.2),
        ];
        let query = RadiusQuery::new(origin, 100.0, DistanceUnit::Kilometres).expect("query");

        let names: Vec<_> = within_radius(&records, &query)
            .into_iter()
            .map(|r| r.name)
            .collect();

        assert_eq!(names, vec!["arab", "Beria", "zaghawa"]);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_radius(origin: Coordinates, #[case] radius: f64) {
        assert!(RadiusQuery::new(origin, radius, DistanceUnit::Kilometres).is_err());
    }
}
