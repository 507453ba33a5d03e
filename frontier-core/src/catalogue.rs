//! The locally cached registry.
//!
//! Two datasets are held: reference groups, used to pick a search origin by
//! country, and the UUPG dataset, which radius searches run against.

use std::collections::BTreeSet;

use crate::PeopleGroupRecord;
use crate::matcher::compare_names;

/// In-memory copy of both local datasets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalCatalogue {
    reference: Vec<PeopleGroupRecord>,
    uupgs: Vec<PeopleGroupRecord>,
}

impl LocalCatalogue {
    /// Build a catalogue from already normalised datasets.
    #[must_use]
    pub const fn new(reference: Vec<PeopleGroupRecord>, uupgs: Vec<PeopleGroupRecord>) -> Self {
        Self { reference, uupgs }
    }

    /// Records offered as search origins.
    #[must_use]
    pub fn reference(&self) -> &[PeopleGroupRecord] {
        &self.reference
    }

    /// Records searched by radius.
    #[must_use]
    pub fn uupgs(&self) -> &[PeopleGroupRecord] {
        &self.uupgs
    }

    /// Sorted, distinct, non-empty country names of the reference dataset.
    ///
    /// # Examples
    /// ```
    /// use frontier_core::{LocalCatalogue, PeopleGroupRecord};
    ///
    /// let reference = vec![
    ///     PeopleGroupRecord::new("Tubu", "Niger")?,
    ///     PeopleGroupRecord::new("Kanembu", "Chad")?,
    ///     PeopleGroupRecord::new("Hausa", "Niger")?,
    /// ];
    /// let catalogue = LocalCatalogue::new(reference, Vec::new());
    /// assert_eq!(catalogue.countries(), vec!["Chad", "Niger"]);
    /// # Ok::<(), frontier_core::RecordError>(())
    /// ```
    #[must_use]
    pub fn countries(&self) -> Vec<String> {
        self.reference
            .iter()
            .map(|record| record.country.as_str())
            .filter(|country| !country.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Reference records in `country`, sorted by name.
    #[must_use]
    pub fn groups_in_country(&self, country: &str) -> Vec<&PeopleGroupRecord> {
        let mut groups: Vec<_> = self
            .reference
            .iter()
            .filter(|record| record.country == country)
            .collect();
        groups.sort_by(|a, b| compare_names(a, b));
        groups
    }

    /// Find a record by id, preferring the UUPG dataset.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&PeopleGroupRecord> {
        self.uupgs
            .iter()
            .chain(&self.reference)
            .find(|record| record.id == id)
    }

    /// Find a reference record by country and name, case-insensitively.
    #[must_use]
    pub fn find_reference(&self, country: &str, name: &str) -> Option<&PeopleGroupRecord> {
        self.reference.iter().find(|record| {
            record.country.eq_ignore_ascii_case(country.trim())
                && record.name.eq_ignore_ascii_case(name.trim())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn record(name: &str, country: &str) -> PeopleGroupRecord {
        PeopleGroupRecord::new(name, country).expect("valid record")
    }

    #[fixture]
    fn catalogue() -> LocalCatalogue {
        let mut duplicate = record("Kanembu", "Chad");
        duplicate.population = 1;
        LocalCatalogue::new(
            vec![
                record("zaghawa", "Chad"),
                record("Tubu", "Niger"),
                record("Arab, Shuwa", "Chad"),
                record("Nameless", ""),
                record("Kanembu", "Chad"),
            ],
            vec![duplicate],
        )
    }

    #[rstest]
    fn lists_distinct_countries(catalogue: LocalCatalogue) {
        assert_eq!(catalogue.countries(), vec!["Chad", "Niger"]);
    }

    #[rstest]
    fn lists_groups_in_country_by_name(catalogue: LocalCatalogue) {
        let names: Vec<_> = catalogue
            .groups_in_country("Chad")
            .into_iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Arab, Shuwa", "Kanembu", "zaghawa"]);
    }

    #[rstest]
    fn unknown_country_has_no_groups(catalogue: LocalCatalogue) {
        assert!(catalogue.groups_in_country("Mali").is_empty());
    }

    #[rstest]
    fn find_prefers_uupg_dataset(catalogue: LocalCatalogue) {
        let found = catalogue.find("kanembu-chad").expect("record present");
        assert_eq!(found.population, 1);
        assert!(catalogue.find("missing-id").is_none());
    }

    #[rstest]
    fn finds_reference_case_insensitively(catalogue: LocalCatalogue) {
        let found = catalogue.find_reference("chad", " ZAGHAWA ");
        assert_eq!(found.map(|r| r.id.as_str()), Some("zaghawa-chad"));
    }
}
