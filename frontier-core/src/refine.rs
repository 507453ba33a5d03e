//! Post-search filtering, sorting and facet listing.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::matcher::{compare_by_distance, compare_names};
use crate::{GroupType, PeopleGroupRecord};

/// Optional criteria narrowing a result set. Unset fields match everything.
///
/// # Examples
/// ```
/// use frontier_core::{GroupType, PeopleGroupRecord, ResultFilter};
///
/// let mut record = PeopleGroupRecord::new("Kanembu", "Chad")?;
/// record.language = "Kanembu".into();
/// record.group_type = Some(GroupType::Fpg);
///
/// let filter = ResultFilter {
///     group_type: Some(GroupType::Fpg),
///     ..ResultFilter::default()
/// };
/// assert!(filter.matches(&record));
/// # Ok::<(), frontier_core::RecordError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultFilter {
    /// Exact primary language.
    pub language: Option<String>,
    /// Exact primary religion.
    pub religion: Option<String>,
    /// Engagement classification.
    pub group_type: Option<GroupType>,
    /// Inclusive upper bound on the evangelical fraction.
    pub max_evangelical: Option<f64>,
}

impl ResultFilter {
    /// Whether `record` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, record: &PeopleGroupRecord) -> bool {
        self.language
            .as_ref()
            .is_none_or(|language| &record.language == language)
            && self
                .religion
                .as_ref()
                .is_none_or(|religion| &record.religion == religion)
            && self
                .group_type
                .is_none_or(|group_type| record.classification() == group_type)
            && self
                .max_evangelical
                .is_none_or(|max| record.evangelical <= max)
    }

    /// Keep only the records satisfying the filter, preserving order.
    #[must_use]
    pub fn apply(&self, records: Vec<PeopleGroupRecord>) -> Vec<PeopleGroupRecord> {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}

/// Orderings offered for result and shortlist listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Nearest first.
    #[default]
    Distance,
    /// Largest population first.
    Population,
    /// Language, alphabetically.
    Language,
    /// Religion, alphabetically.
    Religion,
    /// Group type, FPG before UUPG.
    Type,
}

impl SortKey {
    /// Sort `records` in place. Ties fall back to the case-insensitive name.
    pub fn sort(self, records: &mut [PeopleGroupRecord]) {
        records.sort_by(|a, b| self.compare(a, b));
    }

    fn compare(self, a: &PeopleGroupRecord, b: &PeopleGroupRecord) -> Ordering {
        let primary = match self {
            Self::Distance => return compare_by_distance(a, b),
            Self::Population => b.population.cmp(&a.population),
            Self::Language => compare_text(&a.language, &b.language),
            Self::Religion => compare_text(&a.religion, &b.religion),
            Self::Type => a.classification().cmp(&b.classification()),
        };
        primary.then_with(|| compare_names(a, b))
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "distance" => Ok(Self::Distance),
            "population" => Ok(Self::Population),
            "language" => Ok(Self::Language),
            "religion" => Ok(Self::Religion),
            "type" => Ok(Self::Type),
            _ => Err(format!("unknown sort key '{s}'")),
        }
    }
}

/// Distinct languages and religions present in a result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Facets {
    /// Sorted distinct languages.
    pub languages: Vec<String>,
    /// Sorted distinct religions.
    pub religions: Vec<String>,
}

impl Facets {
    /// Collect facets from `records`, ignoring blank values.
    #[must_use]
    pub fn collect(records: &[PeopleGroupRecord]) -> Self {
        let distinct = |field: fn(&PeopleGroupRecord) -> &str| -> Vec<String> {
            records
                .iter()
                .map(field)
                .filter(|value| !value.trim().is_empty())
                .map(str::to_owned)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };
        Self {
            languages: distinct(|r| r.language.as_str()),
            religions: distinct(|r| r.religion.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn record(name: &str, language: &str, religion: &str, population: u64) -> PeopleGroupRecord {
        let mut record = PeopleGroupRecord::new(name, "Chad").expect("valid record");
        record.language = language.into();
        record.religion = religion.into();
        record.population = population;
        record
    }

    #[fixture]
    fn results() -> Vec<PeopleGroupRecord> {
        let mut kanembu = record("Kanembu", "Kanembu", "Islam", 600_000).with_evangelical(0.01);
        kanembu.distance = Some(40.0);
        let mut ngambay = record("Ngambay", "Ngambay", "Christianity", 1_200_000)
            .with_evangelical(0.3);
        ngambay.distance = Some(12.5);
        let mut arab = record("Arab, Shuwa", "Arabic, Shuwa", "Islam", 1_900_000)
            .with_evangelical(0.10);
        arab.distance = Some(12.5);
        vec![kanembu, ngambay, arab]
    }

    fn names(records: &[PeopleGroupRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[rstest]
    fn empty_filter_keeps_everything(results: Vec<PeopleGroupRecord>) {
        assert_eq!(ResultFilter::default().apply(results).len(), 3);
    }

    #[rstest]
    fn filters_by_religion_and_type(results: Vec<PeopleGroupRecord>) {
        let filter = ResultFilter {
            religion: Some("Islam".into()),
            group_type: Some(GroupType::Uupg),
            ..ResultFilter::default()
        };
        assert_eq!(names(&filter.apply(results)), vec!["Arab, Shuwa"]);
    }

    #[rstest]
    fn evangelical_bound_is_inclusive(results: Vec<PeopleGroupRecord>) {
        let filter = ResultFilter {
            max_evangelical: Some(0.10),
            ..ResultFilter::default()
        };
        assert_eq!(names(&filter.apply(results)), vec!["Kanembu", "Arab, Shuwa"]);
    }

    #[rstest]
    #[case(SortKey::Distance, vec!["Arab, Shuwa", "Ngambay", "Kanembu"])]
    #[case(SortKey::Population, vec!["Arab, Shuwa", "Ngambay", "Kanembu"])]
    #[case(SortKey::Language, vec!["Arab, Shuwa", "Kanembu", "Ngambay"])]
    #[case(SortKey::Religion, vec!["Ngambay", "Arab, Shuwa", "Kanembu"])]
    #[case(SortKey::Type, vec!["Kanembu", "Arab, Shuwa", "Ngambay"])]
    fn sorts_by_key(
        mut results: Vec<PeopleGroupRecord>,
        #[case] key: SortKey,
        #[case] expected: Vec<&str>,
    ) {
        key.sort(&mut results);
        assert_eq!(names(&results), expected);
    }

    #[rstest]
    fn collects_sorted_facets(results: Vec<PeopleGroupRecord>) {
        let facets = Facets::collect(&results);
        assert_eq!(facets.languages, vec!["Arabic, Shuwa", "Kanembu", "Ngambay"]);
        assert_eq!(facets.religions, vec!["Christianity", "Islam"]);
    }
}
