//! Merge remote and local results for a radius search.
//!
//! [`RegistryService`] owns a [`RemoteRegistry`] and a [`LocalCatalogue`].
//! Requests are validated before either source is touched. A remote failure
//! never aborts the search on its own: it leaves the FPG list empty and is
//! reported through [`SearchOutcome::remote_failure`].

use log::{debug, warn};
use thiserror::Error;

use crate::matcher::sort_by_distance;
use crate::{
    CoordinateError, Coordinates, DistanceUnit, GroupType, LocalCatalogue, PeopleGroupRecord,
    RadiusQuery, RemoteRegistry, RemoteRegistryError, within_radius,
};

/// Invalid search input, detected before any source is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ValidationError {
    /// Origin latitude or longitude was invalid.
    #[error(transparent)]
    Coordinates(#[from] CoordinateError),
    /// Radius was not a positive finite number.
    #[error("radius {0} must be a positive finite number")]
    Radius(f64),
}

/// Which record types a search should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    /// Frontier groups from the remote registry.
    Fpg,
    /// Unengaged groups from the local dataset.
    Uupg,
    /// Both sources.
    #[default]
    Both,
}

impl TypeFilter {
    /// Whether the remote registry is consulted.
    #[must_use]
    pub const fn wants_remote(self) -> bool {
        matches!(self, Self::Fpg | Self::Both)
    }

    /// Whether the local dataset is consulted.
    #[must_use]
    pub const fn wants_local(self) -> bool {
        matches!(self, Self::Uupg | Self::Both)
    }
}

impl std::str::FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fpg" => Ok(Self::Fpg),
            "uupg" => Ok(Self::Uupg),
            "both" => Ok(Self::Both),
            _ => Err(format!("unknown type filter '{s}' (expected FPG, UUPG or both)")),
        }
    }
}

/// Raw search parameters as supplied by a caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRequest {
    /// Origin latitude in degrees.
    pub latitude: f64,
    /// Origin longitude in degrees.
    pub longitude: f64,
    /// Radius in `unit`.
    pub radius: f64,
    /// Unit of the radius and of reported distances.
    pub unit: DistanceUnit,
    /// Record types to return.
    pub type_filter: TypeFilter,
}

impl SearchRequest {
    /// Validate the request into a [`RadiusQuery`].
    ///
    /// # Examples
    /// ```
    /// use frontier_core::{DistanceUnit, SearchRequest, TypeFilter, ValidationError};
    ///
    /// let request = SearchRequest {
    ///     latitude: 12.1,
    ///     longitude: 15.0,
    ///     radius: -1.0,
    ///     unit: DistanceUnit::Kilometres,
    ///     type_filter: TypeFilter::Both,
    /// };
    /// assert_eq!(request.validate(), Err(ValidationError::Radius(-1.0)));
    /// ```
    pub fn validate(&self) -> Result<RadiusQuery, ValidationError> {
        let origin = Coordinates::new(self.latitude, self.longitude)?;
        RadiusQuery::new(origin, self.radius, self.unit)
    }
}

/// Results of a search, possibly partial.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    /// Frontier groups, nearest first.
    pub fpgs: Vec<PeopleGroupRecord>,
    /// Unengaged groups, nearest first.
    pub uupgs: Vec<PeopleGroupRecord>,
    /// Why the remote registry contributed nothing, when it failed.
    pub remote_failure: Option<RemoteRegistryError>,
}

impl SearchOutcome {
    /// Whether a requested source failed.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.remote_failure.is_some()
    }

    /// Both groups interleaved by distance, ties broken by name.
    #[must_use]
    pub fn combined(&self) -> Vec<PeopleGroupRecord> {
        let mut all: Vec<_> = self.fpgs.iter().chain(&self.uupgs).cloned().collect();
        sort_by_distance(&mut all);
        all
    }
}

/// Errors from [`RegistryService::search`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The request was rejected before any source was consulted.
    #[error("invalid search: {0}")]
    Validation(#[from] ValidationError),
    /// Every requested source was unusable.
    #[error("remote registry failed ({remote}) and the local dataset is empty")]
    RemoteAndLocalUnavailable {
        /// The remote failure.
        #[source]
        remote: RemoteRegistryError,
    },
}

/// Search service combining the remote registry with the local catalogue.
///
/// # Examples
/// ```
/// use frontier_core::{
///     DistanceUnit, LocalCatalogue, RegistryService, SearchRequest, TypeFilter,
/// };
/// use frontier_core::test_support::{StubRemoteRegistry, sample_record};
///
/// let catalogue = LocalCatalogue::new(
///     Vec::new(),
///     vec![sample_record("Kanembu", 12.2, 15.0, 0.2)],
/// );
/// let service = RegistryService::new(StubRemoteRegistry::with_records(Vec::new()), catalogue);
/// let outcome = service.search(&SearchRequest {
///     latitude: 12.1,
///     longitude: 15.0,
///     radius: 100.0,
///     unit: DistanceUnit::Kilometres,
///     type_filter: TypeFilter::Both,
/// })?;
/// assert_eq!(outcome.uupgs.len(), 1);
/// assert!(!outcome.is_partial());
/// # Ok::<(), frontier_core::SearchError>(())
/// ```
#[derive(Debug)]
pub struct RegistryService<R> {
    remote: R,
    catalogue: LocalCatalogue,
}

impl<R: RemoteRegistry> RegistryService<R> {
    /// Construct a service from its collaborators.
    pub const fn new(remote: R, catalogue: LocalCatalogue) -> Self {
        Self { remote, catalogue }
    }

    /// The local catalogue searched for UUPGs.
    pub const fn catalogue(&self) -> &LocalCatalogue {
        &self.catalogue
    }

    /// The remote registry queried for FPGs.
    pub const fn remote(&self) -> &R {
        &self.remote
    }

    /// Run a radius search.
    ///
    /// Remote records are re-matched against the query so their distances
    /// use the same formula and unit as local ones. Local matches classified
    /// as FPG join the FPG list only when both types are requested and the
    /// remote registry did not already return the same id.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        let query = request.validate()?;
        let filter = request.type_filter;
        let mut outcome = SearchOutcome::default();

        if filter.wants_remote() {
            match self.remote.find_frontier_groups(&query) {
                Ok(records) => outcome.fpgs = tag_remote(records, &query),
                Err(err) => {
                    warn!("remote registry unavailable, continuing with local data: {err}");
                    outcome.remote_failure = Some(err);
                }
            }
        }

        if filter.wants_local() {
            if let Some(remote) = &outcome.remote_failure
                && filter == TypeFilter::Both
                && self.catalogue.uupgs().is_empty()
            {
                return Err(SearchError::RemoteAndLocalUnavailable {
                    remote: remote.clone(),
                });
            }
            let (frontier, unengaged): (Vec<_>, Vec<_>) =
                within_radius(self.catalogue.uupgs(), &query)
                    .into_iter()
                    .partition(|record| record.classification() == GroupType::Fpg);
            outcome.uupgs = unengaged;
            if filter == TypeFilter::Both {
                merge_local_frontier(&mut outcome.fpgs, frontier);
            }
        }

        debug!(
            "search returned {} FPGs and {} UUPGs",
            outcome.fpgs.len(),
            outcome.uupgs.len()
        );
        Ok(outcome)
    }
}

fn tag_remote(records: Vec<PeopleGroupRecord>, query: &RadiusQuery) -> Vec<PeopleGroupRecord> {
    let received = records.len();
    let tagged: Vec<_> = records
        .into_iter()
        .map(|mut record| {
            record.group_type = Some(GroupType::Fpg);
            record
        })
        .collect();
    let matched = within_radius(&tagged, query);
    if matched.len() < received {
        debug!(
            "dropped {} remote records without a location inside the radius",
            received - matched.len()
        );
    }
    matched
}

fn merge_local_frontier(fpgs: &mut Vec<PeopleGroupRecord>, local: Vec<PeopleGroupRecord>) {
    if local.is_empty() {
        return;
    }
    for record in local {
        if !fpgs.iter().any(|existing| existing.id == record.id) {
            fpgs.push(record);
        }
    }
    sort_by_distance(fpgs);
}
