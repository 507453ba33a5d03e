//! Core domain for Frontier Finder.
//!
//! People-group records from every source are normalised into
//! [`PeopleGroupRecord`]. The matcher selects records within a radius of an
//! origin, [`RegistryService`] merges the remote registry with the local
//! catalogue, and [`ShortlistStore`] curates a capped list of selected ids.
//!
//! Constructors validate their input and return `Result`, so invalid
//! coordinates or radii are rejected before any source is consulted.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod catalogue;
mod geodesy;
mod matcher;
mod record;
mod refine;
pub mod registry;
mod search;
pub mod shortlist;

#[doc(hidden)]
pub mod test_support;

pub use catalogue::LocalCatalogue;
pub use geodesy::{
    CoordinateError, Coordinates, DistanceUnit, EARTH_RADIUS_KM, KM_PER_MILE, distance_between,
};
pub use matcher::{RadiusQuery, sort_by_distance, within_radius};
pub use record::{FPG_THRESHOLD, GroupType, PeopleGroupRecord, RecordError, derive_id};
pub use refine::{Facets, ResultFilter, SortKey};
pub use registry::{RemoteRegistry, RemoteRegistryError};
pub use search::{
    RegistryService, SearchError, SearchOutcome, SearchRequest, TypeFilter, ValidationError,
};
pub use shortlist::{
    AddOutcome, Membership, SHORTLIST_CAPACITY, ShortlistBackend, ShortlistError, ShortlistStore,
};
#[cfg(feature = "store-sqlite")]
pub use shortlist::{DEFAULT_SHORTLIST_DOCUMENT, SqliteShortlistBackend, SqliteShortlistError};
