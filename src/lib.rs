//! Facade crate for Frontier Finder.
//!
//! This crate re-exports the core domain types and exposes the optional HTTP
//! registry client and SQLite shortlist backend behind feature flags.

#![forbid(unsafe_code)]

pub use frontier_core::{
    AddOutcome, CoordinateError, Coordinates, DistanceUnit, EARTH_RADIUS_KM, FPG_THRESHOLD,
    Facets, GroupType, LocalCatalogue, Membership, PeopleGroupRecord, RadiusQuery, RecordError,
    RegistryService, RemoteRegistry, RemoteRegistryError, ResultFilter, SHORTLIST_CAPACITY,
    SearchError, SearchOutcome, SearchRequest, ShortlistBackend, ShortlistError, ShortlistStore,
    SortKey, TypeFilter, ValidationError, derive_id, distance_between, sort_by_distance,
    within_radius,
};

#[cfg(feature = "store-sqlite")]
pub use frontier_core::{DEFAULT_SHORTLIST_DOCUMENT, SqliteShortlistBackend, SqliteShortlistError};

#[cfg(feature = "registry-http")]
pub use frontier_data::{
    LoadError,
    normalize::{ParseError, ParseReport, SkippedRow, SourceKind, parse},
    registry::{HttpRegistryClient, HttpRegistryConfig},
};
