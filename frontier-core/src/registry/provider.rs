//! Remote registry trait.

use crate::{PeopleGroupRecord, RadiusQuery};

use super::error::RemoteRegistryError;

/// Look up frontier people groups around a point.
///
/// Implementations must tag every returned record with
/// [`GroupType::Fpg`](crate::GroupType::Fpg). Distances need not be set; the
/// search service recomputes them against the query origin.
///
/// # Examples
///
/// ```rust
/// use frontier_core::{
///     Coordinates, DistanceUnit, GroupType, PeopleGroupRecord, RadiusQuery, RemoteRegistry,
///     RemoteRegistryError,
/// };
///
/// struct Offline;
///
/// impl RemoteRegistry for Offline {
///     fn find_frontier_groups(
///         &self,
///         _query: &RadiusQuery,
///     ) -> Result<Vec<PeopleGroupRecord>, RemoteRegistryError> {
///         Err(RemoteRegistryError::MissingCredential)
///     }
/// }
///
/// let query = RadiusQuery::new(Coordinates::new(12.1, 15.0)?, 100.0, DistanceUnit::Kilometres)?;
/// assert_eq!(
///     Offline.find_frontier_groups(&query),
///     Err(RemoteRegistryError::MissingCredential)
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait RemoteRegistry {
    /// Return frontier groups within `query`'s radius of its origin.
    fn find_frontier_groups(
        &self,
        query: &RadiusQuery,
    ) -> Result<Vec<PeopleGroupRecord>, RemoteRegistryError>;
}

impl<T: RemoteRegistry + ?Sized> RemoteRegistry for Box<T> {
    fn find_frontier_groups(
        &self,
        query: &RadiusQuery,
    ) -> Result<Vec<PeopleGroupRecord>, RemoteRegistryError> {
        (**self).find_frontier_groups(query)
    }
}

impl<T: RemoteRegistry + ?Sized> RemoteRegistry for &T {
    fn find_frontier_groups(
        &self,
        query: &RadiusQuery,
    ) -> Result<Vec<PeopleGroupRecord>, RemoteRegistryError> {
        (**self).find_frontier_groups(query)
    }
}
