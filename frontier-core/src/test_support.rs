//! In-memory doubles for the remote registry and the shortlist backend, used
//! by unit, doc and behaviour tests.

use std::cell::{Cell, RefCell};

use crate::{
    Coordinates, Membership, PeopleGroupRecord, RadiusQuery, RemoteRegistry, RemoteRegistryError,
    ShortlistBackend, ShortlistError, derive_id,
};

/// Build a record in Chad with the given position and evangelical fraction.
///
/// Out-of-range coordinates leave the record without a location.
#[must_use]
pub fn sample_record(
    name: &str,
    latitude: f64,
    longitude: f64,
    evangelical: f64,
) -> PeopleGroupRecord {
    PeopleGroupRecord {
        id: derive_id(name, "Chad"),
        name: name.to_owned(),
        pronunciation: String::new(),
        country: "Chad".to_owned(),
        location: Coordinates::new(latitude, longitude).ok(),
        population: 10_000,
        language: format!("{name} language"),
        religion: "Islam".to_owned(),
        evangelical,
        group_type: None,
        distance: None,
    }
}

/// `RemoteRegistry` returning a fixed answer and counting calls.
#[derive(Debug)]
pub struct StubRemoteRegistry {
    answer: Result<Vec<PeopleGroupRecord>, RemoteRegistryError>,
    calls: Cell<usize>,
}

impl StubRemoteRegistry {
    /// A registry that always returns `records`.
    #[must_use]
    pub fn with_records(records: Vec<PeopleGroupRecord>) -> Self {
        Self {
            answer: Ok(records),
            calls: Cell::new(0),
        }
    }

    /// A registry that always fails with `error`.
    #[must_use]
    pub fn failing(error: RemoteRegistryError) -> Self {
        Self {
            answer: Err(error),
            calls: Cell::new(0),
        }
    }

    /// How many lookups were attempted.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl RemoteRegistry for StubRemoteRegistry {
    fn find_frontier_groups(
        &self,
        _query: &RadiusQuery,
    ) -> Result<Vec<PeopleGroupRecord>, RemoteRegistryError> {
        self.calls.set(self.calls.get() + 1);
        self.answer.clone()
    }
}

/// `ShortlistBackend` holding the membership in memory.
#[derive(Debug, Default)]
pub struct MemoryShortlistBackend {
    membership: RefCell<Membership>,
    stores: Cell<usize>,
}

impl MemoryShortlistBackend {
    /// A backend pre-populated with `ids`.
    #[must_use]
    pub fn with_ids<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            membership: RefCell::new(ids.into_iter().collect()),
            stores: Cell::new(0),
        }
    }

    /// Copy of the persisted membership.
    #[must_use]
    pub fn snapshot(&self) -> Membership {
        self.membership.borrow().clone()
    }

    /// How many writes were performed.
    #[must_use]
    pub fn stores(&self) -> usize {
        self.stores.get()
    }
}

impl ShortlistBackend for MemoryShortlistBackend {
    fn load(&self) -> Result<Membership, ShortlistError> {
        Ok(self.snapshot())
    }

    fn store(&self, membership: &Membership) -> Result<(), ShortlistError> {
        self.membership.replace(membership.clone());
        self.stores.set(self.stores.get() + 1);
        Ok(())
    }
}
