//! The persisted, capped shortlist of selected people groups.
//!
//! A [`ShortlistStore`] holds only record ids. Membership is loaded from a
//! [`ShortlistBackend`], changed in memory and written back whole, so two
//! concurrent writers can lose an update (last write wins).
//!
//! Capacity is enforced by refusing overflow: once the store is full, further
//! ids are reported as rejected and existing members are never evicted.

use std::collections::HashMap;
use std::error::Error as StdError;

use log::debug;
use thiserror::Error;

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{DEFAULT_SHORTLIST_DOCUMENT, SqliteShortlistBackend, SqliteShortlistError};

/// Maximum number of shortlist members.
pub const SHORTLIST_CAPACITY: usize = 100;

/// A set of record ids that remembers insertion order for display.
///
/// Each member maps to its insertion sequence number, so membership tests,
/// insertion and removal are constant time.
#[derive(Debug, Clone, Default)]
pub struct Membership {
    members: HashMap<String, u64>,
    next: u64,
}

impl Membership {
    /// An empty membership set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is a member.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains_key(id)
    }

    /// Add `id`, returning `false` when it was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.members.contains_key(id) {
            return false;
        }
        self.members.insert(id.to_owned(), self.next);
        self.next += 1;
        true
    }

    /// Remove `id`, returning `false` when it was absent.
    pub fn remove(&mut self, id: &str) -> bool {
        self.members.remove(id).is_some()
    }

    /// Member count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ordered: Vec<(&String, u64)> =
            self.members.iter().map(|(id, seq)| (id, *seq)).collect();
        ordered.sort_unstable_by_key(|(_, seq)| *seq);
        ordered.into_iter().map(|(id, _)| id.clone()).collect()
    }
}

impl PartialEq for Membership {
    fn eq(&self, other: &Self) -> bool {
        self.ids() == other.ids()
    }
}

impl Eq for Membership {}

impl<S: AsRef<str>> FromIterator<S> for Membership {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut membership = Self::new();
        for id in iter {
            membership.insert(id.as_ref());
        }
        membership
    }
}

#[cfg(feature = "serde")]
impl Membership {
    /// Encode as a JSON object mapping each id to `true`.
    ///
    /// # Examples
    /// ```
    /// use frontier_core::Membership;
    ///
    /// let membership: Membership = ["tubu-chad", "hausa-niger"].into_iter().collect();
    /// assert_eq!(membership.to_document(), r#"{"tubu-chad":true,"hausa-niger":true}"#);
    /// ```
    #[must_use]
    pub fn to_document(&self) -> String {
        let map: serde_json::Map<String, serde_json::Value> = self
            .ids()
            .into_iter()
            .map(|id| (id, serde_json::Value::Bool(true)))
            .collect();
        serde_json::Value::Object(map).to_string()
    }

    /// Decode a JSON membership object. Keys whose value is not `true` are
    /// not members.
    pub fn from_document(document: &str) -> Result<Self, serde_json::Error> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(document)?;
        Ok(map
            .iter()
            .filter(|(_, present)| present.as_bool() == Some(true))
            .map(|(id, _)| id)
            .collect())
    }
}

/// Errors raised by [`ShortlistBackend`] implementations.
#[derive(Debug, Error)]
pub enum ShortlistError {
    /// Reading or writing the persisted membership failed.
    #[error("failed to {operation} shortlist: {source}")]
    Backend {
        /// The attempted operation, such as `"load"` or `"store"`.
        operation: &'static str,
        /// Underlying storage error.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl ShortlistError {
    /// Wrap a storage error raised during `operation`.
    pub fn backend<E>(operation: &'static str, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Backend {
            operation,
            source: Box::new(source),
        }
    }
}

/// Persistence for a single shortlist document.
pub trait ShortlistBackend {
    /// Read the current membership. A missing document is empty.
    fn load(&self) -> Result<Membership, ShortlistError>;

    /// Replace the persisted membership.
    fn store(&self, membership: &Membership) -> Result<(), ShortlistError>;
}

impl<T: ShortlistBackend + ?Sized> ShortlistBackend for &T {
    fn load(&self) -> Result<Membership, ShortlistError> {
        (**self).load()
    }

    fn store(&self, membership: &Membership) -> Result<(), ShortlistError> {
        (**self).store(membership)
    }
}

/// How an [`ShortlistStore::add`] call was applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOutcome {
    /// Ids newly inserted, in presentation order.
    pub accepted: Vec<String>,
    /// Ids that were already members.
    pub already_present: Vec<String>,
    /// Ids refused because the shortlist was full, or because they were blank.
    pub rejected: Vec<String>,
}

impl AddOutcome {
    /// Whether any id was refused.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// Capacity-bounded shortlist over a [`ShortlistBackend`].
///
/// # Examples
/// ```
/// use frontier_core::ShortlistStore;
/// use frontier_core::test_support::MemoryShortlistBackend;
///
/// let store = ShortlistStore::new(MemoryShortlistBackend::default());
/// let outcome = store.add(["tubu-chad", "tubu-chad"])?;
/// assert_eq!(outcome.accepted, vec!["tubu-chad"]);
/// assert_eq!(outcome.already_present, vec!["tubu-chad"]);
///
/// assert!(!store.remove("hausa-niger")?);
/// assert_eq!(store.members()?, vec!["tubu-chad"]);
/// # Ok::<(), frontier_core::ShortlistError>(())
/// ```
#[derive(Debug)]
pub struct ShortlistStore<B> {
    backend: B,
    capacity: usize,
}

impl<B: ShortlistBackend> ShortlistStore<B> {
    /// A store holding at most [`SHORTLIST_CAPACITY`] members.
    pub const fn new(backend: B) -> Self {
        Self::with_capacity(backend, SHORTLIST_CAPACITY)
    }

    /// A store with a custom capacity.
    pub const fn with_capacity(backend: B, capacity: usize) -> Self {
        Self { backend, capacity }
    }

    /// Maximum member count.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Add `ids` in order until the store is full.
    ///
    /// Ids already present are left alone. The backend is written only when
    /// at least one id was accepted.
    pub fn add<I>(&self, ids: I) -> Result<AddOutcome, ShortlistError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut membership = self.backend.load()?;
        let mut outcome = AddOutcome::default();
        for id in ids {
            let id = id.as_ref();
            if id.trim().is_empty() {
                outcome.rejected.push(id.to_owned());
            } else if membership.contains(id) {
                outcome.already_present.push(id.to_owned());
            } else if membership.len() >= self.capacity {
                outcome.rejected.push(id.to_owned());
            } else {
                membership.insert(id);
                outcome.accepted.push(id.to_owned());
            }
        }
        if !outcome.accepted.is_empty() {
            self.backend.store(&membership)?;
        }
        if outcome.is_truncated() {
            debug!(
                "shortlist refused {} ids at {} of {} members",
                outcome.rejected.len(),
                membership.len(),
                self.capacity
            );
        }
        Ok(outcome)
    }

    /// Remove `id`, returning whether it was a member. Absent ids are a no-op.
    pub fn remove(&self, id: &str) -> Result<bool, ShortlistError> {
        let mut membership = self.backend.load()?;
        if !membership.remove(id) {
            return Ok(false);
        }
        self.backend.store(&membership)?;
        Ok(true)
    }

    /// Current members in insertion order.
    pub fn members(&self) -> Result<Vec<String>, ShortlistError> {
        Ok(self.backend.load()?.ids())
    }

    /// Whether `id` is a member.
    pub fn contains(&self, id: &str) -> Result<bool, ShortlistError> {
        Ok(self.backend.load()?.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryShortlistBackend;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> ShortlistStore<MemoryShortlistBackend> {
        ShortlistStore::new(MemoryShortlistBackend::default())
    }

    fn ids(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("group-{i:03}")).collect()
    }

    #[rstest]
    fn add_is_idempotent(store: ShortlistStore<MemoryShortlistBackend>) {
        store.add(["tubu-chad"]).expect("first add");
        let outcome = store.add(["tubu-chad"]).expect("second add");
        assert!(outcome.accepted.is_empty());
        assert_eq!(store.members().expect("members"), vec!["tubu-chad"]);
    }

    #[rstest]
    fn refuses_overflow_in_presentation_order(store: ShortlistStore<MemoryShortlistBackend>) {
        let all = ids(105);
        let outcome = store.add(&all).expect("add");
        assert_eq!(outcome.accepted.len(), SHORTLIST_CAPACITY);
        assert_eq!(outcome.rejected, all[100..].to_vec());
        assert_eq!(store.members().expect("members"), all[..100].to_vec());
    }

    #[rstest]
    fn full_store_keeps_existing_members(store: ShortlistStore<MemoryShortlistBackend>) {
        store.add(ids(100)).expect("fill");
        let outcome = store.add(["late-arrival"]).expect("overflow");
        assert!(outcome.is_truncated());
        assert!(!store.contains("late-arrival").expect("lookup"));
        assert!(store.contains("group-000").expect("lookup"));
    }

    #[rstest]
    fn removal_frees_capacity(store: ShortlistStore<MemoryShortlistBackend>) {
        store.add(ids(100)).expect("fill");
        assert!(store.remove("group-050").expect("remove"));
        let outcome = store.add(["replacement"]).expect("add");
        assert_eq!(outcome.accepted, vec!["replacement"]);
    }

    #[rstest]
    fn removing_absent_id_does_not_write(store: ShortlistStore<MemoryShortlistBackend>) {
        assert!(!store.remove("missing").expect("remove"));
        assert_eq!(store.backend.stores(), 0);
    }

    #[rstest]
    fn blank_ids_are_rejected(store: ShortlistStore<MemoryShortlistBackend>) {
        let outcome = store.add(["", "  "]).expect("add");
        assert_eq!(outcome.rejected.len(), 2);
        assert_eq!(store.backend.stores(), 0);
    }

    #[rstest]
    fn membership_keeps_insertion_order_after_removal() {
        let mut membership: Membership = ["a", "b", "c"].into_iter().collect();
        assert!(membership.remove("b"));
        assert!(!membership.remove("b"));
        assert_eq!(membership.ids(), ["a", "c"]);
    }

    #[rstest]
    fn reinserted_member_moves_to_the_end() {
        let mut membership: Membership = ["a", "b", "c"].into_iter().collect();
        assert!(membership.remove("a"));
        assert!(membership.insert("a"));
        assert_eq!(membership.ids(), ["b", "c", "a"]);
        assert_eq!(membership.len(), 3);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn documents_ignore_non_true_values() {
        let membership = Membership::from_document(r#"{"a":true,"b":false,"c":1}"#)
            .expect("valid document");
        assert_eq!(membership.ids(), ["a"]);
    }
}
