//! Behavioural tests for `ShortlistStore` using rstest-bdd.

use std::cell::RefCell;

use frontier_core::{
    AddOutcome, ShortlistStore, test_support::MemoryShortlistBackend,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug, Default)]
struct ShortlistWorld {
    store: RefCell<Option<ShortlistStore<MemoryShortlistBackend>>>,
    presented: RefCell<Vec<String>>,
    added: RefCell<Option<AddOutcome>>,
    removed: RefCell<Option<bool>>,
}

impl ShortlistWorld {
    fn with_store<T>(&self, f: impl FnOnce(&ShortlistStore<MemoryShortlistBackend>) -> T) -> T {
        let borrowed = self.store.borrow();
        let store = borrowed
            .as_ref()
            .expect("shortlist should be initialised by a Given step");
        f(store)
    }

    fn added(&self) -> AddOutcome {
        self.added
            .borrow()
            .clone()
            .expect("an add step should have run")
    }
}

#[fixture]
fn world() -> ShortlistWorld {
    ShortlistWorld::default()
}

fn unquote(raw: &str) -> &str {
    raw.trim_matches('"')
}

#[given("an empty shortlist")]
fn given_empty(world: &ShortlistWorld) {
    world
        .store
        .replace(Some(ShortlistStore::new(MemoryShortlistBackend::default())));
}

#[given("a shortlist containing {id}")]
fn given_member(world: &ShortlistWorld, id: String) {
    let backend = MemoryShortlistBackend::with_ids([unquote(&id)]);
    world.store.replace(Some(ShortlistStore::new(backend)));
}

#[when("I add the id {id}")]
fn add_one(world: &ShortlistWorld, id: String) {
    let outcome = world.with_store(|store| store.add([unquote(&id)]).expect("add succeeds"));
    world.added.replace(Some(outcome));
}

#[when("I add {count} distinct ids")]
fn add_many(world: &ShortlistWorld, count: usize) {
    let ids: Vec<String> = (0..count).map(|i| format!("group-{i:03}-chad")).collect();
    let outcome = world.with_store(|store| store.add(&ids).expect("add succeeds"));
    world.presented.replace(ids);
    world.added.replace(Some(outcome));
}

#[when("I remove the id {id}")]
fn remove_one(world: &ShortlistWorld, id: String) {
    let removed = world.with_store(|store| store.remove(unquote(&id)).expect("remove succeeds"));
    world.removed.replace(Some(removed));
}

#[then("the shortlist size is {count}")]
fn then_size(world: &ShortlistWorld, count: usize) {
    let members = world.with_store(|store| store.members().expect("members load"));
    assert_eq!(members.len(), count);
}

#[then("no id was accepted")]
fn then_none_accepted(world: &ShortlistWorld) {
    let outcome = world.added();
    assert!(outcome.accepted.is_empty());
    assert_eq!(outcome.already_present.len(), 1);
}

#[then("the last {count} ids were rejected")]
fn then_last_rejected(world: &ShortlistWorld, count: usize) {
    let presented = world.presented.borrow();
    let expected = presented[presented.len() - count..].to_vec();
    assert_eq!(world.added().rejected, expected);
}

#[then("the removal reported no change")]
fn then_no_change(world: &ShortlistWorld) {
    assert_eq!(*world.removed.borrow(), Some(false));
}

#[scenario(path = "tests/features/shortlist.feature", index = 0)]
fn idempotent_add(world: ShortlistWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/shortlist.feature", index = 1)]
fn capacity_refuses_overflow(world: ShortlistWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/shortlist.feature", index = 2)]
fn absent_removal_is_noop(world: ShortlistWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/shortlist.feature", index = 3)]
fn removal_frees_slot(world: ShortlistWorld) {
    let _ = world;
}
