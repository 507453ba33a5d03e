//! Data access for Frontier Finder.
//!
//! Responsibilities:
//! - Normalise the local delimited files and the remote registry's JSON into
//!   [`frontier_core::PeopleGroupRecord`] values.
//! - Load the local catalogue from disk.
//! - Provide the HTTP adapter behind [`frontier_core::RemoteRegistry`].
//!
//! Boundaries:
//! - Do not encode search or shortlist rules (live in `frontier-core`).
//! - Keep credentials out of logs and error messages.

pub mod normalize;
pub mod registry;

mod local;

pub use local::{LoadError, load_catalogue, load_dataset};
