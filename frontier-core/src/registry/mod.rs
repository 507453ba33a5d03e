//! Query the remote people-group registry.
//!
//! The `RemoteRegistry` trait abstracts the authoritative HTTP registry so the
//! search service can be exercised with in-memory doubles. Implementations
//! return records already classified as frontier groups.
//!
//! Failures are described by [`RemoteRegistryError`]; the search service
//! treats every variant as a partial failure of the FPG branch.

mod error;
mod provider;

pub use error::RemoteRegistryError;
pub use provider::RemoteRegistry;
