//! Remote registry adapters.
//!
//! [`HttpRegistryClient`] implements [`frontier_core::RemoteRegistry`] over
//! the registry's HTTP search endpoint.

mod http;

pub use http::{
    ClientBuildError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    HttpRegistryClient, HttpRegistryConfig,
};
