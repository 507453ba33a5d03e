//! HTTP-based `RemoteRegistry` for the people-groups search endpoint.
//!
//! The [`RemoteRegistry`] trait is synchronous so the core stays usable from
//! plain threads. This client bridges to async `reqwest` calls by blocking on
//! a Tokio runtime it owns.

use std::time::Duration;

use frontier_core::{PeopleGroupRecord, RadiusQuery, RemoteRegistry, RemoteRegistryError};
use log::{debug, warn};
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use crate::normalize::parse_remote_value;

/// Default registry API root.
pub const DEFAULT_BASE_URL: &str = "https://api.joshuaproject.net/v1";

/// Default user agent for registry requests.
pub const DEFAULT_USER_AGENT: &str = "frontier-finder/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENDPOINT: &str = "people_groups.json";
const REDACTED: &str = "REDACTED";

/// Error type for [`HttpRegistryClient`] construction failures.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The base URL could not be parsed.
    #[error("invalid registry base URL {url}: {source}")]
    InvalidBaseUrl {
        /// Offending URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`HttpRegistryClient`].
#[derive(Clone)]
pub struct HttpRegistryConfig {
    /// API root, e.g. `"https://api.joshuaproject.net/v1"`.
    pub base_url: String,
    /// API credential. Without one every lookup fails fast.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for HttpRegistryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRegistryConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for HttpRegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpRegistryConfig {
    /// Create a configuration for the given API root.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the API credential. Blank keys count as missing.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.trim().is_empty()).then_some(api_key);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Remote registry client over HTTP.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the client blocks on its own current-thread
/// runtime. Inside a multi-threaded runtime it uses
/// [`tokio::task::block_in_place`] on the caller's handle. Inside a
/// `current_thread` runtime it falls back to its own runtime, which blocks
/// the caller's executor for the duration of the request.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use frontier_core::{Coordinates, DistanceUnit, RadiusQuery, RemoteRegistry};
/// use frontier_data::registry::{HttpRegistryClient, HttpRegistryConfig};
///
/// let config = HttpRegistryConfig::new("https://api.joshuaproject.net/v1")
///     .with_api_key("secret")
///     .with_timeout(Duration::from_secs(10));
/// let client = HttpRegistryClient::with_config(config)?;
///
/// let origin = Coordinates::new(12.1348, 15.0557)?;
/// let query = RadiusQuery::new(origin, 100.0, DistanceUnit::Kilometres)?;
/// let groups = client.find_frontier_groups(&query)?;
/// println!("{} frontier groups", groups.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct HttpRegistryClient {
    client: Client,
    config: HttpRegistryConfig,
    endpoint: Url,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpRegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRegistryClient")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint.as_str())
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl HttpRegistryClient {
    /// Create a client for `base_url` with default settings and no
    /// credential.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(HttpRegistryConfig::new(base_url))
    }

    /// Create a client with explicit configuration.
    pub fn with_config(config: HttpRegistryConfig) -> Result<Self, ClientBuildError> {
        let root = config.base_url.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{root}/{ENDPOINT}")).map_err(|source| {
            ClientBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            }
        })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            endpoint,
            runtime,
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &HttpRegistryConfig {
        &self.config
    }

    /// Build the search URL for `query`.
    ///
    /// Coordinates use six decimal places and the radius is rounded up to a
    /// whole number, since results are re-matched against the exact radius.
    fn search_url(&self, query: &RadiusQuery, api_key: &str) -> Url {
        let origin = query.origin();
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("api_key", api_key)
            .append_pair("latitude", &format!("{:.6}", origin.latitude()))
            .append_pair("longitude", &format!("{:.6}", origin.longitude()))
            .append_pair("radius", &format!("{:.0}", query.radius().ceil()))
            .append_pair("rad_units", query.unit().as_str())
            .append_pair("is_frontier", "Y");
        url
    }

    async fn fetch(&self, url: Url, shown: &str) -> Result<Vec<PeopleGroupRecord>, RemoteRegistryError> {
        debug!("querying remote registry: {shown}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, shown))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, shown))?;
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, shown))?;
        decode_body(&body)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RemoteRegistryError {
        if error.is_timeout() {
            return RemoteRegistryError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return RemoteRegistryError::HttpStatus {
                url: url.to_owned(),
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_owned(),
            };
        }

        RemoteRegistryError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

fn decode_body(body: &str) -> Result<Vec<PeopleGroupRecord>, RemoteRegistryError> {
    let payload: serde_json::Value =
        serde_json::from_str(body).map_err(|err| RemoteRegistryError::MalformedBody {
            message: err.to_string(),
        })?;
    let report =
        parse_remote_value(&payload).map_err(|err| RemoteRegistryError::MalformedBody {
            message: err.to_string(),
        })?;
    for row in &report.skipped {
        warn!("remote registry entry {} skipped ({})", row.line, row.reason);
    }
    Ok(report.records)
}

fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "api_key" {
                REDACTED.to_owned()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}

impl RemoteRegistry for HttpRegistryClient {
    /// Query the registry for frontier groups around `query`'s origin.
    ///
    /// Fails with [`RemoteRegistryError::MissingCredential`] without touching
    /// the network when no API key is configured.
    fn find_frontier_groups(
        &self,
        query: &RadiusQuery,
    ) -> Result<Vec<PeopleGroupRecord>, RemoteRegistryError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(RemoteRegistryError::MissingCredential)?;
        let url = self.search_url(query, api_key);
        let shown = redact(&url);

        let future = self.fetch(url, &shown);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
