use thiserror::Error;

/// Errors from [`crate::registry::RemoteRegistry::find_frontier_groups`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteRegistryError {
    /// No API credential was configured, so no request was sent.
    #[error("remote registry credential is not configured")]
    MissingCredential,
    /// The request failed before a response arrived.
    #[error("network error calling {url}: {message}")]
    Network {
        /// Request URL with the credential redacted.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL with the credential redacted.
        url: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },
    /// The registry answered with a non-success status.
    #[error("registry returned status {status} for {url}: {message}")]
    HttpStatus {
        /// Request URL with the credential redacted.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body excerpt or reason phrase.
        message: String,
    },
    /// The response body was not a JSON array of people groups.
    #[error("malformed registry response: {message}")]
    MalformedBody {
        /// Parser error description.
        message: String,
    },
}

impl RemoteRegistryError {
    /// Short machine-readable label for the failure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::Network { .. } => "network",
            Self::Timeout { .. } => "timeout",
            Self::HttpStatus { .. } => "http_status",
            Self::MalformedBody { .. } => "malformed_body",
        }
    }
}
