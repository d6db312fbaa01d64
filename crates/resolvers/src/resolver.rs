//! Resolver abstraction.

use alloy_primitives::Address;
use async_trait::async_trait;
use keeper_core::ProposalId;

/// Result type for resolver lookups.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Failures talking to a lookup service.
///
/// A gauge with no mapping is not an error; resolvers report it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport failure, including timeouts
    #[error("request to {url} failed: {source}")]
    Http {
        /// Requested URL
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response
    #[error("request to {url} returned status {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Response body did not have the expected shape
    #[error("malformed response from {url}: {reason}")]
    Malformed {
        /// Requested URL
        url: String,
        /// What was wrong
        reason: String,
    },
}

impl ResolveError {
    /// Whether the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http { source, .. } if source.is_timeout())
    }
}

/// Converts a gauge into the proposal id one bribe market expects.
///
/// Implementations must be free of side effects so the caller can retry
/// a whole run after a transient failure.
#[async_trait]
pub trait GaugeResolver: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Look up the proposal for `gauge`.
    ///
    /// `Ok(None)` means the market has no proposal for this gauge.
    async fn resolve(&self, gauge: Address) -> Result<Option<ProposalId>>;
}
