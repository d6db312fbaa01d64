//! Plan source abstraction.

use async_trait::async_trait;
use keeper_core::{Address, Plan, Timestamp};

/// Error type for chain reads.
pub type Result<T> = std::result::Result<T, ChainError>;

/// Errors that can occur reading from the chain.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// Node could not be reached or answered with an error, including timeouts
    #[error("RPC transport error: {0}")]
    Transport(#[from] alloy::transports::TransportError),

    /// `getPlans()` call failed or its return data did not decode
    #[error("contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),

    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// Node URL does not parse
    #[error("invalid RPC URL {0:?}")]
    InvalidUrl(String),

    /// Response did not have the expected shape
    #[error("malformed RPC response: {0}")]
    Malformed(String),

    /// Snapshot file problems
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read-only view of the scheduler contract.
///
/// Every call is a fresh read; implementations cache nothing across runs.
#[async_trait]
pub trait PlanSource: Send + Sync {
    /// Scheduler contract address.
    fn contract(&self) -> Address;

    /// Full current plan list, in contract order.
    async fn plans(&self) -> Result<Vec<Plan>>;

    /// Timestamp of the latest block.
    async fn latest_timestamp(&self) -> Result<Timestamp>;
}
