//! Identifiers derived from plans and gauges.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// Fingerprint addressing a plan in the scheduler contract.
///
/// Computed off-chain exactly as the contract computes it on `addPlan`,
/// see [`crate::Plan::execution_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionKey(pub B256);

impl ExecutionKey {
    /// Raw 32 bytes.
    pub fn as_b256(&self) -> B256 {
        self.0
    }
}

impl std::fmt::Display for ExecutionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Governance proposal a gauge maps to for one bribe market.
///
/// Recomputed on every run; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub B256);

impl ProposalId {
    /// Raw 32 bytes.
    pub fn as_b256(&self) -> B256 {
        self.0
    }
}

impl std::fmt::Display for ProposalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ProposalId {
    type Err = alloy_primitives::hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
