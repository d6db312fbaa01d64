//! Balancer bribe market resolver.

use crate::resolver::{GaugeResolver, Result};
use alloy_primitives::{keccak256, Address};
use async_trait::async_trait;
use keeper_core::ProposalId;

/// Balancer proposals are the keccak256 hash of the gauge address.
///
/// No I/O; every gauge resolves.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancerResolver;

impl BalancerResolver {
    /// Proposal id for `gauge`.
    pub fn proposal_for(gauge: Address) -> ProposalId {
        ProposalId(keccak256(gauge.as_slice()))
    }
}

#[async_trait]
impl GaugeResolver for BalancerResolver {
    fn name(&self) -> &str {
        "balancer"
    }

    async fn resolve(&self, gauge: Address) -> Result<Option<ProposalId>> {
        Ok(Some(Self::proposal_for(gauge)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[tokio::test]
    async fn test_resolves_to_packed_address_hash() {
        let gauge = address!("19A13793af96f534F0027b4b6a3eB699647368e7");
        let proposal = BalancerResolver.resolve(gauge).await.unwrap().unwrap();

        assert_eq!(proposal.as_b256(), keccak256(gauge.as_slice()));
    }

    #[tokio::test]
    async fn test_distinct_gauges_distinct_proposals() {
        let a = BalancerResolver.resolve(Address::repeat_byte(1)).await.unwrap();
        let b = BalancerResolver.resolve(Address::repeat_byte(2)).await.unwrap();
        assert_ne!(a, b);
    }
}
