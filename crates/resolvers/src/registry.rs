//! Resolver registry, keyed by bribe market.

use crate::aura::{AuraResolver, HttpAuraDirectory};
use crate::balancer::BalancerResolver;
use crate::resolver::{GaugeResolver, Result};
use alloy_primitives::{address, Address};
use keeper_core::{KeeperConfig, ProposalId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Balancer bribe market on mainnet.
pub const BALANCER_BRIBE_ADDRESS: Address = address!("7Cdf753b45AB0729bcFe33DC12401E55d28308A9");

/// Aura bribe market on mainnet.
pub const AURA_BRIBE_ADDRESS: Address = address!("642c59937A62cf7dc92F70Fd78A13cEe0aa2Bd9c");

/// Outcome of a registry lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The gauge maps to this proposal
    Proposal(ProposalId),
    /// The market has no proposal for the gauge
    NoProposal,
    /// No resolver is registered for the market
    UnsupportedSource,
}

/// Registry mapping bribe markets to resolvers.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    resolvers: BTreeMap<Address, Arc<dyn GaugeResolver>>,
}

impl ResolverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            resolvers: BTreeMap::new(),
        }
    }

    /// Registry with the Balancer and Aura markets.
    pub fn with_defaults(config: &KeeperConfig) -> Result<Self> {
        let directory = HttpAuraDirectory::new(
            config.aura_gauges_url.clone(),
            config.hidden_hand_api.clone(),
            config.http_timeout(),
        )?;

        let mut registry = Self::new();
        registry.register(BALANCER_BRIBE_ADDRESS, Arc::new(BalancerResolver));
        registry.register(AURA_BRIBE_ADDRESS, Arc::new(AuraResolver::new(directory)));
        Ok(registry)
    }

    /// Register a resolver, returning the one it replaces.
    pub fn register(
        &mut self,
        source: Address,
        resolver: Arc<dyn GaugeResolver>,
    ) -> Option<Arc<dyn GaugeResolver>> {
        debug!("Registering {} resolver for {}", resolver.name(), source);
        self.resolvers.insert(source, resolver)
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, source: Address, resolver: Arc<dyn GaugeResolver>) -> Self {
        self.register(source, resolver);
        self
    }

    /// Unregister a resolver.
    pub fn unregister(&mut self, source: Address) -> Option<Arc<dyn GaugeResolver>> {
        self.resolvers.remove(&source)
    }

    /// Get the resolver for a market.
    pub fn get(&self, source: Address) -> Option<&Arc<dyn GaugeResolver>> {
        self.resolvers.get(&source)
    }

    /// Whether a market has a resolver.
    pub fn supports(&self, source: Address) -> bool {
        self.resolvers.contains_key(&source)
    }

    /// Registered markets, in address order.
    pub fn sources(&self) -> Vec<Address> {
        self.resolvers.keys().copied().collect()
    }

    /// Number of registered resolvers.
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Whether no resolvers are registered.
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Resolve `gauge` with the resolver registered for `source`.
    pub async fn resolve(&self, source: Address, gauge: Address) -> Result<Resolution> {
        let Some(resolver) = self.get(source) else {
            return Ok(Resolution::UnsupportedSource);
        };

        let resolution = match resolver.resolve(gauge).await? {
            Some(proposal) => Resolution::Proposal(proposal),
            None => Resolution::NoProposal,
        };

        debug!("{} resolved gauge {}: {:?}", resolver.name(), gauge, resolution);
        Ok(resolution)
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.resolvers.iter().map(|(k, v)| (k, v.name())))
            .finish()
    }
}
