//! Gauge to proposal resolution.
//!
//! Each bribe market identifies the thing being bribed differently. A
//! [`GaugeResolver`] turns a gauge address into the proposal id its market
//! expects, and the [`ResolverRegistry`] picks the resolver by market.
//! Supporting another market means registering another resolver; nothing
//! upstream changes.

#![warn(missing_docs)]

pub mod resolver;
pub mod registry;
pub mod balancer;
pub mod aura;

pub use resolver::{GaugeResolver, ResolveError, Result};
pub use registry::{Resolution, ResolverRegistry, AURA_BRIBE_ADDRESS, BALANCER_BRIBE_ADDRESS};
pub use balancer::BalancerResolver;
pub use aura::{AuraDirectory, AuraResolver, GaugeLabel, HttpAuraDirectory, ProposalRecord};
