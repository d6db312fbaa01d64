//! Read access to the bribe scheduler contract.
//!
//! A run needs two things from the chain: the current plan list and the
//! latest block timestamp. [`PlanSource`] abstracts both so the keeper can
//! run against a live node or an in-memory snapshot.

#![warn(missing_docs)]

pub mod source;
pub mod rpc;
pub mod memory;

pub use source::{ChainError, PlanSource, Result};
pub use rpc::{HttpProvider, RpcPlanSource};
pub use memory::MemoryPlanSource;
