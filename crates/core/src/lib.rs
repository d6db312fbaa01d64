//! Bribe keeper core data models.
//!
//! Plans as read from the scheduler contract, the execution key that
//! addresses them, the decision a run produces, and the configuration a
//! run is parameterised with.

#![warn(missing_docs)]

pub mod abi;

mod id;
mod plan;
mod decision;
mod config;

pub use id::{ExecutionKey, ProposalId};
pub use plan::{Plan, PlanExtension};
pub use decision::{Action, ActionDecision, Reason};
pub use config::{
    parse_address, ConfigError, ContractVersion, KeeperConfig, SelectionMode, UserArgs,
    DEFAULT_AURA_GAUGES_URL, DEFAULT_HIDDEN_HAND_API, DEFAULT_HTTP_TIMEOUT_SECS,
};

pub use alloy_primitives::{Address, Bytes, B256, U256};

/// Chain time in unix seconds.
pub type Timestamp = u64;
