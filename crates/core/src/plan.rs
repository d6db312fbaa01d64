//! Plan model - one scheduled recurring bribe.

use crate::abi::{v1, v2};
use crate::id::ExecutionKey;
use crate::Timestamp;
use alloy_primitives::{keccak256, Address, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

/// A scheduled recurring bribe payment, as read from the scheduler contract.
///
/// Plans are snapshots: a run reads them once and never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Bribe market the plan pays into (`hhBriber` on chain)
    pub source: Address,

    /// Voting target being bribed
    pub gauge: Address,

    /// Payment token
    pub token: Address,

    /// Payment per execution
    pub amount: U256,

    /// Seconds between executions
    pub interval: U256,

    /// Earliest time the plan may execute again
    pub next_execution_time: U256,

    /// Executions left before the contract removes the plan
    pub remaining_epochs: U256,

    /// Fields only present on second generation contracts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<PlanExtension>,
}

/// Extra plan fields introduced by the second contract generation.
///
/// Opaque to selection; they only feed the execution key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanExtension {
    /// Creation time of the plan
    pub created_at: U256,

    /// Whether a missed epoch may be skipped
    pub can_skip: bool,

    /// Whether the amount is fixed rather than a share
    pub is_fixed: bool,
}

impl Plan {
    /// Create a first generation plan.
    pub fn new(source: Address, gauge: Address, token: Address) -> Self {
        Self {
            source,
            gauge,
            token,
            amount: U256::ZERO,
            interval: U256::ZERO,
            next_execution_time: U256::ZERO,
            remaining_epochs: U256::ZERO,
            extension: None,
        }
    }

    /// Set the next execution time.
    pub fn with_next_execution_time(mut self, at: Timestamp) -> Self {
        self.next_execution_time = U256::from(at);
        self
    }

    /// Set amount and interval.
    pub fn with_schedule(mut self, amount: U256, interval: Timestamp, epochs: u64) -> Self {
        self.amount = amount;
        self.interval = U256::from(interval);
        self.remaining_epochs = U256::from(epochs);
        self
    }

    /// Attach second generation fields.
    pub fn with_extension(mut self, extension: PlanExtension) -> Self {
        self.extension = Some(extension);
        self
    }

    /// Whether the plan's cooldown has elapsed at `now`.
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_execution_time <= U256::from(now)
    }

    /// Key the contract uses to address this plan.
    ///
    /// `keccak256(abi.encodePacked(source, gauge, token))`, with
    /// `createdAt, canSkip, isFixed` appended for second generation plans.
    /// Field order and packing must match the contract byte for byte.
    pub fn execution_key(&self) -> ExecutionKey {
        let packed = match self.extension {
            None => (self.source, self.gauge, self.token).abi_encode_packed(),
            Some(ext) => (
                self.source,
                self.gauge,
                self.token,
                ext.created_at,
                ext.can_skip,
                ext.is_fixed,
            )
                .abi_encode_packed(),
        };
        ExecutionKey(keccak256(packed))
    }
}

impl From<v1::IBriber::Plan> for Plan {
    fn from(p: v1::IBriber::Plan) -> Self {
        Self {
            source: p.hhBriber,
            gauge: p.gauge,
            token: p.token,
            amount: p.amount,
            interval: p.interval,
            next_execution_time: p.nextExec,
            remaining_epochs: p.remainingEpochs,
            extension: None,
        }
    }
}

impl From<v2::IBriber::Plan> for Plan {
    fn from(p: v2::IBriber::Plan) -> Self {
        Self {
            source: p.hhBriber,
            gauge: p.gauge,
            token: p.token,
            amount: p.amount,
            interval: p.interval,
            next_execution_time: p.nextExec,
            remaining_epochs: p.remainingEpochs,
            extension: Some(PlanExtension {
                created_at: p.createdAt,
                can_skip: p.canSkip,
                is_fixed: p.isFixed,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const BALANCER: Address = address!("7Cdf753b45AB0729bcFe33DC12401E55d28308A9");
    const GAUGE: Address = address!("19A13793af96f534F0027b4b6a3eB699647368e7");
    const GEAR: Address = address!("Ba3335588D9403515223F109EdC4eB7269a9Ab5D");

    fn plan() -> Plan {
        Plan::new(BALANCER, GAUGE, GEAR)
    }

    #[test]
    fn test_key_is_packed_keccak_of_addresses() {
        let mut packed = Vec::with_capacity(60);
        packed.extend_from_slice(BALANCER.as_slice());
        packed.extend_from_slice(GAUGE.as_slice());
        packed.extend_from_slice(GEAR.as_slice());

        assert_eq!(plan().execution_key().as_b256(), keccak256(&packed));
    }

    #[test]
    fn test_key_is_deterministic() {
        assert_eq!(plan().execution_key(), plan().execution_key());
    }

    #[test]
    fn test_key_ignores_schedule_fields() {
        let scheduled = plan()
            .with_schedule(U256::from(100u64), 3600, 4)
            .with_next_execution_time(1_000);
        assert_eq!(scheduled.execution_key(), plan().execution_key());
    }

    #[test]
    fn test_key_changes_with_each_identifying_field() {
        let base = plan().execution_key();
        let other = Address::repeat_byte(0x11);

        assert_ne!(Plan::new(other, GAUGE, GEAR).execution_key(), base);
        assert_ne!(Plan::new(BALANCER, other, GEAR).execution_key(), base);
        assert_ne!(Plan::new(BALANCER, GAUGE, other).execution_key(), base);
    }

    #[test]
    fn test_key_field_order_matters() {
        let swapped = Plan::new(GAUGE, BALANCER, GEAR);
        assert_ne!(swapped.execution_key(), plan().execution_key());
    }

    #[test]
    fn test_extended_key_packing() {
        let ext = PlanExtension {
            created_at: U256::from(1_700_000_000u64),
            can_skip: true,
            is_fixed: false,
        };
        let extended = plan().with_extension(ext);

        let mut packed = Vec::with_capacity(94);
        packed.extend_from_slice(BALANCER.as_slice());
        packed.extend_from_slice(GAUGE.as_slice());
        packed.extend_from_slice(GEAR.as_slice());
        packed.extend_from_slice(&ext.created_at.to_be_bytes::<32>());
        packed.push(1);
        packed.push(0);

        assert_eq!(extended.execution_key().as_b256(), keccak256(&packed));
        assert_ne!(extended.execution_key(), plan().execution_key());

        let flipped = plan().with_extension(PlanExtension { is_fixed: true, ..ext });
        assert_ne!(flipped.execution_key(), extended.execution_key());
    }

    #[test]
    fn test_is_due_boundary() {
        let p = plan().with_next_execution_time(100);
        assert!(!p.is_due(99));
        assert!(p.is_due(100));
        assert!(p.is_due(101));
    }

    #[test]
    fn test_from_v1_abi() {
        let raw = v1::IBriber::Plan {
            hhBriber: BALANCER,
            gauge: GAUGE,
            token: GEAR,
            amount: U256::from(5u64),
            interval: U256::from(100u64),
            nextExec: U256::from(42u64),
            remainingEpochs: U256::from(2u64),
        };
        let p = Plan::from(raw);
        assert_eq!(p.source, BALANCER);
        assert_eq!(p.next_execution_time, U256::from(42u64));
        assert!(p.extension.is_none());
    }
}
