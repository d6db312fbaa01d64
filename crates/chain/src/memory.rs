//! In-memory plan source, for tests and offline runs from a snapshot file.

use crate::source::{PlanSource, Result};
use async_trait::async_trait;
use keeper_core::{Address, Plan, Timestamp};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A fixed snapshot of the contract state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryPlanSource {
    /// Scheduler contract
    pub contract: Address,

    /// Chain time of the snapshot
    pub timestamp: Timestamp,

    /// Plans in contract order
    pub plans: Vec<Plan>,
}

impl MemoryPlanSource {
    /// Create a snapshot.
    pub fn new(contract: Address, timestamp: Timestamp, plans: Vec<Plan>) -> Self {
        Self {
            contract,
            timestamp,
            plans,
        }
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait]
impl PlanSource for MemoryPlanSource {
    fn contract(&self) -> Address {
        self.contract
    }

    async fn plans(&self) -> Result<Vec<Plan>> {
        Ok(self.plans.clone())
    }

    async fn latest_timestamp(&self) -> Result<Timestamp> {
        Ok(self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_snapshot_file() {
        let contract = Address::repeat_byte(0xcc);
        let plan = Plan::new(Address::repeat_byte(1), Address::repeat_byte(2), Address::repeat_byte(3))
            .with_next_execution_time(500);
        let snapshot = MemoryPlanSource::new(contract, 1_000, vec![plan.clone()]);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&snapshot).unwrap()).unwrap();

        let loaded = MemoryPlanSource::from_file(file.path()).unwrap();
        assert_eq!(loaded.contract(), contract);
        assert_eq!(loaded.latest_timestamp().await.unwrap(), 1_000);
        assert_eq!(loaded.plans().await.unwrap(), vec![plan]);
    }
}
