//! Plan source backed by a node's JSON-RPC endpoint.

use crate::source::{ChainError, PlanSource, Result};
use alloy::eips::BlockNumberOrTag;
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::transports::http::Http;
use async_trait::async_trait;
use keeper_core::abi::{v1, v2};
use keeper_core::{Address, ContractVersion, Plan, Timestamp};
use reqwest::{Client, ClientBuilder, Url};
use std::time::Duration;
use tracing::debug;

/// Provider over a timeout-bound HTTP client.
pub type HttpProvider = RootProvider<Http<Client>>;

/// Reads plans with `getPlans()` and time from the latest block header.
pub struct RpcPlanSource {
    /// Node connection
    provider: HttpProvider,

    /// Scheduler contract
    contract: Address,

    /// Plan layout
    version: ContractVersion,
}

impl RpcPlanSource {
    /// Create a source for `contract` on the node at `url`.
    ///
    /// `timeout` bounds every request to the node.
    pub fn new(
        url: &str,
        contract: Address,
        version: ContractVersion,
        timeout: Duration,
    ) -> Result<Self> {
        let url: Url = url
            .parse()
            .map_err(|_| ChainError::InvalidUrl(url.to_string()))?;
        let client = ClientBuilder::new().timeout(timeout).build()?;

        let transport = Http::with_client(client, url);
        let provider = ProviderBuilder::new().on_client(RpcClient::new(transport, false));

        Ok(Self {
            provider,
            contract,
            version,
        })
    }

    /// The underlying provider.
    pub fn provider(&self) -> &HttpProvider {
        &self.provider
    }
}

#[async_trait]
impl PlanSource for RpcPlanSource {
    fn contract(&self) -> Address {
        self.contract
    }

    async fn plans(&self) -> Result<Vec<Plan>> {
        let plans: Vec<Plan> = match self.version {
            ContractVersion::V1 => v1::IBriber::new(self.contract, &self.provider)
                .getPlans()
                .call()
                .await?
                ._0
                .into_iter()
                .map(Plan::from)
                .collect(),
            ContractVersion::V2 => v2::IBriber::new(self.contract, &self.provider)
                .getPlans()
                .call()
                .await?
                ._0
                .into_iter()
                .map(Plan::from)
                .collect(),
        };

        debug!("Fetched {} plans from {}", plans.len(), self.contract);
        Ok(plans)
    }

    async fn latest_timestamp(&self) -> Result<Timestamp> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest, false.into())
            .await?
            .ok_or_else(|| ChainError::Malformed("node returned no latest block".to_string()))?;

        Ok(block.header.timestamp)
    }
}
