//! Aura bribe market resolver.
//!
//! Aura bribes are placed on Hidden Hand proposals, which are titled with
//! the gauge's snapshot label. Resolution is two lookups: gauge address to
//! label from Aura's gauge choices, then label to proposal hash from
//! Hidden Hand.

use crate::resolver::{GaugeResolver, ResolveError, Result};
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use keeper_core::ProposalId;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// One entry of the gauge label directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GaugeLabel {
    /// Gauge address as published (any case)
    pub address: String,

    /// Snapshot choice label
    pub label: String,
}

/// One entry of the proposal directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRecord {
    /// Proposal title, equal to a gauge label
    pub title: String,

    /// Proposal hash as published
    pub proposal_hash: String,
}

#[derive(Deserialize)]
struct ProposalsResponse {
    data: Vec<Value>,
}

/// Entries of a published list that decode as `T`.
///
/// Directories carry records this keeper does not use; one that is
/// incomplete must not hide the rest.
fn decode_entries<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    let total = items.len();
    let entries: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if entries.len() < total {
        debug!("Skipped {} unreadable directory entries", total - entries.len());
    }
    entries
}

/// Source of the two directories the Aura resolver reads.
#[async_trait]
pub trait AuraDirectory: Send + Sync {
    /// All known gauge labels.
    async fn gauge_labels(&self) -> Result<Vec<GaugeLabel>>;

    /// All current Aura proposals.
    async fn proposals(&self) -> Result<Vec<ProposalRecord>>;
}

/// Directories fetched over HTTP.
#[derive(Clone)]
pub struct HttpAuraDirectory {
    /// HTTP client
    client: Client,

    /// Gauge choices JSON
    gauges_url: String,

    /// Hidden Hand API root
    hidden_hand_api: String,
}

impl HttpAuraDirectory {
    /// Create a directory client with a request timeout.
    pub fn new(gauges_url: String, hidden_hand_api: String, timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(ResolveError::Client)?;

        Ok(Self {
            client,
            gauges_url,
            hidden_hand_api: hidden_hand_api.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the Aura proposal list.
    pub fn proposals_url(&self) -> String {
        format!("{}/proposal/aura", self.hidden_hand_api)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ResolveError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|source| {
            if source.is_decode() {
                ResolveError::Malformed {
                    url: url.to_string(),
                    reason: source.to_string(),
                }
            } else {
                ResolveError::Http {
                    url: url.to_string(),
                    source,
                }
            }
        })
    }
}

#[async_trait]
impl AuraDirectory for HttpAuraDirectory {
    async fn gauge_labels(&self) -> Result<Vec<GaugeLabel>> {
        let items: Vec<Value> = self.get_json(&self.gauges_url).await?;
        Ok(decode_entries(items))
    }

    async fn proposals(&self) -> Result<Vec<ProposalRecord>> {
        let url = self.proposals_url();
        let response: ProposalsResponse = self.get_json(&url).await?;
        Ok(decode_entries(response.data))
    }
}

/// Resolves gauges through Aura's labels and Hidden Hand's proposals.
pub struct AuraResolver<D: AuraDirectory = HttpAuraDirectory> {
    directory: D,
}

impl<D: AuraDirectory> AuraResolver<D> {
    /// Create a resolver over a directory.
    pub fn new(directory: D) -> Self {
        Self { directory }
    }
}

/// Label for `gauge`, comparing addresses by value.
fn label_for(gauges: &[GaugeLabel], gauge: Address) -> Option<&str> {
    gauges
        .iter()
        .filter(|entry| !entry.label.is_empty())
        .find(|entry| entry.address.parse::<Address>().ok() == Some(gauge))
        .map(|entry| entry.label.as_str())
}

#[async_trait]
impl<D: AuraDirectory> GaugeResolver for AuraResolver<D> {
    fn name(&self) -> &str {
        "aura"
    }

    async fn resolve(&self, gauge: Address) -> Result<Option<ProposalId>> {
        let gauges = self.directory.gauge_labels().await?;

        let Some(label) = label_for(&gauges, gauge) else {
            debug!("No Aura label for gauge {}", gauge);
            return Ok(None);
        };

        let proposals = self.directory.proposals().await?;

        let Some(record) = proposals.iter().find(|p| p.title == label) else {
            debug!("No Hidden Hand proposal titled {:?}", label);
            return Ok(None);
        };

        // Published but not yet hashed.
        if record.proposal_hash.is_empty() {
            debug!("Proposal {:?} has no hash yet", label);
            return Ok(None);
        }

        let hash: B256 = record
            .proposal_hash
            .parse()
            .map_err(|_| ResolveError::Malformed {
                url: "aura proposals".to_string(),
                reason: format!("bad proposal hash {:?}", record.proposal_hash),
            })?;

        Ok(Some(ProposalId(hash)))
    }
}
