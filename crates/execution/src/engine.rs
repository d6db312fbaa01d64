//! The keeper run - one pass of the selection and decision pipeline.

use crate::{DecisionBuilder, PlanSelector, Selection, SelectionPolicy};
use keeper_chain::{ChainError, PlanSource, RpcPlanSource};
use keeper_core::{
    ActionDecision, ConfigError, ExecutionKey, KeeperConfig, Plan, Reason, Timestamp,
};
use keeper_resolvers::{ResolveError, ResolverRegistry};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Errors that fail a run.
///
/// Anything here means the caller should retry the whole run later; "nothing
/// to do" outcomes are reported as [`ActionDecision::NotExecutable`] instead.
#[derive(Debug, thiserror::Error)]
pub enum KeeperError {
    /// Bad configuration
    #[error("configuration error [{}]: {0}", .0.code())]
    Config(#[from] ConfigError),

    /// Chain read failed
    #[error("chain read failed: {0}")]
    Chain(#[from] ChainError),

    /// Gauge lookup failed
    #[error("gauge resolution failed: {0}")]
    Resolve(#[from] ResolveError),
}

/// A plan together with what a run would make of it.
#[derive(Debug, Clone, Serialize)]
pub struct PlanStatus {
    /// The plan
    pub plan: Plan,
    /// Its execution key
    pub key: ExecutionKey,
    /// Cooldown elapsed
    pub due: bool,
    /// A resolver is registered for its market
    pub supported: bool,
}

/// Selects and prepares at most one bribe execution per run.
///
/// ```text
/// Fetch Plans → Select → Resolve Gauge → Build Call
/// ```
pub struct Keeper<S: PlanSource> {
    source: S,
    registry: ResolverRegistry,
    selector: PlanSelector,
}

impl Keeper<RpcPlanSource> {
    /// Keeper against a live node, with the default resolvers.
    ///
    /// Fails before any I/O if the configuration is invalid.
    pub fn from_config(config: &KeeperConfig) -> Result<Self, KeeperError> {
        let contract = config.validate()?;
        let source = RpcPlanSource::new(
            &config.rpc_url,
            contract,
            config.contract_version,
            config.http_timeout(),
        )?;

        Ok(Keeper::new(source, ResolverRegistry::with_defaults(config)?)
            .with_selector(PlanSelector::new(SelectionPolicy::from_mode(config.selection))))
    }
}

impl<S: PlanSource> Keeper<S> {
    /// Create a keeper with the earliest-due policy.
    pub fn new(source: S, registry: ResolverRegistry) -> Self {
        Self {
            source,
            registry,
            selector: PlanSelector::default(),
        }
    }

    /// Set the plan selector.
    pub fn with_selector(mut self, selector: PlanSelector) -> Self {
        self.selector = selector;
        self
    }

    /// The resolver registry.
    pub fn registry(&self) -> &ResolverRegistry {
        &self.registry
    }

    /// The plan source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run once.
    pub async fn run(&self) -> Result<ActionDecision, KeeperError> {
        let contract = self.source.contract();
        info!("Starting keeper run for {}", contract);

        // 1. Snapshot the contract
        let plans = self.source.plans().await?;
        let now = self.source.latest_timestamp().await?;
        debug!("Fetched {} plans at chain time {}", plans.len(), now);

        // 2. Select
        let plan = match self
            .selector
            .select(plans, now, |p| self.registry.supports(p.source))
        {
            Selection::Selected(plan) => plan,
            Selection::Empty => {
                info!("No plans registered");
                return Ok(ActionDecision::NotExecutable(Reason::NoPlans));
            }
            Selection::NotYetExecutable => {
                info!("No plan is due");
                return Ok(ActionDecision::NotExecutable(Reason::NotYetExecutable));
            }
        };

        info!(
            "Selected plan {} (market {}, gauge {})",
            plan.execution_key(),
            plan.source,
            plan.gauge
        );

        // 3. Resolve and build
        let decision = DecisionBuilder::new(&self.registry, contract)
            .build(&plan)
            .await?;

        match &decision {
            ActionDecision::Executable(action) => {
                info!("Proposing execBribe on {}", action.destination)
            }
            ActionDecision::NotExecutable(reason) if reason.is_alarm() => {
                warn!("Run produced no action: {}", reason)
            }
            ActionDecision::NotExecutable(reason) => info!("Run produced no action: {}", reason),
        }

        Ok(decision)
    }

    /// Every plan with its key, due state and resolver support.
    pub async fn inspect(&self) -> Result<(Timestamp, Vec<PlanStatus>), KeeperError> {
        let plans = self.source.plans().await?;
        let now = self.source.latest_timestamp().await?;

        let statuses = plans
            .into_iter()
            .map(|plan| PlanStatus {
                key: plan.execution_key(),
                due: plan.is_due(now),
                supported: self.registry.supports(plan.source),
                plan,
            })
            .collect();

        Ok((now, statuses))
    }
}
