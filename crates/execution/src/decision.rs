//! Turns the selected plan into an action decision.

use alloy_sol_types::SolCall;
use keeper_core::abi::v1::IBriber;
use keeper_core::{Action, ActionDecision, Address, ExecutionKey, Plan, ProposalId, Reason};
use keeper_resolvers::{Resolution, ResolveError, ResolverRegistry};
use tracing::{debug, error, info};

/// Builds the `execBribe` call for a plan.
pub struct DecisionBuilder<'a> {
    registry: &'a ResolverRegistry,
    contract: Address,
}

impl<'a> DecisionBuilder<'a> {
    /// Create a builder targeting the scheduler at `contract`.
    pub fn new(registry: &'a ResolverRegistry, contract: Address) -> Self {
        Self { registry, contract }
    }

    /// Decide what to do with `plan`.
    ///
    /// Unsupported markets and unmapped gauges are ordinary outcomes. A
    /// lookup service failure is returned as an error so the whole run fails.
    pub async fn build(&self, plan: &Plan) -> Result<ActionDecision, ResolveError> {
        let key = plan.execution_key();

        let proposal = match self.registry.resolve(plan.source, plan.gauge).await? {
            Resolution::Proposal(proposal) => proposal,
            Resolution::UnsupportedSource => {
                info!("No resolver for bribe market {}", plan.source);
                return Ok(ActionDecision::NotExecutable(Reason::SourceNotSupported));
            }
            Resolution::NoProposal => {
                info!("No proposal for gauge {} (key {})", plan.gauge, key);
                return Ok(ActionDecision::NotExecutable(Reason::NoProposal(key)));
            }
        };

        let action = self.exec_bribe(key, proposal);
        if !action.is_well_formed() {
            error!(
                "Built invalid execBribe call: destination {}, {} bytes of data",
                action.destination,
                action.payload.len()
            );
            return Ok(ActionDecision::NotExecutable(Reason::InvalidTransaction));
        }

        debug!("execBribe({}, {}) -> {}", key, proposal, self.contract);
        Ok(ActionDecision::Executable(action))
    }

    /// The `execBribe(key, proposal)` call against the scheduler.
    pub fn exec_bribe(&self, key: ExecutionKey, proposal: ProposalId) -> Action {
        let call = IBriber::execBribeCall {
            key: key.as_b256(),
            proposal: proposal.as_b256(),
        };

        Action {
            destination: self.contract,
            payload: call.abi_encode().into(),
        }
    }
}
