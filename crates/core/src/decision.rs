//! Action decision - the single observable output of a run.

use crate::id::ExecutionKey;
use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

/// A transaction for the automation network to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Contract to call
    pub destination: Address,

    /// ABI encoded call data
    pub payload: Bytes,
}

impl Action {
    /// Both destination and call data are present.
    pub fn is_well_formed(&self) -> bool {
        !self.destination.is_zero() && !self.payload.is_empty()
    }
}

/// Why a run proposed nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// The contract holds no plans
    NoPlans,
    /// Every plan is still cooling down
    NotYetExecutable,
    /// No resolver is registered for the plan's bribe market
    SourceNotSupported,
    /// The resolver found no proposal for the gauge
    NoProposal(ExecutionKey),
    /// The built call was missing destination or data
    InvalidTransaction,
}

impl Reason {
    /// Stable message reported to the automation network.
    pub fn message(&self) -> String {
        match self {
            Self::NoPlans => "No plans registered".to_string(),
            Self::NotYetExecutable => "No bribes to execute".to_string(),
            Self::SourceNotSupported => "Source not supported".to_string(),
            Self::NoProposal(key) => format!("No proposal for gauge (key: {})", key),
            Self::InvalidTransaction => "Invalid transaction".to_string(),
        }
    }

    /// Whether this outcome points at a bug rather than nothing to do.
    pub fn is_alarm(&self) -> bool {
        matches!(self, Self::InvalidTransaction)
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionDecision {
    /// Submit this call
    Executable(Action),
    /// Nothing to submit
    NotExecutable(Reason),
}

impl ActionDecision {
    /// Whether an action was proposed.
    pub fn is_executable(&self) -> bool {
        matches!(self, Self::Executable(_))
    }

    /// The proposed action, if any.
    pub fn action(&self) -> Option<&Action> {
        match self {
            Self::Executable(action) => Some(action),
            Self::NotExecutable(_) => None,
        }
    }

    /// The reason nothing was proposed, if so.
    pub fn reason(&self) -> Option<&Reason> {
        match self {
            Self::Executable(_) => None,
            Self::NotExecutable(reason) => Some(reason),
        }
    }

    /// Wire form: `{"executable":true,"action":{..}}` or `{"executable":false,"message":".."}`.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[derive(Serialize)]
struct DecisionWire<'a> {
    executable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<&'a Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<'a> From<&'a ActionDecision> for DecisionWire<'a> {
    fn from(decision: &'a ActionDecision) -> Self {
        Self {
            executable: decision.is_executable(),
            action: decision.action(),
            message: decision.reason().map(Reason::message),
        }
    }
}

impl Serialize for ActionDecision {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DecisionWire::from(self).serialize(serializer)
    }
}
