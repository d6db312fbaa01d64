//! Execution layer - plan selection, execution decisions, and the run entry point.

#![warn(missing_docs)]

pub mod selector;
pub mod decision;
pub mod engine;

pub use selector::{
    IdentityPermutation, Permutation, PlanSelector, RandomPermutation, Selection, SelectionPolicy,
};
pub use decision::DecisionBuilder;
pub use engine::{Keeper, KeeperError, PlanStatus};
