//! Plan selection strategies.
//!
//! One plan is acted on per run. The selector drops plans still cooling
//! down, orders the rest by the configured policy and hands back the
//! first one whose bribe market has a resolver.

use keeper_core::{Plan, Reason, SelectionMode, Timestamp};
use rand::seq::SliceRandom;

/// Reorders due plans before the first-match scan.
pub trait Permutation: Send + Sync {
    /// Permute `plans` in place.
    fn permute(&self, plans: &mut [Plan]);
}

/// Fresh uniform shuffle on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPermutation;

impl Permutation for RandomPermutation {
    fn permute(&self, plans: &mut [Plan]) {
        plans.shuffle(&mut rand::thread_rng());
    }
}

/// Leaves the order untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPermutation;

impl Permutation for IdentityPermutation {
    fn permute(&self, _plans: &mut [Plan]) {}
}

/// Ordering applied to due plans.
pub enum SelectionPolicy {
    /// Smallest next execution time first; ties keep contract order
    EarliestDue,
    /// Permuted order, first supported plan wins
    Shuffled(Box<dyn Permutation>),
}

impl SelectionPolicy {
    /// Shuffled policy with a random permutation.
    pub fn shuffled() -> Self {
        Self::Shuffled(Box::new(RandomPermutation))
    }

    /// Policy for a configured mode.
    pub fn from_mode(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::EarliestDue => Self::EarliestDue,
            SelectionMode::Shuffled => Self::shuffled(),
        }
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::EarliestDue
    }
}

impl std::fmt::Debug for SelectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EarliestDue => f.write_str("EarliestDue"),
            Self::Shuffled(_) => f.write_str("Shuffled"),
        }
    }
}

/// Outcome of selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Act on this plan
    Selected(Plan),
    /// The contract holds no plans
    Empty,
    /// Plans exist but none is due
    NotYetExecutable,
}

impl Selection {
    /// Reason to report when nothing was selected.
    pub fn reason(&self) -> Option<Reason> {
        match self {
            Self::Selected(_) => None,
            Self::Empty => Some(Reason::NoPlans),
            Self::NotYetExecutable => Some(Reason::NotYetExecutable),
        }
    }
}

/// Picks the single plan a run acts on.
#[derive(Debug, Default)]
pub struct PlanSelector {
    policy: SelectionPolicy,
}

impl PlanSelector {
    /// Create a selector.
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    /// The active policy.
    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Due plans in policy order.
    pub fn order(&self, plans: Vec<Plan>, now: Timestamp) -> Vec<Plan> {
        let mut due: Vec<Plan> = plans.into_iter().filter(|p| p.is_due(now)).collect();

        match &self.policy {
            // Stable sort keeps contract order among equal times.
            SelectionPolicy::EarliestDue => due.sort_by(|a, b| {
                a.next_execution_time.cmp(&b.next_execution_time)
            }),
            SelectionPolicy::Shuffled(permutation) => permutation.permute(&mut due),
        }

        due
    }

    /// Select the plan to act on.
    ///
    /// Plans for which `supported` is false are passed over in favour of
    /// the next due plan. When no due plan is supported the first due plan
    /// is still returned, so the decision step can report why it cannot run.
    pub fn select<F>(&self, plans: Vec<Plan>, now: Timestamp, supported: F) -> Selection
    where
        F: Fn(&Plan) -> bool,
    {
        if plans.is_empty() {
            return Selection::Empty;
        }

        let mut due = self.order(plans, now);
        if due.is_empty() {
            return Selection::NotYetExecutable;
        }

        let index = due.iter().position(|p| supported(p)).unwrap_or(0);
        Selection::Selected(due.swap_remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keeper_core::Address;
    use std::collections::HashSet;

    fn plan(id: u8, next: Timestamp) -> Plan {
        Plan::new(Address::repeat_byte(1), Address::repeat_byte(id), Address::repeat_byte(3))
            .with_next_execution_time(next)
    }

    fn any(_: &Plan) -> bool {
        true
    }

    fn gauge_of(selection: &Selection) -> Address {
        match selection {
            Selection::Selected(p) => p.gauge,
            other => panic!("expected a selection, got {:?}", other),
        }
    }

    /// Reverses the list.
    struct Reverse;

    impl Permutation for Reverse {
        fn permute(&self, plans: &mut [Plan]) {
            plans.reverse();
        }
    }

    #[test]
    fn test_empty_plans() {
        let selection = PlanSelector::default().select(vec![], 200, any);
        assert_eq!(selection, Selection::Empty);
        assert_eq!(selection.reason(), Some(Reason::NoPlans));
    }

    #[test]
    fn test_all_on_cooldown() {
        let selection = PlanSelector::default().select(vec![plan(1, 300), plan(2, 201)], 200, any);
        assert_eq!(selection, Selection::NotYetExecutable);
        assert_eq!(selection.reason(), Some(Reason::NotYetExecutable));
        assert_ne!(Reason::NotYetExecutable.message(), Reason::NoPlans.message());
    }

    #[test]
    fn test_earliest_due_wins() {
        let selection = PlanSelector::default().select(vec![plan(0xa, 100), plan(0xb, 50)], 200, any);
        assert_eq!(gauge_of(&selection), Address::repeat_byte(0xb));
    }

    #[test]
    fn test_cooling_plan_never_selected() {
        let plans = vec![plan(1, 10), plan(2, 500)];
        let selector = PlanSelector::default();

        assert_eq!(selector.order(plans.clone(), 200).len(), 1);
        assert_eq!(gauge_of(&selector.select(plans, 200, any)), Address::repeat_byte(1));
    }

    #[test]
    fn test_due_at_exact_time() {
        let selection = PlanSelector::default().select(vec![plan(1, 200)], 200, any);
        assert!(matches!(selection, Selection::Selected(_)));
    }

    #[test]
    fn test_ties_keep_contract_order() {
        let plans = vec![plan(1, 100), plan(2, 50), plan(3, 50), plan(4, 50)];
        let order: Vec<_> = PlanSelector::default()
            .order(plans, 200)
            .iter()
            .map(|p| p.gauge)
            .collect();

        assert_eq!(
            order,
            vec![
                Address::repeat_byte(2),
                Address::repeat_byte(3),
                Address::repeat_byte(4),
                Address::repeat_byte(1),
            ]
        );
    }

    #[test]
    fn test_unsupported_skipped_for_next() {
        let plans = vec![plan(1, 10), plan(2, 20)];
        let selection =
            PlanSelector::default().select(plans, 200, |p| p.gauge != Address::repeat_byte(1));
        assert_eq!(gauge_of(&selection), Address::repeat_byte(2));
    }

    #[test]
    fn test_only_unsupported_still_selected() {
        let selection = PlanSelector::default().select(vec![plan(1, 10)], 200, |_| false);
        assert_eq!(gauge_of(&selection), Address::repeat_byte(1));
    }

    #[test]
    fn test_shuffled_uses_injected_permutation() {
        let selector = PlanSelector::new(SelectionPolicy::Shuffled(Box::new(Reverse)));
        let plans = vec![plan(1, 10), plan(2, 20), plan(3, 999)];

        assert_eq!(gauge_of(&selector.select(plans, 200, any)), Address::repeat_byte(2));
    }

    #[test]
    fn test_shuffled_identity_is_first_match() {
        let selector = PlanSelector::new(SelectionPolicy::Shuffled(Box::new(IdentityPermutation)));
        let plans = vec![plan(1, 90), plan(2, 10)];
        assert_eq!(gauge_of(&selector.select(plans, 200, any)), Address::repeat_byte(1));
    }

    #[test]
    fn test_random_policy_reaches_every_due_plan() {
        let selector = PlanSelector::new(SelectionPolicy::shuffled());
        let plans = vec![plan(1, 10), plan(2, 10), plan(3, 10)];

        let seen: HashSet<Address> = (0..500)
            .map(|_| gauge_of(&selector.select(plans.clone(), 200, any)))
            .collect();

        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_policy_from_mode() {
        assert!(matches!(
            SelectionPolicy::from_mode(SelectionMode::EarliestDue),
            SelectionPolicy::EarliestDue
        ));
        assert!(matches!(
            SelectionPolicy::from_mode(SelectionMode::Shuffled),
            SelectionPolicy::Shuffled(_)
        ));
    }
}
