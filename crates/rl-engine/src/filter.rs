//! Selects the rules that may fire in the current state.

use trader_core::State;

use crate::arm::Rule;

/// Stateless applicability check over an ordered set of rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicabilityFilter;

impl ApplicabilityFilter {
    pub fn new() -> Self {
        Self
    }

    /// The items whose rule applies to `state`, in their original order.
    pub fn filter<'a, T: AsRef<Rule>>(&self, items: &'a [T], state: &State) -> Vec<&'a T> {
        items
            .iter()
            .filter(|item| item.as_ref().is_applicable(state))
            .collect()
    }

    /// Like [`ApplicabilityFilter::filter`] but yields positions, so a caller
    /// holding the items mutably can come back to the winner.
    pub fn positions<T: AsRef<Rule>>(&self, items: &[T], state: &State) -> Vec<usize> {
        items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.as_ref().is_applicable(state))
            .map(|(i, _)| i)
            .collect()
    }
}
