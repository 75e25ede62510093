//! Runs the chosen rule against a private copy of the state and scores the
//! outcome.

use trader_core::State;

use crate::arm::Rule;

/// Domain reward for moving from `old_state` to `new_state`.
///
/// The engine feeds the value straight into the arm's posterior, so it must
/// already lie in `[0, 1]`.
pub trait RewardEvaluator: Send + Sync {
    fn evaluate(&self, new_state: &State, old_state: &State) -> f64;
}

impl<F> RewardEvaluator for F
where
    F: Fn(&State, &State) -> f64 + Send + Sync,
{
    fn evaluate(&self, new_state: &State, old_state: &State) -> f64 {
        self(new_state, old_state)
    }
}

/// Result of one executed rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub new_state: State,
    pub reward: f64,
}

pub struct TransitionExecutor {
    evaluator: Box<dyn RewardEvaluator>,
}

impl TransitionExecutor {
    pub fn new(evaluator: impl RewardEvaluator + 'static) -> Self {
        Self {
            evaluator: Box::new(evaluator),
        }
    }

    /// Apply `rule` to a deep copy of `state`. `state` itself is never
    /// touched.
    pub fn execute(&self, rule: &Rule, state: &State) -> State {
        rule.execute(state.clone())
    }

    /// Reward for the transition. Reward-exempt categories always score
    /// exactly zero and the evaluator is not consulted.
    pub fn reward(&self, rule: &Rule, new_state: &State, old_state: &State) -> f64 {
        if rule.action.is_reward_exempt() {
            0.0
        } else {
            self.evaluator.evaluate(new_state, old_state)
        }
    }

    pub fn run(&self, rule: &Rule, state: &State) -> Transition {
        let new_state = self.execute(rule, state);
        let reward = self.reward(rule, &new_state, state);
        Transition { new_state, reward }
    }
}

impl std::fmt::Debug for TransitionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionExecutor").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use trader_core::ActionCategory;

    fn travel_to_b() -> Rule {
        Rule::from_fns(
            1,
            "travel A to B",
            ActionCategory::Travel,
            |_| true,
            |mut s| {
                s.set("planet", "B");
                s.money -= 20.0;
                s
            },
        )
    }

    fn sell() -> Rule {
        Rule::from_fns(
            2,
            "sell",
            ActionCategory::Trade,
            |_| true,
            |mut s| {
                s.money += 100.0;
                s
            },
        )
    }

    #[test]
    fn test_original_state_is_untouched() {
        let executor = TransitionExecutor::new(|_: &State, _: &State| 1.0);
        let original = State::with_context([("planet", "A")], 1000.0);

        let mut new_state = executor.execute(&travel_to_b(), &original);
        assert_eq!(new_state.get("planet"), Some("B"));
        assert_eq!(original.get("planet"), Some("A"));

        new_state.set("planet", "Z");
        new_state.money = 0.0;
        assert_eq!(original.get("planet"), Some("A"));
        assert_eq!(original.money, 1000.0);
    }

    #[test]
    fn test_exempt_category_skips_evaluator() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let executor = TransitionExecutor::new(move |_: &State, _: &State| {
            counter.fetch_add(1, Ordering::SeqCst);
            1.0
        });
        let state = State::with_context([("planet", "A")], 1000.0);

        // Travel is forced to zero, not skipped: the arm still gets update(0).
        let transition = executor.run(&travel_to_b(), &state);
        assert_eq!(transition.reward, 0.0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let transition = executor.run(&sell(), &state);
        assert_eq!(transition.reward, 1.0);
        assert_eq!(transition.new_state.money, 1100.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_evaluator_sees_new_then_old() {
        let executor = TransitionExecutor::new(|new: &State, old: &State| {
            if new.money > old.money {
                1.0
            } else {
                0.0
            }
        });
        let state = State::with_context([("planet", "A")], 50.0);
        assert_eq!(executor.run(&sell(), &state).reward, 1.0);
    }
}
