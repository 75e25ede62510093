use trader_core::State;
use trader_rl_engine::RewardEvaluator;

/// Logistic mapping of the money delta into `(0, 1)`.
///
/// A delta of zero scores 0.5; a gain of `scale` scores about 0.73.
#[derive(Debug, Clone, Copy)]
pub struct MoneyDeltaReward {
    scale: f64,
}

impl MoneyDeltaReward {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl RewardEvaluator for MoneyDeltaReward {
    fn evaluate(&self, new_state: &State, old_state: &State) -> f64 {
        let delta = new_state.money - old_state.money;
        1.0 / (1.0 + (-delta / self.scale).exp())
    }
}
