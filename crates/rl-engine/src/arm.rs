//! Rules and the bandit arms that learn how well they pay off.

use rand::Rng;
use std::fmt;
use trader_core::{ActionCategory, RuleId, State, TraderError, TraderResult};

use crate::sampler::BetaSampler;

/// What a rule does to the world. Supplied by the world collaborator.
pub trait RuleLogic: Send + Sync {
    /// Whether the rule may fire in `state`. Must not depend on hidden
    /// mutable state.
    fn is_applicable(&self, state: &State) -> bool;

    /// Apply the rule to `state`, which is already a private copy.
    fn execute(&self, state: State) -> State;
}

/// [`RuleLogic`] built from a pair of closures.
pub struct FnLogic<P, E> {
    predicate: P,
    action: E,
}

impl<P, E> FnLogic<P, E>
where
    P: Fn(&State) -> bool + Send + Sync,
    E: Fn(State) -> State + Send + Sync,
{
    pub fn new(predicate: P, action: E) -> Self {
        Self { predicate, action }
    }
}

impl<P, E> RuleLogic for FnLogic<P, E>
where
    P: Fn(&State) -> bool + Send + Sync,
    E: Fn(State) -> State + Send + Sync,
{
    fn is_applicable(&self, state: &State) -> bool {
        (self.predicate)(state)
    }

    fn execute(&self, state: State) -> State {
        (self.action)(state)
    }
}

/// A validated rule handed over by the rule-definition collaborator.
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    pub action: ActionCategory,
    logic: Box<dyn RuleLogic>,
}

impl Rule {
    pub fn new(
        id: RuleId,
        name: impl Into<String>,
        action: ActionCategory,
        logic: impl RuleLogic + 'static,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            action,
            logic: Box::new(logic),
        }
    }

    /// Shorthand for a rule whose predicate and action are closures.
    pub fn from_fns<P, E>(
        id: RuleId,
        name: impl Into<String>,
        action: ActionCategory,
        predicate: P,
        execute: E,
    ) -> Self
    where
        P: Fn(&State) -> bool + Send + Sync + 'static,
        E: Fn(State) -> State + Send + Sync + 'static,
    {
        Self::new(id, name, action, FnLogic::new(predicate, execute))
    }

    pub fn is_applicable(&self, state: &State) -> bool {
        self.logic.is_applicable(state)
    }

    pub fn execute(&self, state: State) -> State {
        self.logic.execute(state)
    }
}

impl AsRef<Rule> for Rule {
    fn as_ref(&self) -> &Rule {
        self
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// Beta posterior pseudo-counts of one arm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posterior {
    pub alpha: f64,
    pub beta: f64,
}

impl Posterior {
    pub fn expected_value(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }
}

impl Default for Posterior {
    /// Uniform prior.
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }
}

/// Bandit arm wrapping one rule. Only [`RuleArm::update`] touches the
/// posterior.
#[derive(Debug)]
pub struct RuleArm {
    rule: Rule,
    posterior: Posterior,
    pulls: u64,
}

impl RuleArm {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            posterior: Posterior::default(),
            pulls: 0,
        }
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn posterior(&self) -> Posterior {
        self.posterior
    }

    /// Number of updates applied so far.
    pub fn pulls(&self) -> u64 {
        self.pulls
    }

    /// Draw a Thompson score from the current posterior.
    pub fn sample_score<R: Rng>(&self, sampler: &mut BetaSampler<R>) -> TraderResult<f64> {
        sampler.sample(self.posterior.alpha, self.posterior.beta)
    }

    /// Fold a reward in `[0, 1]` into the posterior as a fractional success:
    /// `alpha += reward`, `beta += 1 - reward`.
    ///
    /// Rewards outside `[0, 1]` (or NaN) are rejected, not clamped; mapping an
    /// unbounded domain reward into range is the caller's job.
    pub fn update(&mut self, reward: f64) -> TraderResult<()> {
        if !(0.0..=1.0).contains(&reward) {
            return Err(TraderError::ContractViolation(format!(
                "reward for rule {} must lie in [0, 1], got {reward}",
                self.rule.id
            )));
        }
        self.posterior.alpha += reward;
        self.posterior.beta += 1.0 - reward;
        self.pulls += 1;
        Ok(())
    }
}

impl AsRef<Rule> for RuleArm {
    fn as_ref(&self) -> &Rule {
        &self.rule
    }
}
