//! The round loop: admit, filter, sample, select, execute, update.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};
use trader_core::{State, TraderError, TraderResult};
use uuid::Uuid;

use crate::arm::Rule;
use crate::executor::TransitionExecutor;
use crate::filter::ApplicabilityFilter;
use crate::pool::{NoFeed, RuleFeed, RulePool};
use crate::report::{ArmSnapshot, RoundObserver, RoundReport, SimulationStatus, SimulationSummary};
use crate::sampler::BetaSampler;
use crate::selection::{SampledCandidate, SelectionPolicy};

/// Result of a single call to [`SimulationLoop::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum RoundOutcome {
    /// A rule was executed. The report's status tells whether the run
    /// continues.
    Played(RoundReport),
    /// Nothing applied; the run is now `StoppedNoRules`.
    NoApplicableRule { round: u64 },
}

/// Owns the rule pool, the sampler and the current state of one run.
pub struct SimulationLoop<F = NoFeed, R = StdRng> {
    run_id: Uuid,
    max_steps: u64,
    pool: RulePool,
    feed: F,
    sampler: BetaSampler<R>,
    filter: ApplicabilityFilter,
    policy: SelectionPolicy,
    executor: TransitionExecutor,
    state: State,
    status: SimulationStatus,
    rounds: u64,
    started_at: DateTime<Utc>,
}

impl<R: Rng> SimulationLoop<NoFeed, R> {
    pub fn new(
        max_steps: u64,
        rules: impl IntoIterator<Item = Rule>,
        initial_state: State,
        sampler: BetaSampler<R>,
        executor: TransitionExecutor,
    ) -> TraderResult<Self> {
        if max_steps == 0 {
            let reason = "max_steps must be at least 1".to_string();
            return Err(TraderError::InvalidParameter(reason));
        }
        Ok(Self {
            run_id: Uuid::new_v4(),
            max_steps,
            pool: RulePool::new(rules),
            feed: NoFeed,
            sampler,
            filter: ApplicabilityFilter::new(),
            policy: SelectionPolicy::new(),
            executor,
            state: initial_state,
            status: SimulationStatus::Running,
            rounds: 0,
            started_at: Utc::now(),
        })
    }
}

impl<F: RuleFeed, R: Rng> SimulationLoop<F, R> {
    /// Attach a source of rules that become available mid-run. At most one
    /// of them is admitted at the start of each round.
    pub fn with_feed<G: RuleFeed>(self, feed: G) -> SimulationLoop<G, R> {
        SimulationLoop {
            run_id: self.run_id,
            max_steps: self.max_steps,
            pool: self.pool,
            feed,
            sampler: self.sampler,
            filter: self.filter,
            policy: self.policy,
            executor: self.executor,
            state: self.state,
            status: self.status,
            rounds: self.rounds,
            started_at: self.started_at,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    /// Rounds that executed a rule.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn pool(&self) -> &RulePool {
        &self.pool
    }

    /// Play one round. Fails with `ContractViolation` once the run has
    /// reached a terminal status.
    ///
    /// Admission happens before anything else in the round. If the round then
    /// fails (for instance the reward is outside `[0, 1]`), the admitted rule
    /// stays in the pool and the pool version keeps its bump, while the state,
    /// the posteriors and the round count are left as they were.
    pub fn step(&mut self) -> TraderResult<RoundOutcome> {
        if self.status.is_terminal() {
            return Err(TraderError::ContractViolation(format!(
                "simulation {} already stopped with {:?}",
                self.run_id, self.status
            )));
        }
        let round = self.rounds;

        self.pool.admit_from(&mut self.feed);

        let applicable = self.filter.positions(self.pool.arms(), &self.state);
        if applicable.is_empty() {
            info!(round, run_id = %self.run_id, "Couldn't find any applicable rules");
            self.status = SimulationStatus::StoppedNoRules;
            return Ok(RoundOutcome::NoApplicableRule { round });
        }

        let mut candidates = Vec::with_capacity(applicable.len());
        for index in applicable {
            let arm = &self.pool.arms()[index];
            let score = arm.sample_score(&mut self.sampler)?;
            debug!(round, rule_id = arm.rule().id, score, "Sampled arm");
            candidates.push(SampledCandidate::new(index, score));
        }
        let winner = self.policy.select(candidates, round)?;

        let (transition, rule_id, rule_name, action) = {
            let rule = self.pool.arms()[winner.key].rule();
            (
                self.executor.run(rule, &self.state),
                rule.id,
                rule.name.clone(),
                rule.action,
            )
        };

        let arm = self.pool.arm_mut(winner.key).ok_or_else(|| {
            TraderError::ContractViolation(format!("arm index {} out of range", winner.key))
        })?;
        arm.update(transition.reward)?;

        let old_money = self.state.money;
        self.state = transition.new_state;
        let money_delta = self.state.money - old_money;
        self.rounds += 1;

        if self.state.is_depleted() {
            info!(round, money = self.state.money, "Ran out of money");
            self.status = SimulationStatus::StoppedDepleted;
        } else if self.rounds >= self.max_steps {
            info!(round, max_steps = self.max_steps, "Reached step limit");
            self.status = SimulationStatus::StoppedMaxSteps;
        }

        Ok(RoundOutcome::Played(RoundReport {
            round,
            rule_id,
            rule_name,
            action,
            money: self.state.money,
            money_delta,
            reward: transition.reward,
            status: self.status,
        }))
    }

    /// Play rounds until a terminal status is reached, forwarding every
    /// record to `observer`.
    pub fn run(&mut self, observer: &mut impl RoundObserver) -> TraderResult<SimulationSummary> {
        info!(
            run_id = %self.run_id,
            max_steps = self.max_steps,
            pool_size = self.pool.len(),
            money = self.state.money,
            "Simulation starting"
        );
        while !self.status.is_terminal() {
            if let RoundOutcome::Played(report) = self.step()? {
                observer.on_round(&report);
            }
        }
        let summary = self.summary();
        observer.on_finish(&summary);
        Ok(summary)
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            run_id: self.run_id,
            status: self.status,
            final_money: self.state.money,
            rounds: self.rounds,
            pool_size: self.pool.len(),
            pool_version: self.pool.version(),
            started_at: self.started_at,
            finished_at: Utc::now(),
            arms: self.pool.arms().iter().map(ArmSnapshot::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trader_core::ActionCategory;

    fn executor() -> TransitionExecutor {
        TransitionExecutor::new(|_: &State, _: &State| 1.0)
    }

    fn start() -> State {
        State::with_context([("planet", "A")], 1000.0)
    }

    fn spend(id: u64, amount: f64) -> Rule {
        Rule::from_fns(
            id,
            format!("spend {amount}"),
            ActionCategory::Trade,
            |_| true,
            move |mut s| {
                s.money -= amount;
                s
            },
        )
    }

    #[test]
    fn test_zero_max_steps_is_rejected() {
        let result = SimulationLoop::new(
            0,
            vec![spend(1, 1.0)],
            start(),
            BetaSampler::with_seed(0),
            executor(),
        );
        assert!(matches!(result, Err(TraderError::InvalidParameter(_))));
    }

    #[test]
    fn test_step_after_stop_is_contract_violation() {
        let mut sim = SimulationLoop::new(
            1,
            vec![spend(1, 1.0)],
            start(),
            BetaSampler::with_seed(0),
            executor(),
        )
        .unwrap();
        sim.step().unwrap();
        assert_eq!(sim.status(), SimulationStatus::StoppedMaxSteps);
        assert!(matches!(sim.step(), Err(TraderError::ContractViolation(_))));
    }

    #[test]
    fn test_only_the_winner_is_updated() {
        let mut sim = SimulationLoop::new(
            100,
            vec![spend(1, 1.0), spend(2, 2.0)],
            start(),
            BetaSampler::with_seed(5),
            executor(),
        )
        .unwrap();
        for _ in 0..20 {
            let before: Vec<_> = sim.pool().arms().iter().map(|a| a.posterior()).collect();
            let RoundOutcome::Played(report) = sim.step().unwrap() else {
                panic!("both rules always apply");
            };
            for (arm, prior) in sim.pool().arms().iter().zip(&before) {
                if arm.rule().id == report.rule_id {
                    assert_eq!(arm.posterior().alpha, prior.alpha + 1.0);
                    assert_eq!(arm.posterior().beta, prior.beta);
                } else {
                    assert_eq!(arm.posterior(), *prior);
                }
            }
        }

        let arms = sim.pool().arms();
        assert_eq!(arms[0].pulls() + arms[1].pulls(), sim.rounds());
        for arm in arms {
            let p = arm.posterior();
            assert_eq!(p.alpha + p.beta, 2.0 + arm.pulls() as f64);
        }
    }

    #[test]
    fn test_failed_round_keeps_its_admission() {
        let out_of_range = TransitionExecutor::new(|_: &State, _: &State| 2.0);
        let mut sim = SimulationLoop::new(
            10,
            vec![spend(1, 1.0)],
            start(),
            BetaSampler::with_seed(3),
            out_of_range,
        )
        .unwrap()
        .with_feed(vec![spend(2, 2.0)]);

        assert!(matches!(sim.step(), Err(TraderError::ContractViolation(_))));
        assert_eq!(sim.pool().len(), 2);
        assert_eq!(sim.pool().version(), 1);
        assert_eq!(sim.rounds(), 0);
        assert_eq!(sim.state().money, 1000.0);
        assert_eq!(sim.status(), SimulationStatus::Running);
        assert!(sim.pool().arms().iter().all(|a| a.pulls() == 0));
    }
}
