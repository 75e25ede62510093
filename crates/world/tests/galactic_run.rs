//! Full runs over the embedded corpus.

use trader_rl_engine::{
    BetaSampler, RecordingObserver, SimulationLoop, SimulationStatus, TransitionExecutor,
};
use trader_world::{Corpus, MoneyDeltaReward};

fn run(seed: u64, max_steps: u64) -> (trader_rl_engine::SimulationSummary, RecordingObserver) {
    let corpus = Corpus::embedded().unwrap().validate().unwrap();
    let state = corpus.market.initial_state("A", 1000.0).unwrap();
    let mut sim = SimulationLoop::new(
        max_steps,
        corpus.starting_pool(),
        state,
        BetaSampler::with_seed(seed),
        TransitionExecutor::new(MoneyDeltaReward::new(100.0)),
    )
    .unwrap()
    .with_feed(corpus.reasoned_feed());
    let mut observer = RecordingObserver::default();
    let summary = sim.run(&mut observer).unwrap();
    (summary, observer)
}

#[test]
fn run_reaches_a_terminal_status_with_consistent_records() {
    let (summary, observer) = run(42, 300);

    assert!(summary.status.is_terminal());
    assert_eq!(summary.rounds as usize, observer.rounds.len());

    let total_delta: f64 = observer.rounds.iter().map(|r| r.money_delta).sum();
    assert!((1000.0 + total_delta - summary.final_money).abs() < 1e-6);

    for (i, report) in observer.rounds.iter().enumerate() {
        assert_eq!(report.round, i as u64);
        assert!((0.0..=1.0).contains(&report.reward));
        if report.action.is_reward_exempt() {
            assert_eq!(report.reward, 0.0);
        }
    }
}

#[test]
fn reasoned_rules_join_the_pool_over_the_first_rounds() {
    let (summary, _) = run(7, 50);
    let corpus = Corpus::embedded().unwrap().validate().unwrap();
    let reasoned = corpus.reasoned_rules.len();
    // One admission per round, so 50 rounds drain the whole feed.
    assert!(summary.rounds >= reasoned as u64);
    assert_eq!(summary.pool_size, corpus.starting_rules.len() + reasoned);
    assert_eq!(summary.pool_version, reasoned as u64);
    assert_eq!(summary.arms.len(), summary.pool_size);
}

#[test]
fn seeded_runs_are_reproducible() {
    let (a, ra) = run(99, 200);
    let (b, rb) = run(99, 200);
    assert_eq!(a.final_money, b.final_money);
    assert_eq!(ra.rounds, rb.rounds);
    assert_ne!(a.status, SimulationStatus::Running);
}
