//! Rule-selection engine — Thompson Sampling over a growing pool of rules,
//! with Cheng's BA Beta sampler, copy-on-write rule execution and a
//! round loop with explicit stop conditions.

pub mod arm;
pub mod executor;
pub mod filter;
pub mod pool;
pub mod report;
pub mod sampler;
pub mod selection;
pub mod simulation;

pub use arm::{Posterior, Rule, RuleArm, RuleLogic};
pub use executor::{RewardEvaluator, Transition, TransitionExecutor};
pub use filter::ApplicabilityFilter;
pub use pool::{NoFeed, RuleFeed, RulePool};
pub use report::{
    ArmSnapshot, RecordingObserver, RoundObserver, RoundReport, SimulationStatus,
    SimulationSummary, TracingObserver,
};
pub use sampler::BetaSampler;
pub use selection::{SampledCandidate, SelectionPolicy};
pub use simulation::{RoundOutcome, SimulationLoop};
