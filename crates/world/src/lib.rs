//! Galactic trading world — market of planets and goods, declarative rules
//! that act on it, the reward mapping, and the JSON rule corpus with its
//! structural validation.

pub mod corpus;
pub mod market;
pub mod reward;
pub mod rules;

pub use corpus::{Corpus, CorpusReport, RejectedRule, ValidatedCorpus};
pub use market::{Market, PlanetMarket};
pub use reward::MoneyDeltaReward;
pub use rules::{Effect, MarketRule, RuleDefinition, Stv};
