//! Loading and structural validation of the JSON rule corpus.
//!
//! Invalid rules are logged and skipped rather than failing the whole
//! corpus. A broken market, or a corpus with no valid starting rule, is an
//! error.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use trader_core::{ActionCategory, RuleId, TraderError, TraderResult};
use trader_rl_engine::Rule;

use crate::market::Market;
use crate::rules::{Effect, MarketRule, RuleDefinition};

const EMBEDDED_CORPUS: &str = include_str!("../data/default_corpus.json");

/// Raw corpus as read from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    pub market: Market,
    pub starting_rules: Vec<RuleDefinition>,
    /// Rules that become available one per round while the run is going.
    #[serde(default)]
    pub reasoned_rules: Vec<RuleDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRule {
    pub id: RuleId,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorpusReport {
    pub accepted: usize,
    pub rejected: Vec<RejectedRule>,
}

/// A corpus whose market and rules passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedCorpus {
    pub market: Arc<Market>,
    pub starting_rules: Vec<RuleDefinition>,
    pub reasoned_rules: Vec<RuleDefinition>,
    pub report: CorpusReport,
}

impl Corpus {
    pub fn from_json(json: &str) -> TraderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> TraderResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    /// The corpus shipped with the crate.
    pub fn embedded() -> TraderResult<Self> {
        Self::from_json(EMBEDDED_CORPUS)
    }

    pub fn validate(self) -> TraderResult<ValidatedCorpus> {
        self.market.validate()?;

        let mut report = CorpusReport::default();
        let mut seen = HashSet::new();
        let starting = filter_valid(self.starting_rules, &self.market, &mut seen, &mut report);
        let reasoned = filter_valid(self.reasoned_rules, &self.market, &mut seen, &mut report);

        info!(
            accepted = report.accepted,
            rejected = report.rejected.len(),
            "Rule corpus validated"
        );

        if starting.is_empty() {
            let reason = "corpus has no valid starting rules".to_string();
            return Err(TraderError::Corpus(reason));
        }

        Ok(ValidatedCorpus {
            market: Arc::new(self.market),
            starting_rules: starting,
            reasoned_rules: reasoned,
            report,
        })
    }
}

impl ValidatedCorpus {
    /// Engine rules for the initial pool, in corpus order.
    pub fn starting_pool(&self) -> Vec<Rule> {
        self.bind(&self.starting_rules)
    }

    /// Engine rules for the mid-run feed. Kept in corpus order; the feed
    /// hands them out from the back.
    pub fn reasoned_feed(&self) -> Vec<Rule> {
        self.bind(&self.reasoned_rules)
    }

    fn bind(&self, definitions: &[RuleDefinition]) -> Vec<Rule> {
        definitions
            .iter()
            .cloned()
            .map(|d| MarketRule::new(d, Arc::clone(&self.market)).into_rule())
            .collect()
    }
}

fn filter_valid(
    definitions: Vec<RuleDefinition>,
    market: &Market,
    seen: &mut HashSet<RuleId>,
    report: &mut CorpusReport,
) -> Vec<RuleDefinition> {
    let mut valid = Vec::with_capacity(definitions.len());
    for definition in definitions {
        let check = if seen.insert(definition.id) {
            check_rule(&definition, market)
        } else {
            Err(format!("duplicate rule id {}", definition.id))
        };
        match check {
            Ok(()) => {
                report.accepted += 1;
                valid.push(definition);
            }
            Err(reason) => {
                warn!(rule_id = definition.id, %reason, "Rejecting rule");
                report.rejected.push(RejectedRule {
                    id: definition.id,
                    reason,
                });
            }
        }
    }
    valid
}

/// Structural checks for one rule. Returns the first problem found.
pub fn check_rule(definition: &RuleDefinition, market: &Market) -> Result<(), String> {
    if definition.name.trim().is_empty() {
        return Err("empty name".to_string());
    }

    let stv = definition.stv;
    for (label, value) in [("strength", stv.strength), ("confidence", stv.confidence)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("STV {label} {value} outside [0, 1]"));
        }
    }

    if definition.context.is_empty() {
        return Err("no context requirements".to_string());
    }
    if let Some((key, _)) = definition
        .context
        .iter()
        .find(|(k, v)| k.trim().is_empty() || v.trim().is_empty())
    {
        return Err(format!("blank context entry {key:?}"));
    }

    match &definition.effect {
        Effect::Travel { destination } => {
            expect_action(definition, ActionCategory::Travel)?;
            if !market.has_planet(destination) {
                return Err(format!("unknown destination {destination}"));
            }
        }
        Effect::Buy { good } => {
            expect_action(definition, ActionCategory::Trade)?;
            if !market.is_bought_anywhere(good) {
                return Err(format!("no planet sells {good} to the trader"));
            }
        }
        Effect::Sell { good } => {
            expect_action(definition, ActionCategory::Trade)?;
            if !market.is_sold_anywhere(good) {
                return Err(format!("no planet buys {good} from the trader"));
            }
        }
        Effect::AdjustMoney { amount } => {
            if !amount.is_finite() {
                return Err(format!("non-finite money adjustment {amount}"));
            }
        }
        Effect::SetContext { key, .. } => {
            if key.trim().is_empty() {
                return Err("empty context key in effect".to_string());
            }
        }
    }
    Ok(())
}

fn expect_action(definition: &RuleDefinition, expected: ActionCategory) -> Result<(), String> {
    if definition.action == expected {
        Ok(())
    } else {
        Err(format!(
            "action {} does not match {expected} effect",
            definition.action
        ))
    }
}
