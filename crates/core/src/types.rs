use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of a rule, as assigned by the rule corpus.
pub type RuleId = u64;

/// Situation of the trader at one point in a run.
///
/// `Clone` is a deep copy: the context map is owned, so mutating a clone
/// never touches the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Named attributes describing where the trader is and what it holds,
    /// e.g. `planet = "A"`, `cargo = "ore"`.
    pub context: BTreeMap<String, String>,
    /// Money held by the trader.
    pub money: f64,
}

impl State {
    pub fn new(context: BTreeMap<String, String>, money: f64) -> Self {
        Self { context, money }
    }

    /// Convenience constructor from `(key, value)` pairs.
    pub fn with_context<K, V>(pairs: impl IntoIterator<Item = (K, V)>, money: f64) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            context: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            money,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.context.insert(key.into(), value.into());
    }

    /// `true` once the trader has nothing left to spend.
    pub fn is_depleted(&self) -> bool {
        self.money <= 0.0
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context: {:?}, Money: {}", self.context, self.money)
    }
}

/// Closed set of things a rule can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Travel,
    Trade,
    Other,
}

impl ActionCategory {
    /// Pure navigation moves are never scored; their arm is updated with a
    /// reward of exactly zero instead.
    pub fn is_reward_exempt(&self) -> bool {
        matches!(self, ActionCategory::Travel)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionCategory::Travel => "travel",
            ActionCategory::Trade => "trade",
            ActionCategory::Other => "other",
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
