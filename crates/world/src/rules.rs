//! Declarative rule definitions and the logic that runs them against the
//! market.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use trader_core::{ActionCategory, RuleId, State};
use trader_rl_engine::{Rule, RuleLogic};

use crate::market::{Market, CARGO_KEY, EMPTY_CARGO, PLANET_KEY};

/// Simple truth value: how strongly the rule's author believes it, and how
/// much evidence backs that belief.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stv {
    pub strength: f64,
    pub confidence: f64,
}

impl Default for Stv {
    fn default() -> Self {
        Self {
            strength: 1.0,
            confidence: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Jump to another planet, paying the market fare.
    Travel { destination: String },
    /// Load `good` at the local buy price. Needs an empty hold.
    Buy { good: String },
    /// Unload `good` at the local sell price.
    Sell { good: String },
    AdjustMoney { amount: f64 },
    SetContext { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub id: RuleId,
    pub name: String,
    pub action: ActionCategory,
    #[serde(default)]
    pub stv: Stv,
    #[serde(default = "default_complexity")]
    pub complexity: u32,
    /// Required `key = value` pairs on the state context.
    pub context: BTreeMap<String, String>,
    pub effect: Effect,
}

fn default_complexity() -> u32 {
    1
}

/// A [`RuleDefinition`] bound to the market it trades in.
#[derive(Debug, Clone)]
pub struct MarketRule {
    definition: RuleDefinition,
    market: Arc<Market>,
}

impl MarketRule {
    pub fn new(definition: RuleDefinition, market: Arc<Market>) -> Self {
        Self { definition, market }
    }

    pub fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    /// Wrap into an engine rule.
    pub fn into_rule(self) -> Rule {
        let id = self.definition.id;
        let name = self.definition.name.clone();
        let action = self.definition.action;
        Rule::new(id, name, action, self)
    }

    fn context_matches(&self, state: &State) -> bool {
        self.definition
            .context
            .iter()
            .all(|(key, value)| state.get(key) == Some(value.as_str()))
    }

    fn effect_feasible(&self, state: &State) -> bool {
        let planet = state.get(PLANET_KEY).unwrap_or_default();
        match &self.definition.effect {
            Effect::Travel { destination } => {
                destination != planet && self.market.has_planet(destination)
            }
            Effect::Buy { good } => {
                let hold_empty = state.get(CARGO_KEY).map_or(true, |c| c == EMPTY_CARGO);
                match self.market.buy_price(planet, good) {
                    Some(price) => hold_empty && state.money >= price,
                    None => false,
                }
            }
            Effect::Sell { good } => {
                state.get(CARGO_KEY) == Some(good.as_str())
                    && self.market.sell_price(planet, good).is_some()
            }
            Effect::AdjustMoney { .. } | Effect::SetContext { .. } => true,
        }
    }
}

impl RuleLogic for MarketRule {
    fn is_applicable(&self, state: &State) -> bool {
        self.context_matches(state) && self.effect_feasible(state)
    }

    fn execute(&self, mut state: State) -> State {
        let planet = state.get(PLANET_KEY).unwrap_or_default().to_string();
        match &self.definition.effect {
            Effect::Travel { destination } => {
                state.set(PLANET_KEY, destination.as_str());
                state.money -= self.market.travel_fare;
            }
            Effect::Buy { good } => {
                if let Some(price) = self.market.buy_price(&planet, good) {
                    state.money -= price;
                    state.set(CARGO_KEY, good.as_str());
                }
            }
            Effect::Sell { good } => {
                if let Some(price) = self.market.sell_price(&planet, good) {
                    state.money += price;
                    state.set(CARGO_KEY, EMPTY_CARGO);
                }
            }
            Effect::AdjustMoney { amount } => state.money += amount,
            Effect::SetContext { key, value } => state.set(key.as_str(), value.as_str()),
        }
        state
    }
}
