//! Planets, the prices they quote, and the initial trader state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trader_core::{State, TraderError, TraderResult};

/// Context key holding the trader's current planet.
pub const PLANET_KEY: &str = "planet";
/// Context key holding the good in the hold, or [`EMPTY_CARGO`].
pub const CARGO_KEY: &str = "cargo";
pub const EMPTY_CARGO: &str = "none";

/// Prices quoted on one planet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanetMarket {
    /// Price the trader pays to load a good here.
    #[serde(default)]
    pub buy: BTreeMap<String, f64>,
    /// Price the trader receives for unloading a good here.
    #[serde(default)]
    pub sell: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Cost of any single jump between planets.
    #[serde(default = "default_travel_fare")]
    pub travel_fare: f64,
    pub planets: BTreeMap<String, PlanetMarket>,
}

fn default_travel_fare() -> f64 {
    20.0
}

impl Market {
    pub fn has_planet(&self, planet: &str) -> bool {
        self.planets.contains_key(planet)
    }

    pub fn buy_price(&self, planet: &str, good: &str) -> Option<f64> {
        self.planets.get(planet)?.buy.get(good).copied()
    }

    pub fn sell_price(&self, planet: &str, good: &str) -> Option<f64> {
        self.planets.get(planet)?.sell.get(good).copied()
    }

    /// Whether any planet lets the trader buy `good`.
    pub fn is_bought_anywhere(&self, good: &str) -> bool {
        self.planets.values().any(|p| p.buy.contains_key(good))
    }

    /// Whether any planet lets the trader sell `good`.
    pub fn is_sold_anywhere(&self, good: &str) -> bool {
        self.planets.values().any(|p| p.sell.contains_key(good))
    }

    pub fn validate(&self) -> TraderResult<()> {
        if self.planets.is_empty() {
            return Err(TraderError::Corpus("market has no planets".to_string()));
        }
        if !(self.travel_fare.is_finite() && self.travel_fare >= 0.0) {
            return Err(TraderError::Corpus(format!(
                "travel fare must be a non-negative number, got {}",
                self.travel_fare
            )));
        }
        for (planet, quotes) in &self.planets {
            for (good, price) in quotes.buy.iter().chain(quotes.sell.iter()) {
                if !(price.is_finite() && *price > 0.0) {
                    return Err(TraderError::Corpus(format!(
                        "price of {good} on planet {planet} must be positive, got {price}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Starting state: on `planet` with an empty hold.
    pub fn initial_state(&self, planet: &str, money: f64) -> TraderResult<State> {
        if !self.has_planet(planet) {
            return Err(TraderError::Config(format!(
                "starting planet {planet} is not part of the market"
            )));
        }
        Ok(State::with_context(
            [(PLANET_KEY, planet), (CARGO_KEY, EMPTY_CARGO)],
            money,
        ))
    }
}
