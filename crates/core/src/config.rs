use serde::Deserialize;

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `GALACTIC_TRADER__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub world: WorldConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,
    /// Seed for the Beta sampler. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_initial_money")]
    pub initial_money: f64,
    #[serde(default = "default_starting_planet")]
    pub starting_planet: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorldConfig {
    /// JSON rule corpus. The embedded default corpus is used when unset.
    #[serde(default)]
    pub corpus_path: Option<String>,
    /// Money delta that maps to a reward of roughly 0.73 (one logistic unit).
    #[serde(default = "default_reward_scale")]
    pub reward_scale: f64,
}

// Default functions
fn default_max_steps() -> u64 {
    5000
}
fn default_initial_money() -> f64 {
    1000.0
}
fn default_starting_planet() -> String {
    "A".to_string()
}
fn default_reward_scale() -> f64 {
    100.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            seed: None,
            initial_money: default_initial_money(),
            starting_planet: default_starting_planet(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            corpus_path: None,
            reward_scale: default_reward_scale(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            world: WorldConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional config file and environment
    /// variables. Environment values win over file values.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("GALACTIC_TRADER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        config.try_deserialize()
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> crate::TraderResult<()> {
        if self.simulation.max_steps == 0 {
            return Err(crate::TraderError::Config(
                "simulation.max_steps must be at least 1".to_string(),
            ));
        }
        if !self.simulation.initial_money.is_finite() {
            return Err(crate::TraderError::Config(
                "simulation.initial_money must be finite".to_string(),
            ));
        }
        if !(self.world.reward_scale.is_finite() && self.world.reward_scale > 0.0) {
            return Err(crate::TraderError::Config(
                "world.reward_scale must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}
