//! Galactic Trader — a trader agent that learns which rules pay off by
//! Thompson Sampling over a rule corpus.
//!
//! Main entry point: loads configuration and the corpus, runs one
//! simulation and prints its summary.

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use trader_core::config::AppConfig;
use trader_rl_engine::{BetaSampler, SimulationLoop, TracingObserver, TransitionExecutor};
use trader_world::{Corpus, MoneyDeltaReward};

const DEFAULT_LOG_FILTER: &str = "galactic_trader=info,trader_rl_engine=info,trader_world=info";

#[derive(Parser, Debug)]
#[command(name = "galactic-trader")]
#[command(about = "Rule-selecting trader agent driven by Thompson Sampling")]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(long, short)]
    config: Option<String>,

    /// Maximum number of rounds (overrides config)
    #[arg(long, env = "GALACTIC_TRADER__SIMULATION__MAX_STEPS")]
    steps: Option<u64>,

    /// Sampler seed for a reproducible run (overrides config)
    #[arg(long, env = "GALACTIC_TRADER__SIMULATION__SEED")]
    seed: Option<u64>,

    /// Starting money (overrides config)
    #[arg(long)]
    money: Option<f64>,

    /// Starting planet (overrides config)
    #[arg(long)]
    planet: Option<String>,

    /// JSON rule corpus (overrides config)
    #[arg(long, env = "GALACTIC_TRADER__WORLD__CORPUS_PATH")]
    corpus: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("Galactic Trader starting up");

    // Load configuration
    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_none() => {
            warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        }
        Err(e) => return Err(e).context("failed to load config file"),
    };

    // Apply CLI overrides
    if let Some(steps) = cli.steps {
        config.simulation.max_steps = steps;
    }
    if cli.seed.is_some() {
        config.simulation.seed = cli.seed;
    }
    if let Some(money) = cli.money {
        config.simulation.initial_money = money;
    }
    if let Some(planet) = cli.planet {
        config.simulation.starting_planet = planet;
    }
    if cli.corpus.is_some() {
        config.world.corpus_path = cli.corpus;
    }
    config.validate()?;

    info!(
        max_steps = config.simulation.max_steps,
        seed = ?config.simulation.seed,
        initial_money = config.simulation.initial_money,
        starting_planet = %config.simulation.starting_planet,
        corpus = ?config.world.corpus_path,
        "Configuration loaded"
    );

    let corpus = match &config.world.corpus_path {
        Some(path) => {
            let context = || format!("failed to read corpus {path}");
            Corpus::load(path).with_context(context)?
        }
        None => Corpus::embedded()?,
    };
    let corpus = corpus.validate()?;

    let state = corpus.market.initial_state(
        &config.simulation.starting_planet,
        config.simulation.initial_money,
    )?;

    let mut simulation = SimulationLoop::new(
        config.simulation.max_steps,
        corpus.starting_pool(),
        state,
        BetaSampler::new(config.simulation.seed),
        TransitionExecutor::new(MoneyDeltaReward::new(config.world.reward_scale)),
    )?
    .with_feed(corpus.reasoned_feed());

    let summary = simulation.run(&mut TracingObserver)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
