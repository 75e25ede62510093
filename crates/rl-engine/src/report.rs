//! Per-round and end-of-run records, and the observers that receive them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use trader_core::{ActionCategory, RuleId};
use uuid::Uuid;

use crate::arm::RuleArm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    Running,
    StoppedNoRules,
    StoppedDepleted,
    StoppedMaxSteps,
}

impl SimulationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SimulationStatus::Running)
    }
}

/// What happened in one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u64,
    pub rule_id: RuleId,
    pub rule_name: String,
    pub action: ActionCategory,
    pub money: f64,
    pub money_delta: f64,
    pub reward: f64,
    pub status: SimulationStatus,
}

/// Posterior of one arm at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmSnapshot {
    pub rule_id: RuleId,
    pub rule_name: String,
    pub action: ActionCategory,
    pub alpha: f64,
    pub beta: f64,
    pub pulls: u64,
    pub expected_value: f64,
}

impl From<&RuleArm> for ArmSnapshot {
    fn from(arm: &RuleArm) -> Self {
        let posterior = arm.posterior();
        Self {
            rule_id: arm.rule().id,
            rule_name: arm.rule().name.clone(),
            action: arm.rule().action,
            alpha: posterior.alpha,
            beta: posterior.beta,
            pulls: arm.pulls(),
            expected_value: posterior.expected_value(),
        }
    }
}

/// Terminal record of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub run_id: Uuid,
    pub status: SimulationStatus,
    pub final_money: f64,
    /// Rounds that executed a rule.
    pub rounds: u64,
    pub pool_size: usize,
    pub pool_version: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub arms: Vec<ArmSnapshot>,
}

/// Receives the records a run produces.
pub trait RoundObserver {
    fn on_round(&mut self, report: &RoundReport);

    fn on_finish(&mut self, _summary: &SimulationSummary) {}
}

/// Logs every record through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RoundObserver for TracingObserver {
    fn on_round(&mut self, report: &RoundReport) {
        info!(
            round = report.round,
            action = %report.action,
            rule_id = report.rule_id,
            rule_name = %report.rule_name,
            money = report.money,
            money_delta = report.money_delta,
            reward = report.reward,
            "Round complete"
        );
    }

    fn on_finish(&mut self, summary: &SimulationSummary) {
        info!(
            run_id = %summary.run_id,
            status = ?summary.status,
            final_money = summary.final_money,
            rounds = summary.rounds,
            pool_size = summary.pool_size,
            "Simulation stopped"
        );
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub rounds: Vec<RoundReport>,
    pub summary: Option<SimulationSummary>,
}

impl RoundObserver for RecordingObserver {
    fn on_round(&mut self, report: &RoundReport) {
        self.rounds.push(report.clone());
    }

    fn on_finish(&mut self, summary: &SimulationSummary) {
        self.summary = Some(summary.clone());
    }
}
