//! The growing set of arms a run chooses from.
//!
//! New rules enter only through [`RulePool::admit`], which the simulation
//! loop calls strictly between rounds.

use std::collections::VecDeque;
use tracing::info;

use crate::arm::{Rule, RuleArm};

/// Source of rules that become available while a run is in progress.
pub trait RuleFeed {
    fn next_rule(&mut self) -> Option<Rule>;
}

/// Last-in, first-out: rules are taken from the end of the list.
impl RuleFeed for Vec<Rule> {
    fn next_rule(&mut self) -> Option<Rule> {
        self.pop()
    }
}

impl RuleFeed for VecDeque<Rule> {
    fn next_rule(&mut self) -> Option<Rule> {
        self.pop_front()
    }
}

/// A feed that never yields anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFeed;

impl RuleFeed for NoFeed {
    fn next_rule(&mut self) -> Option<Rule> {
        None
    }
}

#[derive(Debug, Default)]
pub struct RulePool {
    arms: Vec<RuleArm>,
    version: u64,
}

impl RulePool {
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            arms: rules.into_iter().map(RuleArm::new).collect(),
            version: 0,
        }
    }

    /// Append one rule as a fresh arm and bump the pool version.
    pub fn admit(&mut self, rule: Rule) {
        info!(rule_id = rule.id, rule_name = %rule.name, action = %rule.action, "Admitting rule");
        self.arms.push(RuleArm::new(rule));
        self.version += 1;
    }

    /// Pull at most one rule from `feed` into the pool. Returns whether a
    /// rule was admitted.
    pub fn admit_from(&mut self, feed: &mut impl RuleFeed) -> bool {
        match feed.next_rule() {
            Some(rule) => {
                self.admit(rule);
                true
            }
            None => false,
        }
    }

    pub fn arms(&self) -> &[RuleArm] {
        &self.arms
    }

    pub fn arm_mut(&mut self, index: usize) -> Option<&mut RuleArm> {
        self.arms.get_mut(index)
    }

    /// Number of admissions since the pool was created.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.arms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }
}
