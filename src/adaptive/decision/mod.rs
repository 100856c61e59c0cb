pub mod pattern;
pub mod rule_based;

use crate::adaptive::ledger::Ledger;
use crate::adaptive::types::{Decision, DifficultyLevel, StrategyKind};

/// A policy mapping the current level and the learner's history to the
/// next level.
pub trait DifficultyStrategy {
    fn kind(&self) -> StrategyKind;

    fn decide(&self, current: DifficultyLevel, ledger: &Ledger) -> Decision;

    fn next_difficulty(&self, current: DifficultyLevel, ledger: &Ledger) -> DifficultyLevel {
        self.decide(current, ledger).next
    }
}
