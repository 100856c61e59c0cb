use crate::adaptive::config::RuleConfig;
use crate::adaptive::decision::DifficultyStrategy;
use crate::adaptive::ledger::{accuracy, average_time_ms, Ledger};
use crate::adaptive::types::*;

#[derive(Debug, Clone, Default)]
pub struct RuleBasedSelector {
    config: RuleConfig,
}

impl RuleBasedSelector {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn tier(&self, accuracy: f64, avg_time_ms: f64) -> PerformanceTier {
        let c = &self.config;
        if accuracy >= c.high_accuracy && avg_time_ms < c.fast_time_threshold_ms {
            PerformanceTier::High
        } else if accuracy >= c.moderate_accuracy {
            PerformanceTier::Moderate
        } else {
            PerformanceTier::Low
        }
    }

    pub fn delta_for_window(&self, window: &[Attempt]) -> i8 {
        match self.tier(accuracy(window), average_time_ms(window)) {
            PerformanceTier::High => 1,
            PerformanceTier::Moderate => 0,
            PerformanceTier::Low => -1,
        }
    }

    pub fn assessment(&self, ledger: &Ledger) -> Assessment {
        if ledger.is_empty() {
            return Assessment::insufficient();
        }

        let recent = ledger.window(self.config.lookback_window);
        let acc = accuracy(recent);
        let avg_time_ms = average_time_ms(recent);
        Assessment {
            accuracy_percent: acc * 100.0,
            avg_time_ms,
            tier: self.tier(acc, avg_time_ms),
            is_insufficient_data: false,
        }
    }
}

impl DifficultyStrategy for RuleBasedSelector {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RuleBased
    }

    fn decide(&self, current: DifficultyLevel, ledger: &Ledger) -> Decision {
        if ledger.len() < self.config.min_history {
            return Decision::unchanged(self.kind(), current);
        }

        let delta = self.delta_for_window(ledger.window(self.config.lookback_window));
        Decision {
            strategy: self.kind(),
            from: current,
            next: current.offset(delta),
            delta,
            confidence: 1.0,
            source: DecisionSource::Rules,
        }
    }
}
