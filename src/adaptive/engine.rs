use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::adaptive::config::AdaptiveConfig;
use crate::adaptive::decision::pattern::PatternMatchingSelector;
use crate::adaptive::decision::rule_based::RuleBasedSelector;
use crate::adaptive::decision::DifficultyStrategy;
use crate::adaptive::features;
use crate::adaptive::insights::{self, Insights};
use crate::adaptive::ledger::{Ledger, LedgerError};
use crate::adaptive::monitoring;
use crate::adaptive::types::*;

/// One learner's session: owns the ledger and both difficulty strategies.
pub struct AdaptiveSession {
    session_id: String,
    started_at: DateTime<Utc>,
    config: AdaptiveConfig,
    ledger: Ledger,
    rules: RuleBasedSelector,
    patterns: PatternMatchingSelector,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub stats: AggregateStats,
    pub transitions: Vec<DifficultyTransition>,
    pub final_difficulty: DifficultyLevel,
    pub assessment: Assessment,
    pub insights: Insights,
}

impl AdaptiveSession {
    pub fn new(config: AdaptiveConfig) -> Self {
        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(session_id = %session_id, "Adaptive session started");
        Self {
            session_id,
            started_at: Utc::now(),
            rules: RuleBasedSelector::new(config.rule.clone()),
            patterns: PatternMatchingSelector::from_config(&config),
            ledger: Ledger::new(),
            config,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn reload_config(&mut self, new_config: AdaptiveConfig) -> Result<(), String> {
        new_config.validate()?;
        self.rules = RuleBasedSelector::new(new_config.rule.clone());
        self.patterns = PatternMatchingSelector::from_config(&new_config);
        self.config = new_config;
        tracing::info!(session_id = %self.session_id, "Adaptive config reloaded");
        Ok(())
    }

    pub fn record_attempt(
        &mut self,
        correct: bool,
        response_time_ms: f64,
        difficulty_at_time: i64,
    ) -> Result<(), LedgerError> {
        match self.ledger.record(correct, response_time_ms, difficulty_at_time) {
            Ok(attempt) => {
                tracing::debug!(
                    session_id = %self.session_id,
                    sequence = attempt.sequence_number,
                    correct,
                    response_time_ms,
                    difficulty = %attempt.difficulty_at_time,
                    "Attempt recorded"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(session_id = %self.session_id, error = %e, "Attempt rejected");
                Err(e)
            }
        }
    }

    pub fn strategy(&self, kind: StrategyKind) -> &dyn DifficultyStrategy {
        match kind {
            StrategyKind::RuleBased => &self.rules,
            StrategyKind::PatternMatching => &self.patterns,
        }
    }

    pub fn decide(&self, current: DifficultyLevel, kind: StrategyKind) -> Decision {
        let decision = self.strategy(kind).decide(current, &self.ledger);
        let features = features::extract(&self.ledger, &self.config.feature);
        monitoring::record_decision(&self.session_id, &features, &decision);
        decision
    }

    pub fn next_difficulty(&self, current: DifficultyLevel, kind: StrategyKind) -> DifficultyLevel {
        self.decide(current, kind).next
    }

    pub fn aggregate_stats(&self) -> AggregateStats {
        self.ledger.aggregate_stats()
    }

    pub fn assessment(&self) -> Assessment {
        self.rules.assessment(&self.ledger)
    }

    pub fn insights(&self) -> Insights {
        insights::derive(&self.ledger, &self.config.feature, &self.config.insight)
    }

    pub fn transitions(&self) -> Vec<DifficultyTransition> {
        self.ledger.transitions()
    }

    pub fn summary(&self, final_difficulty: DifficultyLevel) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            started_at: self.started_at,
            ended_at: Utc::now(),
            stats: self.aggregate_stats(),
            transitions: self.transitions(),
            final_difficulty,
            assessment: self.assessment(),
            insights: self.insights(),
        }
    }

    pub fn reset(&mut self) {
        self.ledger.reset();
        tracing::info!(session_id = %self.session_id, "Adaptive session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_decides_with_both_strategies() {
        let mut session = AdaptiveSession::new(AdaptiveConfig::default());
        session.record_attempt(true, 3000.0, 1).unwrap();
        assert_eq!(
            session.next_difficulty(DifficultyLevel::Medium, StrategyKind::RuleBased),
            DifficultyLevel::Medium
        );

        session.record_attempt(true, 2500.0, 1).unwrap();
        session.record_attempt(true, 4000.0, 1).unwrap();
        for kind in [StrategyKind::RuleBased, StrategyKind::PatternMatching] {
            assert_eq!(
                session.next_difficulty(DifficultyLevel::Medium, kind),
                DifficultyLevel::Hard
            );
        }
    }

    #[test]
    fn invalid_attempt_is_not_recorded() {
        let mut session = AdaptiveSession::new(AdaptiveConfig::default());
        assert!(session.record_attempt(true, -5.0, 1).is_err());
        assert!(session.record_attempt(true, 5.0, 7).is_err());
        assert_eq!(session.aggregate_stats().total, 0);
    }

    #[test]
    fn reload_rejects_invalid_config() {
        let mut session = AdaptiveSession::new(AdaptiveConfig::default());
        let mut bad = AdaptiveConfig::default();
        bad.rule.lookback_window = 0;
        assert!(session.reload_config(bad).is_err());
        assert_eq!(session.config().rule.lookback_window, 3);

        let mut stricter = AdaptiveConfig::default();
        stricter.pattern.confidence_threshold = 0.95;
        assert!(session.reload_config(stricter).is_ok());
        assert_eq!(session.config().pattern.confidence_threshold, 0.95);
    }

    #[test]
    fn reload_keeps_empty_history_guard() {
        let mut session = AdaptiveSession::new(AdaptiveConfig::default());
        let mut eager = AdaptiveConfig::default();
        eager.rule.min_history = 0;
        eager.pattern.min_history = 0;
        assert!(session.reload_config(eager).is_err());

        for kind in [StrategyKind::RuleBased, StrategyKind::PatternMatching] {
            assert_eq!(
                session.next_difficulty(DifficultyLevel::Medium, kind),
                DifficultyLevel::Medium
            );
        }
    }

    #[test]
    fn summary_reflects_history() {
        let mut session = AdaptiveSession::new(AdaptiveConfig::default());
        session.record_attempt(true, 2000.0, 0).unwrap();
        session.record_attempt(true, 2000.0, 1).unwrap();
        session.record_attempt(false, 9000.0, 2).unwrap();

        let summary = session.summary(DifficultyLevel::Medium);
        assert_eq!(summary.stats.total, 3);
        assert_eq!(summary.transitions.len(), 2);
        assert_eq!(summary.final_difficulty, DifficultyLevel::Medium);
        assert!(summary.insights.style().is_some());
        assert!(summary.ended_at >= summary.started_at);

        session.reset();
        assert!(session.ledger().is_empty());
    }
}
