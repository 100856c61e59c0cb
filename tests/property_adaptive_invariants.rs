use proptest::prelude::*;

use math_adventures::adaptive::config::{FeatureConfig, PatternConfig};
use math_adventures::adaptive::decision::pattern::{
    PatternLibrary, PatternMatchingSelector, PatternPredictor,
};
use math_adventures::adaptive::decision::rule_based::RuleBasedSelector;
use math_adventures::adaptive::decision::DifficultyStrategy;
use math_adventures::adaptive::features;
use math_adventures::adaptive::ledger::Ledger;
use math_adventures::adaptive::types::{DecisionSource, DifficultyLevel, FeatureVector};

fn level() -> impl Strategy<Value = DifficultyLevel> {
    prop_oneof![
        Just(DifficultyLevel::Easy),
        Just(DifficultyLevel::Medium),
        Just(DifficultyLevel::Hard),
    ]
}

fn history(max_len: usize) -> impl Strategy<Value = Vec<(bool, f64, i64)>> {
    prop::collection::vec((any::<bool>(), 0.0_f64..40000.0, 0_i64..3), 0..max_len)
}

fn ledger_from(entries: &[(bool, f64, i64)]) -> Ledger {
    let mut ledger = Ledger::new();
    for &(correct, time_ms, difficulty) in entries {
        ledger.record(correct, time_ms, difficulty).unwrap();
    }
    ledger
}

proptest! {
    #[test]
    fn pt_short_history_keeps_level(current in level(), entries in history(2)) {
        let ledger = ledger_from(&entries);
        prop_assert_eq!(RuleBasedSelector::default().next_difficulty(current, &ledger), current);
        prop_assert_eq!(
            PatternMatchingSelector::default().next_difficulty(current, &ledger),
            current
        );
    }

    #[test]
    fn pt_next_level_moves_at_most_one_step(current in level(), entries in history(40)) {
        let ledger = ledger_from(&entries);
        for decision in [
            RuleBasedSelector::default().decide(current, &ledger),
            PatternMatchingSelector::default().decide(current, &ledger),
        ] {
            prop_assert!((-1..=1).contains(&decision.delta));
            prop_assert!((decision.next.index() - current.index()).abs() <= 1);
            let raw = current.index() + i64::from(decision.delta);
            prop_assert_eq!(decision.next, DifficultyLevel::from_clamped(raw));
        }
    }

    #[test]
    fn pt_fallback_matches_rule_delta(current in level(), entries in history(30)) {
        let ledger = ledger_from(&entries);
        let decision = PatternMatchingSelector::default().decide(current, &ledger);
        if decision.source == DecisionSource::RuleFallback {
            prop_assert!(decision.confidence < 0.7);
            let rule_delta = RuleBasedSelector::default().delta_for_window(ledger.window(3));
            prop_assert_eq!(decision.delta, rule_delta);
        }
    }

    #[test]
    fn pt_rule_thresholds_hold(current in level(), entries in history(30)) {
        prop_assume!(entries.len() >= 2);
        let ledger = ledger_from(&entries);
        let window = ledger.window(3);
        let accuracy = window.iter().filter(|a| a.correct).count() as f64 / window.len() as f64;
        let avg_time = window.iter().map(|a| a.response_time_ms).sum::<f64>() / window.len() as f64;

        let decision = RuleBasedSelector::default().decide(current, &ledger);
        if accuracy >= 0.80 && avg_time < 8000.0 {
            prop_assert_eq!(decision.delta, 1);
        }
        if accuracy < 0.67 {
            prop_assert_eq!(decision.delta, -1);
        }
    }

    #[test]
    fn pt_features_stay_in_range(entries in history(50)) {
        let ledger = ledger_from(&entries);
        let f = features::extract(&ledger, &FeatureConfig::default());
        prop_assert!((0.0..=1.0).contains(&f.recent_accuracy));
        prop_assert!((0.0..=1.0).contains(&f.overall_accuracy));
        prop_assert!((-1.0..=1.0).contains(&f.accuracy_trend));
        prop_assert!((0.0..=1.0).contains(&f.consistency));
        prop_assert!(f.avg_response_time_ms >= 0.0);
        prop_assert!(f.streak.unsigned_abs() as usize <= entries.len());
    }

    #[test]
    fn pt_prediction_confidence_in_unit_range(
        accuracy in 0.0_f64..=1.0,
        time_ms in 0.0_f64..40000.0,
        consistency in 0.0_f64..=1.0,
    ) {
        let predictor = PatternPredictor::new(PatternLibrary::builtin(), PatternConfig::default());
        let features = FeatureVector {
            recent_accuracy: accuracy,
            avg_response_time_ms: time_ms,
            consistency,
            ..FeatureVector::default()
        };
        let prediction = predictor.predict(&features);
        prop_assert!((0.0..=1.0).contains(&prediction.confidence));
        prop_assert!((-1..=1).contains(&prediction.delta));
        for pattern in predictor.library().patterns() {
            let score = predictor.score(pattern, &features);
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}
