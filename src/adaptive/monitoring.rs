use serde::{Deserialize, Serialize};

use crate::adaptive::types::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvariantViolation {
    pub field: String,
    pub value: f64,
    pub expected_range: String,
}

pub fn check_invariants(features: &FeatureVector, decision: &Decision) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    check_range(&mut violations, "recent_accuracy", features.recent_accuracy, 0.0, 1.0);
    check_range(&mut violations, "overall_accuracy", features.overall_accuracy, 0.0, 1.0);
    check_range(&mut violations, "accuracy_trend", features.accuracy_trend, -1.0, 1.0);
    check_range(&mut violations, "consistency", features.consistency, 0.0, 1.0);
    check_range(
        &mut violations,
        "avg_response_time_ms",
        features.avg_response_time_ms,
        0.0,
        f64::INFINITY,
    );

    check_range(&mut violations, "confidence", decision.confidence, 0.0, 1.0);
    check_range(&mut violations, "delta", f64::from(decision.delta), -1.0, 1.0);

    violations
}

fn check_range(
    violations: &mut Vec<InvariantViolation>,
    field: &str,
    value: f64,
    min: f64,
    max: f64,
) {
    if value.is_nan() || value < min || value > max {
        violations.push(InvariantViolation {
            field: field.to_string(),
            value,
            expected_range: format!("[{min}, {max}]"),
        });
    }
}

pub fn record_decision(session_id: &str, features: &FeatureVector, decision: &Decision) {
    let violations = check_invariants(features, decision);
    if !violations.is_empty() {
        tracing::warn!(session_id, ?violations, "Adaptive invariant violation");
    }

    tracing::debug!(
        session_id,
        strategy = decision.strategy.as_str(),
        source = ?decision.source,
        confidence = decision.confidence,
        from = %decision.from,
        to = %decision.next,
        "Difficulty decision"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_decision_has_no_violations() {
        let decision = Decision::unchanged(StrategyKind::RuleBased, DifficultyLevel::Easy);
        assert!(check_invariants(&FeatureVector::default(), &decision).is_empty());
    }

    #[test]
    fn out_of_range_values_are_reported() {
        let features = FeatureVector {
            recent_accuracy: 1.2,
            consistency: f64::NAN,
            ..FeatureVector::default()
        };
        let mut decision =
            Decision::unchanged(StrategyKind::PatternMatching, DifficultyLevel::Hard);
        decision.delta = 2;

        let fields: Vec<String> = check_invariants(&features, &decision)
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(fields, vec!["recent_accuracy", "consistency", "delta"]);
    }
}
