use crate::adaptive::config::FeatureConfig;
use crate::adaptive::ledger::{accuracy, average_time_ms, Ledger};
use crate::adaptive::types::{Attempt, FeatureVector};

pub fn extract(ledger: &Ledger, config: &FeatureConfig) -> FeatureVector {
    if ledger.is_empty() {
        return FeatureVector::default();
    }

    let recent = ledger.window(config.recent_window);
    let overall = ledger.window(config.overall_window);
    let (accuracy_trend, time_trend_ms) = trends(ledger.attempts(), config.trend_min_history);

    FeatureVector {
        recent_accuracy: accuracy(recent),
        overall_accuracy: accuracy(overall),
        accuracy_trend,
        avg_response_time_ms: average_time_ms(recent),
        time_trend_ms,
        consistency: consistency(recent),
        streak: streak(ledger.attempts()),
    }
}

/// Second half minus first half for accuracy, first minus second for time,
/// so both are positive when the learner improves.
fn trends(history: &[Attempt], min_history: usize) -> (f64, f64) {
    if history.len() < min_history.max(2) {
        return (0.0, 0.0);
    }
    let (first, second) = history.split_at(history.len() / 2);
    let accuracy_trend = accuracy(second) - accuracy(first);
    let time_trend_ms = average_time_ms(first) - average_time_ms(second);
    (accuracy_trend, time_trend_ms)
}

/// 1 minus the population variance of correctness coded as 0/1.
pub fn consistency(window: &[Attempt]) -> f64 {
    if window.len() < 2 {
        return 1.0;
    }
    let mean = accuracy(window);
    let variance = window
        .iter()
        .map(|a| {
            let x = if a.correct { 1.0 } else { 0.0 };
            (x - mean) * (x - mean)
        })
        .sum::<f64>()
        / window.len() as f64;
    (1.0 - variance).clamp(0.0, 1.0)
}

pub fn streak(history: &[Attempt]) -> i32 {
    let Some(last) = history.last() else {
        return 0;
    };
    let run = history
        .iter()
        .rev()
        .take_while(|a| a.correct == last.correct)
        .count() as i32;
    if last.correct {
        run
    } else {
        -run
    }
}
