use thiserror::Error;

use crate::adaptive::types::*;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("invalid attempt: {reason}")]
    InvalidAttempt { reason: String },
}

/// Append-only record of one learner's attempts, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    attempts: Vec<Attempt>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        correct: bool,
        response_time_ms: f64,
        difficulty_at_time: i64,
    ) -> Result<&Attempt, LedgerError> {
        if !response_time_ms.is_finite() || response_time_ms < 0.0 {
            return Err(LedgerError::InvalidAttempt {
                reason: format!(
                    "response time must be a non-negative number, got {response_time_ms}"
                ),
            });
        }
        let difficulty_at_time =
            DifficultyLevel::try_from(difficulty_at_time).map_err(|raw| {
                LedgerError::InvalidAttempt {
                    reason: format!("difficulty must be 0, 1 or 2, got {raw}"),
                }
            })?;

        let attempt = Attempt {
            sequence_number: self.attempts.len() as u32 + 1,
            correct,
            response_time_ms,
            difficulty_at_time,
        };
        self.attempts.push(attempt);
        Ok(&self.attempts[self.attempts.len() - 1])
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn last(&self) -> Option<&Attempt> {
        self.attempts.last()
    }

    pub fn window(&self, n: usize) -> &[Attempt] {
        let start = self.attempts.len().saturating_sub(n);
        &self.attempts[start..]
    }

    pub fn aggregate_stats(&self) -> AggregateStats {
        if self.attempts.is_empty() {
            return AggregateStats::default();
        }

        let total = self.attempts.len();
        let correct_count = correct_count(&self.attempts);
        AggregateStats {
            total,
            correct_count,
            incorrect_count: total - correct_count,
            accuracy_percent: accuracy(&self.attempts) * 100.0,
            average_response_time_ms: average_time_ms(&self.attempts),
        }
    }

    pub fn recent_accuracy_percent(&self, n: usize) -> f64 {
        accuracy(self.window(n)) * 100.0
    }

    pub fn recent_avg_time_ms(&self, n: usize) -> f64 {
        average_time_ms(self.window(n))
    }

    pub fn transitions(&self) -> Vec<DifficultyTransition> {
        self.attempts
            .windows(2)
            .filter_map(|pair| {
                let (prev, next) = (&pair[0], &pair[1]);
                if prev.difficulty_at_time == next.difficulty_at_time {
                    return None;
                }
                let direction = if next.difficulty_at_time > prev.difficulty_at_time {
                    Direction::Up
                } else {
                    Direction::Down
                };
                Some(DifficultyTransition {
                    from: prev.difficulty_at_time,
                    to: next.difficulty_at_time,
                    direction,
                    occurred_at_sequence_number: next.sequence_number,
                })
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.attempts.clear();
    }
}

pub fn correct_count(attempts: &[Attempt]) -> usize {
    attempts.iter().filter(|a| a.correct).count()
}

/// Fraction of correct attempts in `[0, 1]`; 0.0 for an empty slice.
pub fn accuracy(attempts: &[Attempt]) -> f64 {
    if attempts.is_empty() {
        return 0.0;
    }
    correct_count(attempts) as f64 / attempts.len() as f64
}

pub fn average_time_ms(attempts: &[Attempt]) -> f64 {
    if attempts.is_empty() {
        return 0.0;
    }
    attempts.iter().map(|a| a.response_time_ms).sum::<f64>() / attempts.len() as f64
}
