use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn index(self) -> i64 {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
        }
    }

    /// Saturates anything below 0 to `Easy` and anything above 2 to `Hard`.
    pub fn from_clamped(raw: i64) -> Self {
        match raw.clamp(0, 2) {
            0 => Self::Easy,
            1 => Self::Medium,
            _ => Self::Hard,
        }
    }

    pub fn offset(self, delta: i8) -> Self {
        Self::from_clamped(self.index() + i64::from(delta))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl TryFrom<i64> for DifficultyLevel {
    type Error = i64;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Easy),
            1 => Ok(Self::Medium),
            2 => Ok(Self::Hard),
            other => Err(other),
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub sequence_number: u32,
    pub correct: bool,
    pub response_time_ms: f64,
    pub difficulty_at_time: DifficultyLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyTransition {
    pub from: DifficultyLevel,
    pub to: DifficultyLevel,
    pub direction: Direction,
    pub occurred_at_sequence_number: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub accuracy_percent: f64,
    pub average_response_time_ms: f64,
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self {
            total: 0,
            correct_count: 0,
            incorrect_count: 0,
            accuracy_percent: 0.0,
            average_response_time_ms: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PerformanceTier {
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub accuracy_percent: f64,
    pub avg_time_ms: f64,
    pub tier: PerformanceTier,
    pub is_insufficient_data: bool,
}

impl Assessment {
    pub fn insufficient() -> Self {
        Self {
            accuracy_percent: 0.0,
            avg_time_ms: 0.0,
            tier: PerformanceTier::Low,
            is_insufficient_data: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    pub recent_accuracy: f64,
    pub overall_accuracy: f64,
    pub accuracy_trend: f64,
    pub avg_response_time_ms: f64,
    /// Positive when the learner is getting faster.
    pub time_trend_ms: f64,
    pub consistency: f64,
    /// Positive for a run of correct answers, negative for incorrect ones.
    pub streak: i32,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            recent_accuracy: 0.0,
            overall_accuracy: 0.0,
            accuracy_trend: 0.0,
            avg_response_time_ms: 0.0,
            time_trend_ms: 0.0,
            consistency: 1.0,
            streak: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub delta: i8,
    pub confidence: f64,
    pub pattern: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    RuleBased,
    PatternMatching,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RuleBased => "rule_based",
            Self::PatternMatching => "pattern_matching",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DecisionSource {
    InsufficientHistory,
    Rules,
    Pattern { name: String },
    RuleFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub strategy: StrategyKind,
    pub from: DifficultyLevel,
    pub next: DifficultyLevel,
    /// Unclamped adjustment that produced `next`.
    pub delta: i8,
    pub confidence: f64,
    pub source: DecisionSource,
}

impl Decision {
    pub fn unchanged(strategy: StrategyKind, current: DifficultyLevel) -> Self {
        Self {
            strategy,
            from: current,
            next: current,
            delta: 0,
            confidence: 0.0,
            source: DecisionSource::InsufficientHistory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_saturates_at_both_ends() {
        assert_eq!(DifficultyLevel::Hard.offset(1), DifficultyLevel::Hard);
        assert_eq!(DifficultyLevel::Easy.offset(-1), DifficultyLevel::Easy);
        assert_eq!(DifficultyLevel::Medium.offset(1), DifficultyLevel::Hard);
        assert_eq!(DifficultyLevel::from_clamped(-7), DifficultyLevel::Easy);
        assert_eq!(DifficultyLevel::from_clamped(9), DifficultyLevel::Hard);
    }

    #[test]
    fn try_from_rejects_out_of_range() {
        assert_eq!(DifficultyLevel::try_from(1), Ok(DifficultyLevel::Medium));
        assert_eq!(DifficultyLevel::try_from(3), Err(3));
        assert_eq!(DifficultyLevel::try_from(-1), Err(-1));
    }

    #[test]
    fn serde_roundtrip() {
        let decision = Decision {
            strategy: StrategyKind::PatternMatching,
            from: DifficultyLevel::Medium,
            next: DifficultyLevel::Hard,
            delta: 1,
            confidence: 0.9,
            source: DecisionSource::Pattern {
                name: "quick_master".to_string(),
            },
        };
        let encoded = serde_json::to_string(&decision).unwrap();
        let decoded: Decision = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, decision);
    }
}
