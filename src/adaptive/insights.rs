use serde::{Deserialize, Serialize};

use crate::adaptive::config::{FeatureConfig, InsightConfig};
use crate::adaptive::features;
use crate::adaptive::ledger::Ledger;
use crate::adaptive::types::FeatureVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearningStyle {
    Quick,
    Thoughtful,
    FastLearner,
    NeedsSupport,
    Steady,
    Developing,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Thoughtful => "thoughtful",
            Self::FastLearner => "fast-learner",
            Self::NeedsSupport => "needs-support",
            Self::Steady => "steady",
            Self::Developing => "developing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strength {
    Accuracy,
    Speed,
    Consistency,
    Improvement,
    Momentum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusArea {
    Accuracy,
    Speed,
    Consistency,
    DecliningAccuracy,
    SlowingDown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "status")]
pub enum Insights {
    InsufficientData {
        attempts: usize,
        required: usize,
    },
    Profile {
        style: LearningStyle,
        strengths: Vec<Strength>,
        focus_areas: Vec<FocusArea>,
        features: FeatureVector,
    },
}

impl Insights {
    pub fn style(&self) -> Option<LearningStyle> {
        match self {
            Self::Profile { style, .. } => Some(*style),
            Self::InsufficientData { .. } => None,
        }
    }
}

pub fn derive(ledger: &Ledger, feature_config: &FeatureConfig, config: &InsightConfig) -> Insights {
    if ledger.len() < config.min_history {
        return Insights::InsufficientData {
            attempts: ledger.len(),
            required: config.min_history,
        };
    }

    let f = features::extract(ledger, feature_config);
    Insights::Profile {
        style: classify(&f, config),
        strengths: strengths(&f, config),
        focus_areas: focus_areas(&f, config),
        features: f,
    }
}

pub fn classify(f: &FeatureVector, config: &InsightConfig) -> LearningStyle {
    if f.recent_accuracy >= config.high_accuracy && f.avg_response_time_ms < config.quick_time_ms {
        LearningStyle::Quick
    } else if f.recent_accuracy >= config.high_accuracy
        && f.avg_response_time_ms >= config.slow_time_ms
    {
        LearningStyle::Thoughtful
    } else if f.accuracy_trend >= config.improving_trend {
        LearningStyle::FastLearner
    } else if f.recent_accuracy < config.low_accuracy {
        LearningStyle::NeedsSupport
    } else if f.consistency >= config.steady_consistency {
        LearningStyle::Steady
    } else {
        LearningStyle::Developing
    }
}

fn strengths(f: &FeatureVector, config: &InsightConfig) -> Vec<Strength> {
    let mut out = Vec::new();
    if f.recent_accuracy >= config.high_accuracy {
        out.push(Strength::Accuracy);
    }
    if f.avg_response_time_ms < config.quick_time_ms {
        out.push(Strength::Speed);
    }
    if f.consistency >= config.steady_consistency {
        out.push(Strength::Consistency);
    }
    if f.accuracy_trend >= config.improving_trend || f.time_trend_ms > 0.0 {
        out.push(Strength::Improvement);
    }
    if f.streak >= config.hot_streak {
        out.push(Strength::Momentum);
    }
    out
}

fn focus_areas(f: &FeatureVector, config: &InsightConfig) -> Vec<FocusArea> {
    let mut out = Vec::new();
    if f.recent_accuracy < config.low_accuracy {
        out.push(FocusArea::Accuracy);
    }
    if f.avg_response_time_ms >= config.slow_time_ms {
        out.push(FocusArea::Speed);
    }
    if f.consistency < config.erratic_consistency {
        out.push(FocusArea::Consistency);
    }
    if f.accuracy_trend <= config.declining_trend {
        out.push(FocusArea::DecliningAccuracy);
    }
    if f.time_trend_ms < 0.0 {
        out.push(FocusArea::SlowingDown);
    }
    out
}
