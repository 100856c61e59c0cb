use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::adaptive::config::{AdaptiveConfig, FeatureConfig, PatternConfig};
use crate::adaptive::decision::rule_based::RuleBasedSelector;
use crate::adaptive::decision::DifficultyStrategy;
use crate::adaptive::features;
use crate::adaptive::ledger::Ledger;
use crate::adaptive::types::*;

/// Inclusive `[min, max]` range a feature is expected to fall into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn distance(&self, value: f64) -> f64 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub name: &'static str,
    pub accuracy: Option<FeatureRange>,
    pub time_ms: Option<FeatureRange>,
    pub consistency: Option<FeatureRange>,
    pub predicted_delta: i8,
    pub base_confidence: f64,
}

const BUILTIN_PATTERNS: [Pattern; 6] = [
    Pattern {
        name: "quick_master",
        accuracy: Some(FeatureRange::new(0.8, 1.0)),
        time_ms: Some(FeatureRange::new(0.0, 6000.0)),
        consistency: Some(FeatureRange::new(0.8, 1.0)),
        predicted_delta: 1,
        base_confidence: 0.9,
    },
    Pattern {
        name: "steady_learner",
        accuracy: Some(FeatureRange::new(0.65, 0.8)),
        time_ms: Some(FeatureRange::new(6000.0, 10000.0)),
        consistency: Some(FeatureRange::new(0.6, 0.8)),
        predicted_delta: 0,
        base_confidence: 0.85,
    },
    Pattern {
        name: "struggling",
        accuracy: Some(FeatureRange::new(0.0, 0.5)),
        time_ms: Some(FeatureRange::new(8000.0, 15000.0)),
        consistency: Some(FeatureRange::new(0.0, 0.5)),
        predicted_delta: -1,
        base_confidence: 0.9,
    },
    Pattern {
        name: "fast_guesser",
        accuracy: Some(FeatureRange::new(0.0, 0.5)),
        time_ms: Some(FeatureRange::new(0.0, 4000.0)),
        consistency: Some(FeatureRange::new(0.0, 0.3)),
        predicted_delta: -1,
        base_confidence: 0.75,
    },
    Pattern {
        name: "slow_thinker",
        accuracy: Some(FeatureRange::new(0.8, 1.0)),
        time_ms: Some(FeatureRange::new(10000.0, 20000.0)),
        consistency: Some(FeatureRange::new(0.7, 1.0)),
        predicted_delta: 0,
        base_confidence: 0.8,
    },
    Pattern {
        name: "improving",
        accuracy: Some(FeatureRange::new(0.6, 0.8)),
        time_ms: Some(FeatureRange::new(5000.0, 9000.0)),
        consistency: Some(FeatureRange::new(0.5, 0.7)),
        predicted_delta: 1,
        base_confidence: 0.7,
    },
];

static BUILTIN_LIBRARY: Lazy<Arc<PatternLibrary>> =
    Lazy::new(|| Arc::new(PatternLibrary::new(BUILTIN_PATTERNS.to_vec())));

/// Immutable set of prototype patterns, kept in declaration order and
/// addressable by name.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    patterns: Vec<Pattern>,
    by_name: HashMap<&'static str, usize>,
}

impl PatternLibrary {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        let by_name = patterns
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.name, idx))
            .collect();
        Self { patterns, by_name }
    }

    pub fn builtin() -> Arc<PatternLibrary> {
        Arc::clone(&BUILTIN_LIBRARY)
    }

    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.by_name.get(name).map(|&idx| &self.patterns[idx])
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct PatternPredictor {
    library: Arc<PatternLibrary>,
    config: PatternConfig,
}

impl PatternPredictor {
    pub fn new(library: Arc<PatternLibrary>, config: PatternConfig) -> Self {
        Self { library, config }
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Mean of the per-dimension scores over the dimensions the pattern
    /// constrains. A pattern constraining nothing never matches.
    pub fn score(&self, pattern: &Pattern, features: &FeatureVector) -> f64 {
        let ratio_scale = self.config.ratio_distance_scale;
        let dims = [
            pattern
                .accuracy
                .map(|r| (1.0 - ratio_scale * r.distance(features.recent_accuracy)).max(0.0)),
            pattern.time_ms.map(|r| {
                (1.0 - r.distance(features.avg_response_time_ms) / self.config.time_scale_ms)
                    .max(0.0)
            }),
            pattern
                .consistency
                .map(|r| (1.0 - ratio_scale * r.distance(features.consistency)).max(0.0)),
        ];

        let (sum, count) = dims
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
        if count == 0 {
            return 0.0;
        }
        sum / count as f64
    }

    pub fn best_match(&self, features: &FeatureVector) -> Option<(&Pattern, f64)> {
        let mut best: Option<(&Pattern, f64)> = None;
        for pattern in self.library.patterns() {
            let score = self.score(pattern, features);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((pattern, score)),
            }
        }
        best
    }

    pub fn predict(&self, features: &FeatureVector) -> Prediction {
        match self.best_match(features) {
            Some((pattern, score)) if score > self.config.min_match_score => Prediction {
                delta: pattern.predicted_delta,
                confidence: (pattern.base_confidence * score).clamp(0.0, 1.0),
                pattern: Some(pattern.name),
            },
            _ => Prediction {
                delta: 0,
                confidence: self.config.default_confidence,
                pattern: None,
            },
        }
    }
}

/// Pattern prediction with a rule-based fallback whenever the prediction is
/// not confident enough.
#[derive(Debug, Clone)]
pub struct PatternMatchingSelector {
    predictor: PatternPredictor,
    rules: RuleBasedSelector,
    features: FeatureConfig,
    config: PatternConfig,
}

impl Default for PatternMatchingSelector {
    fn default() -> Self {
        Self::from_config(&AdaptiveConfig::default())
    }
}

impl PatternMatchingSelector {
    pub fn new(
        library: Arc<PatternLibrary>,
        rules: RuleBasedSelector,
        features: FeatureConfig,
        config: PatternConfig,
    ) -> Self {
        Self {
            predictor: PatternPredictor::new(library, config.clone()),
            rules,
            features,
            config,
        }
    }

    pub fn from_config(config: &AdaptiveConfig) -> Self {
        Self::new(
            PatternLibrary::builtin(),
            RuleBasedSelector::new(config.rule.clone()),
            config.feature.clone(),
            config.pattern.clone(),
        )
    }

    pub fn predictor(&self) -> &PatternPredictor {
        &self.predictor
    }

    pub fn features(&self, ledger: &Ledger) -> FeatureVector {
        features::extract(ledger, &self.features)
    }
}

impl DifficultyStrategy for PatternMatchingSelector {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PatternMatching
    }

    fn decide(&self, current: DifficultyLevel, ledger: &Ledger) -> Decision {
        if ledger.len() < self.config.min_history {
            return Decision::unchanged(self.kind(), current);
        }

        let features = self.features(ledger);
        let prediction = self.predictor.predict(&features);

        let (delta, source) = if prediction.confidence >= self.config.confidence_threshold {
            let name = prediction.pattern.unwrap_or("default").to_string();
            (prediction.delta, DecisionSource::Pattern { name })
        } else {
            tracing::debug!(
                confidence = prediction.confidence,
                threshold = self.config.confidence_threshold,
                "Pattern confidence below threshold, using rules"
            );
            let window = ledger.window(self.config.fallback_window);
            (self.rules.delta_for_window(window), DecisionSource::RuleFallback)
        };

        Decision {
            strategy: self.kind(),
            from: current,
            next: current.offset(delta),
            delta,
            confidence: prediction.confidence,
            source,
        }
    }
}
