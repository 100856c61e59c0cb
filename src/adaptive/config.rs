use serde::{Deserialize, Serialize};

/// Neither strategy may adjust the level on less history than this.
pub const MIN_DECISION_HISTORY: usize = 2;
/// Insights are only defined from this many attempts on.
pub const MIN_INSIGHT_HISTORY: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleConfig {
    pub lookback_window: usize,
    /// Average response time below this counts as fast (milliseconds).
    pub fast_time_threshold_ms: f64,
    pub high_accuracy: f64,
    pub moderate_accuracy: f64,
    /// Attempts required before any adjustment is made.
    pub min_history: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            lookback_window: 3,
            fast_time_threshold_ms: 8000.0,
            high_accuracy: 0.80,
            moderate_accuracy: 0.67,
            min_history: MIN_DECISION_HISTORY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureConfig {
    pub recent_window: usize,
    pub overall_window: usize,
    /// Trend features stay at 0 until the history is at least this long.
    pub trend_min_history: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            recent_window: 3,
            overall_window: 5,
            trend_min_history: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternConfig {
    pub confidence_threshold: f64,
    /// Distance normalisation for the response-time dimension (milliseconds).
    pub time_scale_ms: f64,
    /// Accuracy and consistency distances are multiplied by this before
    /// being subtracted from a perfect score.
    pub ratio_distance_scale: f64,
    /// A best match must score strictly above this to be used.
    pub min_match_score: f64,
    pub default_confidence: f64,
    pub fallback_window: usize,
    pub min_history: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
            time_scale_ms: 10000.0,
            ratio_distance_scale: 2.0,
            min_match_score: 0.5,
            default_confidence: 0.5,
            fallback_window: 3,
            min_history: MIN_DECISION_HISTORY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightConfig {
    pub min_history: usize,
    pub high_accuracy: f64,
    pub low_accuracy: f64,
    pub quick_time_ms: f64,
    pub slow_time_ms: f64,
    pub improving_trend: f64,
    pub declining_trend: f64,
    pub steady_consistency: f64,
    pub erratic_consistency: f64,
    pub hot_streak: i32,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            min_history: MIN_INSIGHT_HISTORY,
            high_accuracy: 0.8,
            low_accuracy: 0.4,
            quick_time_ms: 5000.0,
            slow_time_ms: 10000.0,
            improving_trend: 0.2,
            declining_trend: -0.2,
            steady_consistency: 0.9,
            erratic_consistency: 0.8,
            hot_streak: 3,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveConfig {
    #[serde(default)]
    pub rule: RuleConfig,
    #[serde(default)]
    pub feature: FeatureConfig,
    #[serde(default)]
    pub pattern: PatternConfig,
    #[serde(default)]
    pub insight: InsightConfig,
}

impl AdaptiveConfig {
    /// Values set in the environment win over whatever the config already holds.
    pub fn apply_env(&mut self, env_config: &crate::config::AdaptiveEnvConfig) {
        if let Some(threshold) = env_config.confidence_threshold {
            self.pattern.confidence_threshold = threshold;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        // RuleConfig
        if self.rule.lookback_window == 0 {
            return Err("rule.lookback_window must be > 0".to_string());
        }
        if self.rule.fast_time_threshold_ms <= 0.0 {
            return Err("rule.fast_time_threshold_ms must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.rule.high_accuracy) {
            return Err("rule.high_accuracy must be in [0,1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.rule.moderate_accuracy) {
            return Err("rule.moderate_accuracy must be in [0,1]".to_string());
        }
        if self.rule.moderate_accuracy > self.rule.high_accuracy {
            return Err("rule.moderate_accuracy must be <= rule.high_accuracy".to_string());
        }
        if self.rule.min_history < MIN_DECISION_HISTORY {
            return Err(format!("rule.min_history must be >= {MIN_DECISION_HISTORY}"));
        }

        // FeatureConfig
        if self.feature.recent_window == 0 || self.feature.overall_window == 0 {
            return Err("feature windows must be > 0".to_string());
        }
        if self.feature.trend_min_history < 2 {
            return Err("feature.trend_min_history must be >= 2".to_string());
        }

        // PatternConfig
        if !(0.0..=1.0).contains(&self.pattern.confidence_threshold) {
            return Err("pattern.confidence_threshold must be in [0,1]".to_string());
        }
        if self.pattern.time_scale_ms <= 0.0 {
            return Err("pattern.time_scale_ms must be > 0".to_string());
        }
        if self.pattern.ratio_distance_scale <= 0.0 {
            return Err("pattern.ratio_distance_scale must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.pattern.min_match_score) {
            return Err("pattern.min_match_score must be in [0,1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.pattern.default_confidence) {
            return Err("pattern.default_confidence must be in [0,1]".to_string());
        }
        if self.pattern.fallback_window == 0 {
            return Err("pattern.fallback_window must be > 0".to_string());
        }
        if self.pattern.min_history < MIN_DECISION_HISTORY {
            return Err(format!("pattern.min_history must be >= {MIN_DECISION_HISTORY}"));
        }

        // InsightConfig
        if self.insight.min_history < MIN_INSIGHT_HISTORY {
            return Err(format!("insight.min_history must be >= {MIN_INSIGHT_HISTORY}"));
        }
        if self.insight.low_accuracy > self.insight.high_accuracy {
            return Err("insight.low_accuracy must be <= insight.high_accuracy".to_string());
        }
        if self.insight.quick_time_ms > self.insight.slow_time_ms {
            return Err("insight.quick_time_ms must be <= insight.slow_time_ms".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = AdaptiveConfig::default();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = AdaptiveConfig::default();
        cfg.pattern.confidence_threshold = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = AdaptiveConfig::default();
        cfg.rule.moderate_accuracy = 0.9;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn short_decision_history_is_rejected() {
        for min_history in [0, 1] {
            let mut cfg = AdaptiveConfig::default();
            cfg.rule.min_history = min_history;
            assert!(cfg.validate().unwrap_err().contains("rule.min_history"));

            let mut cfg = AdaptiveConfig::default();
            cfg.pattern.min_history = min_history;
            assert!(cfg.validate().unwrap_err().contains("pattern.min_history"));
        }

        let mut cfg = AdaptiveConfig::default();
        cfg.rule.min_history = 4;
        cfg.pattern.min_history = 3;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn short_insight_history_is_rejected() {
        let mut cfg = AdaptiveConfig::default();
        cfg.insight.min_history = 2;
        assert!(cfg.validate().unwrap_err().contains("insight.min_history"));

        cfg.insight.min_history = 3;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_min_history_from_json_fails_validation() {
        let cfg: AdaptiveConfig =
            serde_json::from_str(r#"{"pattern": {"minHistory": 0}}"#).unwrap();
        assert_eq!(cfg.pattern.min_history, 0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_fields_and_sections_fall_back_to_defaults() {
        let raw = r#"{"pattern": {"confidenceThreshold": 0.8}}"#;
        let cfg: AdaptiveConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(cfg.pattern.confidence_threshold, 0.8);
        assert_eq!(cfg.pattern.time_scale_ms, 10000.0);
        assert_eq!(cfg.pattern.fallback_window, 3);
        assert_eq!(cfg.pattern.min_history, 2);
        assert_eq!(cfg.rule.lookback_window, 3);
        assert_eq!(cfg.feature.overall_window, 5);
    }

    #[test]
    fn env_overlay_only_touches_set_values() {
        let mut cfg = AdaptiveConfig::default();
        cfg.pattern.confidence_threshold = 0.6;
        cfg.apply_env(&crate::config::AdaptiveEnvConfig::default());
        assert_eq!(cfg.pattern.confidence_threshold, 0.6);

        cfg.apply_env(&crate::config::AdaptiveEnvConfig {
            confidence_threshold: Some(0.9),
            config_path: None,
        });
        assert_eq!(cfg.pattern.confidence_threshold, 0.9);
    }
}
