use std::env;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::adaptive::config::AdaptiveConfig;
use crate::adaptive::types::StrategyKind;
use crate::constants::{DEFAULT_MAX_PUZZLES, DEFAULT_START_DIFFICULTY};

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub max_puzzles: u32,
    pub start_difficulty: i64,
    pub strategy: StrategyKind,
    pub adaptive: AdaptiveEnvConfig,
}

/// Adaptive overrides read from the environment. `None` leaves the value from
/// the defaults or the config file untouched.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveEnvConfig {
    pub confidence_threshold: Option<f64>,
    pub config_path: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse adaptive config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid adaptive config: {0}")]
    Invalid(String),
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            log_level: env_or("RUST_LOG", "warn"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            max_puzzles: env_or_parse("MAX_PUZZLES", DEFAULT_MAX_PUZZLES),
            start_difficulty: env_or_parse("START_DIFFICULTY", DEFAULT_START_DIFFICULTY),
            strategy: parse_strategy(&env_or("ADAPTIVE_STRATEGY", "pattern")),
            adaptive: AdaptiveEnvConfig {
                confidence_threshold: env_parse_opt("ADAPTIVE_CONFIDENCE_THRESHOLD"),
                config_path: env::var("ADAPTIVE_CONFIG_PATH")
                    .ok()
                    .filter(|p| !p.trim().is_empty()),
            },
        }
    }
}

fn parse_strategy(raw: &str) -> StrategyKind {
    match raw.trim().to_ascii_lowercase().as_str() {
        "rule" | "rules" | "rule_based" | "rule-based" => StrategyKind::RuleBased,
        "pattern" | "patterns" | "pattern_matching" | "pattern-matching" | "ml" => {
            StrategyKind::PatternMatching
        }
        other => {
            tracing::warn!(value = other, "Unknown ADAPTIVE_STRATEGY, using pattern matching");
            StrategyKind::PatternMatching
        }
    }
}

/// Starts from the JSON file at `ADAPTIVE_CONFIG_PATH` (or the defaults),
/// then applies environment overrides on top. The result is always validated.
pub fn load_adaptive_config(env_config: &AdaptiveEnvConfig) -> Result<AdaptiveConfig, ConfigError> {
    let mut config = match &env_config.config_path {
        Some(path) => read_adaptive_config(Path::new(path))?,
        None => AdaptiveConfig::default(),
    };
    config.apply_env(env_config);
    config.validate().map_err(ConfigError::Invalid)?;
    Ok(config)
}

pub fn read_adaptive_config(path: &Path) -> Result<AdaptiveConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

/// Like [`env_or_parse`] but distinguishes "unset" from a parsed value.
pub fn env_parse_opt<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Failed to parse env var, ignoring it");
            None
        }
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
