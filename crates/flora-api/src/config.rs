//! YAML configuration for the explorer session

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use flora_core::ShortQueryPolicy;

use crate::remote::RemoteBehavior;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplorerConfig {
    /// Quiet window after the last keystroke before a search fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_latency_min_ms")]
    pub latency_min_ms: u64,
    #[serde(default = "default_latency_max_ms")]
    pub latency_max_ms: u64,
    /// Probability in [0, 1] that a simulated call answers 503
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
    /// Fixed seed for reproducible latency and failures
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub short_query_policy: ShortQueryPolicy,
    /// Default tracing filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_latency_min_ms() -> u64 {
    500
}

fn default_latency_max_ms() -> u64 {
    1500
}

fn default_failure_rate() -> f64 {
    0.05
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            latency_min_ms: default_latency_min_ms(),
            latency_max_ms: default_latency_max_ms(),
            failure_rate: default_failure_rate(),
            seed: None,
            short_query_policy: ShortQueryPolicy::default(),
            log_level: default_log_level(),
        }
    }
}

impl ExplorerConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(content.as_str())
    }

    /// Parse YAML; an empty document yields the defaults.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ExplorerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.failure_rate.is_finite() || !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(ConfigError::Validation(format!(
                "failure_rate must be within [0, 1], got {}",
                self.failure_rate
            )));
        }
        if self.latency_min_ms > self.latency_max_ms {
            return Err(ConfigError::Validation(format!(
                "latency_min_ms ({}) must not exceed latency_max_ms ({})",
                self.latency_min_ms, self.latency_max_ms
            )));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Validation("log_level cannot be empty".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn remote_behavior(&self) -> RemoteBehavior {
        RemoteBehavior::Random {
            latency_min: Duration::from_millis(self.latency_min_ms),
            latency_max: Duration::from_millis(self.latency_max_ms),
            failure_rate: self.failure_rate,
            seed: self.seed,
        }
    }
}
