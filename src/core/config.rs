//! Configuration for the synthetic series generator.
//!
//! Supports YAML files, CLI overrides via [`ConfigBuilder`], and validation
//! with sensible defaults matching common avalanche-style benchmark setups.

use crate::core::{Result, TelebenchError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Generator configuration.
///
/// Every numeric field must be at least 1 and both churn intervals at least
/// one second; [`GeneratorConfig::validate`] enforces this before any series
/// is generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Prefix for every generated metric name.
    pub prefix: String,
    /// Number of gauges to register.
    pub metric_count: usize,
    /// Number of generated labels per metric.
    pub label_count: usize,
    /// Number of series per metric.
    pub series_count: usize,
    /// Padding length of the metric name token.
    pub metric_name_length: usize,
    /// Padding length of generated label names and values.
    pub label_name_length: usize,
    /// How often the series cycle counter advances.
    #[serde(with = "humantime_serde")]
    pub series_interval: Duration,
    /// How often the metric cycle counter advances.
    #[serde(with = "humantime_serde")]
    pub metric_interval: Duration,
    /// Constant labels in `name=value` form, appended to every series.
    pub const_labels: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            prefix: "telebench".to_string(),
            metric_count: 500,
            label_count: 10,
            series_count: 10,
            metric_name_length: 5,
            label_name_length: 5,
            series_interval: Duration::from_secs(60),
            metric_interval: Duration::from_secs(120),
            const_labels: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Create new config with defaults
    pub fn new() -> Result<Self> {
        let config = GeneratorConfig::default();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(TelebenchError::config("prefix must not be empty"));
        }

        for (name, value) in [
            ("metric_count", self.metric_count),
            ("label_count", self.label_count),
            ("series_count", self.series_count),
            ("metric_name_length", self.metric_name_length),
            ("label_name_length", self.label_name_length),
        ] {
            if value == 0 {
                return Err(TelebenchError::config(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }

        for (name, interval) in [
            ("series_interval", self.series_interval),
            ("metric_interval", self.metric_interval),
        ] {
            if interval < Duration::from_secs(1) {
                return Err(TelebenchError::config(format!(
                    "{} must be at least 1 second, got {:?}",
                    name, interval
                )));
            }
        }

        Ok(())
    }

    /// Total series cardinality produced per collection pass.
    pub fn cardinality(&self) -> usize {
        self.metric_count * self.series_count
    }
}

/// Configuration builder for programmatic construction
#[derive(Debug)]
pub struct ConfigBuilder {
    config: GeneratorConfig,
}

impl ConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        ConfigBuilder {
            config: GeneratorConfig::default(),
        }
    }

    /// Load configuration from YAML string
    pub fn from_yaml(mut self, yaml: &str) -> Result<Self> {
        self.config = serde_yaml::from_str(yaml)
            .map_err(|e| TelebenchError::config(format!("Failed to parse YAML config: {}", e)))?;
        Ok(self)
    }

    /// Set the metric name prefix
    pub fn prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    /// Set the number of metrics
    pub fn metric_count(mut self, count: usize) -> Self {
        self.config.metric_count = count;
        self
    }

    /// Set the number of generated labels per metric
    pub fn label_count(mut self, count: usize) -> Self {
        self.config.label_count = count;
        self
    }

    /// Set the number of series per metric
    pub fn series_count(mut self, count: usize) -> Self {
        self.config.series_count = count;
        self
    }

    /// Set the metric name padding length
    pub fn metric_name_length(mut self, length: usize) -> Self {
        self.config.metric_name_length = length;
        self
    }

    /// Set the label name padding length
    pub fn label_name_length(mut self, length: usize) -> Self {
        self.config.label_name_length = length;
        self
    }

    /// Set the series cycle interval
    pub fn series_interval(mut self, interval: Duration) -> Self {
        self.config.series_interval = interval;
        self
    }

    /// Set the metric cycle interval
    pub fn metric_interval(mut self, interval: Duration) -> Self {
        self.config.metric_interval = interval;
        self
    }

    /// Append a constant `name=value` label
    pub fn const_label<S: Into<String>>(mut self, label: S) -> Self {
        self.config.const_labels.push(label.into());
        self
    }

    /// Replace the full constant label list
    pub fn const_labels(mut self, labels: Vec<String>) -> Self {
        self.config.const_labels = labels;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<GeneratorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
