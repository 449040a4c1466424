//! Configuration for the in-process queue benchmark.

use segqueue::{DEFAULT_SEGMENT_CAPACITY, QueueError, SegmentedQueue};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    pub workload: WorkloadConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// General benchmark settings.
#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    /// How long to run the measurement phase.
    #[serde(deserialize_with = "deserialize_duration")]
    pub duration: Duration,
    /// How long to warm up before recording metrics.
    #[serde(deserialize_with = "deserialize_duration")]
    pub warmup: Duration,
}

/// Queue construction settings.
#[derive(Debug, Deserialize)]
pub struct QueueConfig {
    /// Slots per segment. Must be a power of two.
    #[serde(default = "QueueConfig::default_segment_capacity")]
    pub segment_capacity: usize,
    /// Items pushed before the workload starts.
    #[serde(default)]
    pub prefill: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            segment_capacity: Self::default_segment_capacity(),
            prefill: 0,
        }
    }
}

impl QueueConfig {
    fn default_segment_capacity() -> usize {
        DEFAULT_SEGMENT_CAPACITY
    }

    /// Build an empty queue from these settings.
    pub fn build<T>(&self) -> Result<SegmentedQueue<T>, QueueError> {
        SegmentedQueue::<T>::builder()
            .segment_capacity(self.segment_capacity)
            .build()
    }
}

/// Operation mix (percentages, must sum to 100).
#[derive(Debug, Deserialize)]
pub struct WorkloadConfig {
    pub push: u8,
    pub unshift: u8,
    pub shift: u8,
    /// Operations per loop iteration.
    #[serde(default = "WorkloadConfig::default_batch")]
    pub batch: usize,
    /// RNG seed for the operation mix.
    #[serde(default = "WorkloadConfig::default_seed")]
    pub seed: u64,
}

impl WorkloadConfig {
    fn default_batch() -> usize {
        1
    }

    fn default_seed() -> u64 {
        42
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Log format: "pretty", "json", or "compact".
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            format: Self::default_format(),
        }
    }
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }

    fn default_format() -> String {
        "pretty".to_string()
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid queue config: {0}")]
    Queue(#[from] QueueError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mix = &self.workload;
        let total = mix.push as u16 + mix.unshift as u16 + mix.shift as u16;
        if total != 100 {
            return Err(ConfigError::Invalid(format!(
                "operation mix must sum to 100 (got {}): push={} unshift={} shift={}",
                total, mix.push, mix.unshift, mix.shift,
            )));
        }

        if mix.batch == 0 {
            return Err(ConfigError::Invalid("batch must be at least 1".to_string()));
        }

        self.queue.build::<()>()?;

        Ok(())
    }
}

/// Deserialize a duration from a human-readable string (e.g., "60s", "5m").
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

/// Sample configuration printed by `--print-config`.
pub const DEFAULT_CONFIG: &str = r#"# segqueue-bench configuration

[general]
# Measurement duration
duration = "10s"
# Warmup before recording metrics
warmup = "2s"

[queue]
# Slots per segment (power of two)
segment_capacity = 2048
# Items pushed before the workload starts
prefill = 10000

[workload]
# Operation mix in percent (must sum to 100)
push = 45
unshift = 5
shift = 50
# Operations per loop iteration
batch = 16
seed = 42

[logging]
level = "info"
format = "pretty"
"#;
