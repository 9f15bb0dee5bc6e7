use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Timing of the simulated push channel.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    /// Lower bound of the uniform inter-arrival delay.
    pub arrival_min: Duration,
    /// Upper bound of the uniform inter-arrival delay (inclusive).
    pub arrival_max: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            arrival_min: Duration::from_millis(1500),
            arrival_max: Duration::from_millis(4000),
        }
    }
}

/// Behaviour of the simulated read-status transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub latency: Duration,
    /// Probability in [0, 1] that a call is rejected.
    pub failure_rate: f64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(700),
            failure_rate: 0.2,
        }
    }
}

/// Configuration for the notification center and its demo binary.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterConfig {
    pub source: SourceConfig,
    pub transport: TransportConfig,
    /// Day groups per page.
    pub page_size: usize,
    /// How long the demo binary runs before tearing down.
    pub run_for: Duration,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            transport: TransportConfig::default(),
            page_size: 5,
            run_for: Duration::from_secs(30),
        }
    }
}

impl CenterConfig {
    /// Load configuration from environment variables (and `.env` if present).
    /// Every variable is optional; unset ones fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Used by `from_env` and tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let arrival_min_ms = parse_or(&lookup, "INBOX_ARRIVAL_MIN_MS", millis(defaults.source.arrival_min))?;
        let arrival_max_ms = parse_or(&lookup, "INBOX_ARRIVAL_MAX_MS", millis(defaults.source.arrival_max))?;
        let latency_ms = parse_or(&lookup, "INBOX_TRANSPORT_LATENCY_MS", millis(defaults.transport.latency))?;
        let failure_rate = parse_or(&lookup, "INBOX_FAILURE_RATE", defaults.transport.failure_rate)?;
        let page_size = parse_or(&lookup, "INBOX_PAGE_SIZE", defaults.page_size)?;
        let run_secs = parse_or(&lookup, "INBOX_RUN_SECS", defaults.run_for.as_secs())?;

        let config = Self {
            source: SourceConfig {
                arrival_min: Duration::from_millis(arrival_min_ms),
                arrival_max: Duration::from_millis(arrival_max_ms),
            },
            transport: TransportConfig {
                latency: Duration::from_millis(latency_ms),
                failure_rate,
            },
            page_size,
            run_for: Duration::from_secs(run_secs),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.arrival_min > self.source.arrival_max {
            return Err(ConfigError::EmptyArrivalInterval {
                min_ms: millis(self.source.arrival_min),
                max_ms: millis(self.source.arrival_max),
            });
        }
        if !(0.0..=1.0).contains(&self.transport.failure_rate) {
            return Err(ConfigError::FailureRateOutOfRange(self.transport.failure_rate));
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }

    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  arrival interval: {}ms..={}ms",
            millis(self.source.arrival_min),
            millis(self.source.arrival_max)
        );
        tracing::info!("  transport latency: {}ms", millis(self.transport.latency));
        tracing::info!("  transport failure rate: {}", self.transport.failure_rate);
        tracing::info!("  page size: {}", self.page_size);
        tracing::info!("  run for: {}s", self.run_for.as_secs());
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        _ => Ok(default),
    }
}
