//! Scanner configuration.

use serde::{Deserialize, Serialize};
use spread_core::Venue;
use spread_feeds::{AggregatorConfig, DEFAULT_TIMEOUT};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Symbols scanned when none are given on the command line.
pub const DEFAULT_SYMBOLS: [&str; 3] = ["BTC/USDT", "ETH/USDT", "SOL/USDC"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Scanner configuration. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Exchanges to query, in reporting order.
    pub venues: Vec<Venue>,
    /// Swap aggregators, merged after the exchanges in this order.
    pub aggregators: Vec<AggregatorConfig>,
    pub default_symbols: Vec<String>,
    /// Minimum spread in percent (1.0 == 1%).
    pub threshold_pct: f64,
    /// Base-asset amount quoted on aggregators.
    pub trade_amount: f64,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            venues: Venue::all().to_vec(),
            aggregators: vec![AggregatorConfig::one_inch(), AggregatorConfig::jupiter()],
            default_symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            threshold_pct: 1.0,
            trade_amount: 1.0,
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            log_level: "warn".to_string(),
        }
    }
}

impl ScannerConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.venues.is_empty() {
            return Err(ConfigError::Invalid("venue list is empty".into()));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.venues.iter().find(|v| !seen.insert(**v)) {
            return Err(ConfigError::Invalid(format!("duplicate venue {dup}")));
        }

        let mut names = HashSet::new();
        if let Some(dup) = self
            .aggregators
            .iter()
            .find(|a| !names.insert(a.name.as_str()))
        {
            return Err(ConfigError::Invalid(format!(
                "duplicate aggregator {}",
                dup.name
            )));
        }

        if !(self.trade_amount.is_finite() && self.trade_amount > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "trade_amount must be positive, got {}",
                self.trade_amount
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be > 0".into()));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
