//! Engine configuration.
//!
//! Every knob has a default, may be overridden from `DRIFTCAST_*`
//! environment variables, and is finally overridden by CLI flags.
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `DRIFTCAST_TIMEOUT_MS` | [`EngineConfig::timeout_ms`] | 5000 |
//! | `DRIFTCAST_HISTORY_DAYS` | [`EngineConfig::history_days`] | 365 |
//! | `DRIFTCAST_STRATEGY` | [`EngineConfig::strategy`] | `search` |
//! | `DRIFTCAST_SIMILARITY_THRESHOLD` | [`EngineConfig::similarity_threshold`] | 82.0 |
//! | `DRIFTCAST_BACKTEST_LOOKBACK` | [`EngineConfig::backtest_lookback`] | 120 |

use std::env;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::ValidationError;

pub const ENV_TIMEOUT_MS: &str = "DRIFTCAST_TIMEOUT_MS";
pub const ENV_HISTORY_DAYS: &str = "DRIFTCAST_HISTORY_DAYS";
pub const ENV_STRATEGY: &str = "DRIFTCAST_STRATEGY";
pub const ENV_SIMILARITY_THRESHOLD: &str = "DRIFTCAST_SIMILARITY_THRESHOLD";
pub const ENV_BACKTEST_LOOKBACK: &str = "DRIFTCAST_BACKTEST_LOOKBACK";

/// Default minimum token-sort similarity (0-100) for catalog matches.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 82.0;

/// How a company name is turned into a ticker once no explicit symbol is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStrategy {
    /// Ranked provider search.
    #[default]
    Search,
    /// Fuzzy match against the built-in company catalog.
    Catalog,
}

impl ResolutionStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Catalog => "catalog",
        }
    }
}

impl Display for ResolutionStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolutionStrategy {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "search" => Ok(Self::Search),
            "catalog" | "fuzzy" => Ok(Self::Catalog),
            other => Err(ValidationError::InvalidStrategy {
                value: other.to_owned(),
            }),
        }
    }
}

/// Tunables shared by the resolver and the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub timeout_ms: u64,
    /// Calendar days pulled for forecasts and backtests.
    pub history_days: u32,
    /// Calendar days pulled for diagnostics (needs a 200-day SMA).
    pub diagnostics_history_days: u32,
    /// Calendar days pulled to confirm a ticker has data.
    pub validation_days: u32,
    pub backtest_lookback: usize,
    pub similarity_threshold: f64,
    pub suggestion_limit: usize,
    pub strategy: ResolutionStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            history_days: 365,
            diagnostics_history_days: 400,
            validation_days: 14,
            backtest_lookback: 120,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            suggestion_limit: 3,
            strategy: ResolutionStrategy::Search,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any `DRIFTCAST_*` variables present.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::default().apply_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = parse_positive(ENV_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_HISTORY_DAYS) {
            self.history_days = parse_positive(ENV_HISTORY_DAYS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_STRATEGY) {
            self.strategy = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_SIMILARITY_THRESHOLD) {
            self = self.with_similarity_threshold(parse_threshold(&raw)?);
        }
        if let Some(raw) = lookup(ENV_BACKTEST_LOOKBACK) {
            self.backtest_lookback = parse_positive(ENV_BACKTEST_LOOKBACK, &raw)?;
        }
        Ok(self)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_strategy(mut self, strategy: ResolutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_history_days(mut self, history_days: u32) -> Self {
        self.history_days = history_days;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 100.0);
        self
    }
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T, ValidationError>
where
    T: FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ValidationError::InvalidConfig {
            key,
            value: raw.to_owned(),
        }),
    }
}

fn parse_threshold(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if (0.0..=100.0).contains(&value) => Ok(value),
        _ => Err(ValidationError::InvalidConfig {
            key: ENV_SIMILARITY_THRESHOLD,
            value: raw.to_owned(),
        }),
    }
}
