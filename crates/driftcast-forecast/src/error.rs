use driftcast_core::{Symbol, ValidationError};
use thiserror::Error;

use crate::method::Method;

/// Input errors raised by estimators and the backtester.
///
/// Short series are not errors; they produce a degraded estimate instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("price series is empty")]
    EmptySeries,
    #[error("{method} received a non-finite close at index {index}")]
    NonFinite { method: Method, index: usize },
    #[error("regression failed: {0}")]
    Regression(String),
}

/// Errors surfaced by [`crate::Engine`] operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no price data for {symbol}")]
    DataUnavailable { symbol: Symbol },

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::DataUnavailable { .. } => "engine.data_unavailable",
            Self::Forecast(_) => "engine.forecast",
            Self::Validation(_) => "engine.validation",
        }
    }
}
