//! Drift estimators.
//!
//! Every estimator maps `(closes, horizon_trading_days)` to an [`Estimate`].
//! Series too short for a method fall back to EMA drift and come back as
//! [`Estimate::Degraded`]; only empty or non-finite input is an error.

mod baseline;
mod ema;
mod linear;
mod mean_reversion;
mod regression;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ensemble::Ensemble;
use crate::error::ForecastError;
use crate::method::Method;

pub use baseline::{baseline_drift, BaselineDrift};
pub use ema::{ema_drift, EmaDrift, DEFAULT_EMA_SPAN};
pub use linear::{LinearTrend, DEFAULT_TREND_WINDOW};
pub use mean_reversion::{MeanReversion, DEFAULT_MA_WINDOW};
pub use regression::{RegressionEstimator, ALPHA_GRID, MIN_REGRESSION_HISTORY, MIN_TRAINING_ROWS};

/// Point forecast for one series and horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub last_close: f64,
    pub forecast_price: f64,
    pub method: Method,
    pub drift_per_day: f64,
}

impl ForecastResult {
    /// Linear extrapolation `last + drift * horizon`.
    pub fn from_drift(method: Method, last_close: f64, drift_per_day: f64, horizon: usize) -> Self {
        Self {
            last_close,
            forecast_price: last_close + drift_per_day * horizon as f64,
            method,
            drift_per_day,
        }
    }

    /// Derives the per-day drift from a target price.
    pub fn from_target(method: Method, last_close: f64, forecast_price: f64, horizon: usize) -> Self {
        Self {
            last_close,
            forecast_price,
            method,
            drift_per_day: (forecast_price - last_close) / horizon.max(1) as f64,
        }
    }
}

/// Why an estimator handed over to EMA drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DegradeReason {
    InsufficientHistory { required: usize, available: usize },
    TooFewTrainingRows { required: usize, available: usize },
    AllMembersFailed,
    Regression { message: String },
}

impl Display for DegradeReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientHistory {
                required,
                available,
            } => write!(f, "needs {required} closes, have {available}"),
            Self::TooFewTrainingRows {
                required,
                available,
            } => write!(f, "needs {required} training rows, have {available}"),
            Self::AllMembersFailed => f.write_str("every ensemble member failed"),
            Self::Regression { message } => write!(f, "regression failed: {message}"),
        }
    }
}

/// Estimator outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Estimate {
    Fitted(ForecastResult),
    Degraded {
        result: ForecastResult,
        reason: DegradeReason,
    },
}

impl Estimate {
    pub fn result(&self) -> &ForecastResult {
        match self {
            Self::Fitted(result) | Self::Degraded { result, .. } => result,
        }
    }

    pub fn into_result(self) -> ForecastResult {
        match self {
            Self::Fitted(result) | Self::Degraded { result, .. } => result,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&DegradeReason> {
        match self {
            Self::Fitted(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }
}

/// A forecasting method over a series of daily closes.
pub trait Estimator: Send + Sync {
    fn method(&self) -> Method;

    fn estimate(&self, closes: &[f64], horizon: usize) -> Result<Estimate, ForecastError>;
}

/// The estimator implementing `method` with default parameters.
pub fn estimator_for(method: Method) -> Box<dyn Estimator> {
    match method {
        Method::EmaDrift => Box::new(EmaDrift::default()),
        Method::LinearTrend => Box::new(LinearTrend::default()),
        Method::MeanReversion => Box::new(MeanReversion::default()),
        Method::BaselineDrift => Box::new(BaselineDrift),
        Method::Ensemble => Box::new(Ensemble::standard()),
        Method::LightMl => Box::new(RegressionEstimator::default()),
    }
}

/// Returns the last close, rejecting empty or non-finite input.
pub(crate) fn checked_last(method: Method, closes: &[f64]) -> Result<f64, ForecastError> {
    if let Some(index) = closes.iter().position(|close| !close.is_finite()) {
        return Err(ForecastError::NonFinite { method, index });
    }
    closes.last().copied().ok_or(ForecastError::EmptySeries)
}

/// EMA drift result tagged as a fallback.
pub(crate) fn degrade(
    method: Method,
    closes: &[f64],
    horizon: usize,
    reason: DegradeReason,
) -> Result<Estimate, ForecastError> {
    debug!(%method, ?reason, "falling back to ema_drift");
    let result = EmaDrift::default().fit(closes, horizon)?;
    Ok(Estimate::Degraded { result, reason })
}
