//! Caller-facing results, rounded at the boundary.
//!
//! Prices carry 2 decimals, drift and ratios 4, moving-average slopes 6.
//! Estimators and diagnostics work at full precision; nothing upstream of
//! this module rounds.

use driftcast_core::{Suggestion, Symbol};
use serde::{Deserialize, Serialize};

use crate::backtest::BacktestResult;
use crate::diagnostics::DiagnosticsReport;
use crate::estimators::{DegradeReason, Estimate};
use crate::method::Method;

/// Label attached to diagnostics responses.
pub const DIAGNOSTICS_METHOD: &str = "twin_plus_v1";

pub const PRICE_ONLY_MESSAGE: &str =
    "No duration detected. Add a timeframe (e.g., 'in 3 days') to get a forecast.";

/// Rounds half away from zero to `places` decimals.
///
/// ```rust
/// use driftcast_forecast::round_to;
///
/// assert_eq!(round_to(187.4449, 2), 187.44);
/// assert_eq!(round_to(-0.123456, 4), -0.1235);
/// ```
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub fn round_price(value: f64) -> f64 {
    round_to(value, 2)
}

pub fn round_ratio(value: f64) -> f64 {
    round_to(value, 4)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub symbol: Symbol,
    pub horizon_days: usize,
    pub last_close: f64,
    pub forecast_price: f64,
    pub method: Method,
    pub drift_per_day: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<DegradeReason>,
}

impl ForecastReport {
    pub fn new(symbol: Symbol, horizon_days: usize, estimate: Estimate) -> Self {
        let (result, degraded) = match estimate {
            Estimate::Fitted(result) => (result, None),
            Estimate::Degraded { result, reason } => (result, Some(reason)),
        };
        Self {
            symbol,
            horizon_days,
            last_close: round_price(result.last_close),
            forecast_price: round_price(result.forecast_price),
            method: result.method,
            drift_per_day: round_ratio(result.drift_per_day),
            degraded,
        }
    }
}

/// Backtest error attached to a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub mae: f64,
    pub window_days: usize,
}

impl From<&BacktestResult> for BacktestSummary {
    fn from(result: &BacktestResult) -> Self {
        Self {
            mae: round_price(result.mean_absolute_error),
            window_days: result.lookback_window,
        }
    }
}

/// Standalone backtest response; `mae` is absent when history is too short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub symbol: Symbol,
    pub k: usize,
    pub method: Method,
    pub mae: Option<f64>,
    pub windows: usize,
    pub window_days: usize,
}

impl BacktestReport {
    pub fn new(
        symbol: Symbol,
        k: usize,
        method: Method,
        lookback: usize,
        result: Option<&BacktestResult>,
    ) -> Self {
        Self {
            symbol,
            k,
            method,
            mae: result.map(|result| round_price(result.mean_absolute_error)),
            windows: result.map_or(0, |result| result.windows),
            window_days: lookback,
        }
    }
}

impl DiagnosticsReport {
    /// Copy with every numeric field rounded for display.
    pub fn rounded(&self) -> Self {
        Self {
            momentum_12m: round_ratio(self.momentum_12m),
            dma50_slope: round_to(self.dma50_slope, 6),
            dma200_slope: round_to(self.dma200_slope, 6),
            donchian_hi: round_price(self.donchian_hi),
            donchian_lo: round_price(self.donchian_lo),
            annualized_vol_forecast: self.annualized_vol_forecast.map(round_ratio),
            position_size: self.position_size.map(round_price),
            ..self.clone()
        }
    }
}

/// Outcome of a combined resolve, fetch and forecast request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Prediction {
    Unresolved {
        suggestions: Vec<Suggestion>,
    },
    NoData {
        symbol: Symbol,
    },
    PriceOnly {
        symbol: Symbol,
        last_close: f64,
        message: String,
    },
    Forecast {
        symbol: Symbol,
        duration: String,
        horizon_days: usize,
        last_close: f64,
        result: f64,
        method: Method,
        drift_per_day: f64,
        backtest: Option<BacktestSummary>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        degraded: Option<DegradeReason>,
    },
}

impl Prediction {
    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Unresolved { .. } => None,
            Self::NoData { symbol }
            | Self::PriceOnly { symbol, .. }
            | Self::Forecast { symbol, .. } => Some(symbol),
        }
    }
}

/// Outcome of a combined resolve, fetch and diagnose request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DeepPrediction {
    Unresolved {
        suggestions: Vec<Suggestion>,
    },
    NoData {
        symbol: Symbol,
    },
    TwinPlus {
        symbol: Symbol,
        duration: Option<String>,
        method: String,
        diagnostics: DiagnosticsReport,
    },
}

impl DeepPrediction {
    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Unresolved { .. } => None,
            Self::NoData { symbol } | Self::TwinPlus { symbol, .. } => Some(symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimators::ForecastResult;

    fn symbol() -> Symbol {
        Symbol::parse("AAPL").expect("valid")
    }

    #[test]
    fn forecast_report_rounds_prices_and_drift() {
        let estimate = Estimate::Fitted(ForecastResult {
            last_close: 187.23456,
            forecast_price: 190.005001,
            method: Method::EmaDrift,
            drift_per_day: 0.71234567,
        });
        let report = ForecastReport::new(symbol(), 4, estimate);
        assert_eq!(report.last_close, 187.23);
        assert_eq!(report.forecast_price, 190.01);
        assert_eq!(report.drift_per_day, 0.7123);
        assert_eq!(report.degraded, None);
    }

    #[test]
    fn prediction_serializes_with_mode_tag() {
        let prediction = Prediction::PriceOnly {
            symbol: symbol(),
            last_close: 10.0,
            message: String::from(PRICE_ONLY_MESSAGE),
        };
        let value = serde_json::to_value(&prediction).expect("serializes");
        assert_eq!(value["mode"], "price_only");
        assert_eq!(value["symbol"], "AAPL");
    }

    #[test]
    fn missing_backtest_serializes_as_null() {
        let report = BacktestReport::new(symbol(), 3, Method::EmaDrift, 120, None);
        let value = serde_json::to_value(&report).expect("serializes");
        assert!(value["mae"].is_null());
        assert_eq!(value["window_days"], 120);
    }
}
