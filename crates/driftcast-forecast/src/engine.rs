use std::sync::Arc;
use std::time::Instant;

use driftcast_core::{
    parse_duration, ClosesRequest, EngineConfig, Horizon, PriceSeries, PriceSource, ProviderId,
    Resolution, Symbol, TickerResolver,
};
use tracing::{debug, info};

use crate::backtest::{walk_forward, BacktestResult};
use crate::diagnostics::{diagnose, DiagnosticsReport};
use crate::error::EngineError;
use crate::estimators::estimator_for;
use crate::method::Method;
use crate::report::{
    BacktestReport, BacktestSummary, DeepPrediction, ForecastReport, Prediction,
    round_price, DIAGNOSTICS_METHOD, PRICE_ONLY_MESSAGE,
};

/// Minimum window fetched for [`Engine::history`].
const HISTORY_FLOOR_DAYS: u32 = 120;
/// Extra calendar days fetched so the requested tail survives holidays.
const HISTORY_PADDING_DAYS: u32 = 30;

/// Request-scoped forecasting façade over a [`PriceSource`].
///
/// Holds no mutable state; every call fetches what it needs.
#[derive(Clone)]
pub struct Engine {
    source: Arc<dyn PriceSource>,
    resolver: TickerResolver,
    config: EngineConfig,
}

impl Engine {
    pub fn new(source: Arc<dyn PriceSource>, config: EngineConfig) -> Self {
        Self {
            resolver: TickerResolver::new(Arc::clone(&source), config.clone()),
            source,
            config,
        }
    }

    pub fn source_id(&self) -> ProviderId {
        self.source.id()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn resolve(&self, query: &str) -> Resolution {
        self.resolver.resolve(query).await
    }

    pub fn parse_duration(&self, query: &str) -> Option<Horizon> {
        parse_duration(query)
    }

    /// Closes for `symbol`; fetch failures and empty series both map to
    /// [`EngineError::DataUnavailable`].
    pub async fn closes(&self, symbol: &Symbol, lookback_days: u32) -> Result<PriceSeries, EngineError> {
        let request = ClosesRequest::new(symbol.clone(), lookback_days.max(1))
            .map_err(|_| EngineError::DataUnavailable {
                symbol: symbol.clone(),
            })?;

        let started = Instant::now();
        let series = match self.source.closes(request).await {
            Ok(series) => series,
            Err(error) => {
                debug!(%symbol, %error, "closes fetch failed");
                return Err(EngineError::DataUnavailable {
                    symbol: symbol.clone(),
                });
            }
        };
        debug!(
            %symbol,
            points = series.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched closes"
        );

        if series.is_empty() {
            return Err(EngineError::DataUnavailable {
                symbol: symbol.clone(),
            });
        }
        Ok(series)
    }

    pub async fn forecast(
        &self,
        symbol: &Symbol,
        horizon_days: usize,
        method: Method,
    ) -> Result<ForecastReport, EngineError> {
        let series = self.closes(symbol, self.config.history_days).await?;
        Self::forecast_series(&series, horizon_days, method)
    }

    pub fn forecast_series(
        series: &PriceSeries,
        horizon_days: usize,
        method: Method,
    ) -> Result<ForecastReport, EngineError> {
        let estimate = estimator_for(method).estimate(&series.closes(), horizon_days)?;
        Ok(ForecastReport::new(series.symbol().clone(), horizon_days, estimate))
    }

    /// Walk-forward backtest of `method` at horizon `k` over the configured
    /// history and lookback.
    pub async fn backtest(
        &self,
        symbol: &Symbol,
        k: usize,
        method: Method,
    ) -> Result<BacktestReport, EngineError> {
        let series = self.closes(symbol, self.config.history_days).await?;
        let result = self.backtest_series(&series, k, method)?;
        Ok(BacktestReport::new(
            symbol.clone(),
            k,
            method,
            self.config.backtest_lookback,
            result.as_ref(),
        ))
    }

    pub fn backtest_series(
        &self,
        series: &PriceSeries,
        k: usize,
        method: Method,
    ) -> Result<Option<BacktestResult>, EngineError> {
        let estimator = estimator_for(method);
        walk_forward(
            &series.closes(),
            k,
            estimator.as_ref(),
            self.config.backtest_lookback,
        )
        .map_err(EngineError::from)
    }

    pub async fn diagnostics(&self, symbol: &Symbol) -> Result<DiagnosticsReport, EngineError> {
        let series = self.closes(symbol, self.config.diagnostics_history_days).await?;
        Self::diagnostics_series(&series)
    }

    /// Rounded diagnostics over an already fetched series.
    pub fn diagnostics_series(series: &PriceSeries) -> Result<DiagnosticsReport, EngineError> {
        Ok(diagnose(&series.closes())?.rounded())
    }

    /// The last `days` closes for `symbol`.
    pub async fn history(&self, symbol: &Symbol, days: u32) -> Result<Vec<f64>, EngineError> {
        let lookback = days
            .saturating_add(HISTORY_PADDING_DAYS)
            .max(HISTORY_FLOOR_DAYS);
        let series = self.closes(symbol, lookback).await?;
        Ok(series.tail(days as usize).closes())
    }

    /// Resolve, fetch, then forecast when the input names a horizon.
    pub async fn predict(&self, input: &str, method: Method) -> Result<Prediction, EngineError> {
        let symbol = match self.resolve(input).await {
            Resolution::Resolved { symbol, .. } => symbol,
            Resolution::Unresolved { suggestions } => {
                info!(input, suggestions = suggestions.len(), "input did not resolve");
                return Ok(Prediction::Unresolved { suggestions });
            }
        };

        let series = match self.closes(&symbol, self.config.history_days).await {
            Ok(series) => series,
            Err(EngineError::DataUnavailable { symbol }) => return Ok(Prediction::NoData { symbol }),
            Err(error) => return Err(error),
        };
        let closes = series.closes();
        let last_close = series.last_close().unwrap_or_default();

        let Some(horizon) = parse_duration(input) else {
            return Ok(Prediction::PriceOnly {
                symbol,
                last_close: round_price(last_close),
                message: String::from(PRICE_ONLY_MESSAGE),
            });
        };

        let horizon_days = horizon.trading_days();
        let estimator = estimator_for(method);
        let report = ForecastReport::new(
            symbol.clone(),
            horizon_days,
            estimator.estimate(&closes, horizon_days)?,
        );
        let backtest = walk_forward(
            &closes,
            horizon_days,
            estimator.as_ref(),
            self.config.backtest_lookback,
        )?;

        info!(
            %symbol,
            %horizon,
            method = %report.method,
            backtested = backtest.is_some(),
            "forecast ready"
        );
        Ok(Prediction::Forecast {
            symbol,
            duration: horizon.to_string(),
            horizon_days,
            last_close: report.last_close,
            result: report.forecast_price,
            method: report.method,
            drift_per_day: report.drift_per_day,
            backtest: backtest.as_ref().map(BacktestSummary::from),
            degraded: report.degraded,
        })
    }

    /// Resolve, fetch, then run diagnostics.
    pub async fn predict_plus(&self, input: &str) -> Result<DeepPrediction, EngineError> {
        let symbol = match self.resolve(input).await {
            Resolution::Resolved { symbol, .. } => symbol,
            Resolution::Unresolved { suggestions } => {
                return Ok(DeepPrediction::Unresolved { suggestions });
            }
        };

        let series = match self.closes(&symbol, self.config.diagnostics_history_days).await {
            Ok(series) => series,
            Err(EngineError::DataUnavailable { symbol }) => {
                return Ok(DeepPrediction::NoData { symbol })
            }
            Err(error) => return Err(error),
        };

        let diagnostics = Self::diagnostics_series(&series)?;
        info!(%symbol, allow_long = diagnostics.allow_long, "diagnostics ready");
        Ok(DeepPrediction::TwinPlus {
            symbol,
            duration: parse_duration(input).map(|horizon| horizon.to_string()),
            method: String::from(DIAGNOSTICS_METHOD),
            diagnostics,
        })
    }
}
