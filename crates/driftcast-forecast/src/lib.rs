//! # Driftcast Forecast
//!
//! Short-horizon drift forecasting on daily closes.
//!
//! ## Overview
//!
//! - **Estimators**: EMA drift, baseline drift, linear trend, mean
//!   reversion and a ridge-regression return model
//! - **Ensemble**: fixed-weight blend that drops failing members
//! - **Backtest**: leakage-free walk-forward mean absolute error
//! - **Diagnostics**: momentum, moving-average slopes, Donchian breakout,
//!   HAR-RV volatility and position sizing
//! - **Engine**: resolve, fetch and forecast in one call
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use driftcast_core::{EngineConfig, FixtureSource};
//! use driftcast_forecast::{Engine, Method, Prediction};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Engine::new(Arc::new(FixtureSource::demo()), EngineConfig::default());
//!     if let Prediction::Forecast { symbol, result, .. } =
//!         engine.predict("apple in 4 days", Method::EmaDrift).await?
//!     {
//!         println!("{symbol}: {result}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod backtest;
pub mod diagnostics;
pub mod engine;
pub mod ensemble;
pub mod error;
pub mod estimators;
pub mod indicators;
pub mod method;
pub mod report;
pub mod ridge;

pub use backtest::{walk_forward, BacktestResult, DEFAULT_LOOKBACK};
pub use diagnostics::{diagnose, DiagnosticsReport, TARGET_VOL};
pub use engine::Engine;
pub use ensemble::{Ensemble, WeightedMember};
pub use error::{EngineError, ForecastError};
pub use estimators::{
    estimator_for, BaselineDrift, DegradeReason, EmaDrift, Estimate, Estimator, ForecastResult,
    LinearTrend, MeanReversion, RegressionEstimator,
};
pub use method::{Method, UnknownMethod};
pub use report::{
    round_to, BacktestReport, BacktestSummary, DeepPrediction, ForecastReport, Prediction,
};
