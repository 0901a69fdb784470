//! Walk-forward evaluation of an estimator.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ForecastError;
use crate::estimators::Estimator;
use crate::indicators::tail;

pub const DEFAULT_LOOKBACK: usize = 120;

/// Closes kept beyond the lookback so early windows have history.
const TAIL_PADDING: usize = 30;
/// Minimum history before the first prediction.
const WARMUP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub mean_absolute_error: f64,
    pub horizon_days: usize,
    pub lookback_window: usize,
    pub windows: usize,
}

/// Mean absolute error of `estimator` replayed over recent history.
///
/// Each window predicts from `tail[..i]` only and is scored against the
/// close `horizon` days later. Returns `None` when the tail is too short to
/// form a single window.
pub fn walk_forward(
    closes: &[f64],
    horizon: usize,
    estimator: &dyn Estimator,
    lookback: usize,
) -> Result<Option<BacktestResult>, ForecastError> {
    let recent = tail(closes, lookback + TAIL_PADDING);
    if recent.len() < horizon + WARMUP {
        debug!(
            available = recent.len(),
            required = horizon + WARMUP,
            "not enough history to backtest"
        );
        return Ok(None);
    }

    let mut total_error = 0.0;
    let mut windows = 0usize;
    for i in WARMUP..recent.len().saturating_sub(horizon) {
        let predicted = estimator
            .estimate(&recent[..i], horizon)?
            .result()
            .forecast_price;
        let actual = recent[i + horizon - 1];
        total_error += (predicted - actual).abs();
        windows += 1;
    }

    if windows == 0 {
        return Ok(None);
    }

    Ok(Some(BacktestResult {
        mean_absolute_error: total_error / windows as f64,
        horizon_days: horizon,
        lookback_window: lookback,
        windows,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimators::{BaselineDrift, EmaDrift};

    #[test]
    fn too_short_tail_returns_none() {
        let closes = vec![10.0; 12];
        assert_eq!(walk_forward(&closes, 3, &EmaDrift::default(), 120), Ok(None));
    }

    #[test]
    fn exact_minimum_has_no_windows() {
        let closes = vec![10.0; 13];
        assert_eq!(walk_forward(&closes, 3, &EmaDrift::default(), 120), Ok(None));
    }

    #[test]
    fn exact_drift_has_zero_error() {
        let closes = (0..200).map(|i| i as f64).collect::<Vec<_>>();
        let result = walk_forward(&closes, 3, &BaselineDrift, 120)
            .expect("runs")
            .expect("enough history");
        assert_eq!(result.windows, 150 - 3 - WARMUP);
        assert!(result.mean_absolute_error.abs() < 1e-9);
        assert_eq!(result.lookback_window, 120);
    }

    #[test]
    fn constant_error_per_window() {
        // EMA drift on a flat history predicts flat, the series then jumps by 2
        let mut closes = vec![50.0; 60];
        closes.extend(std::iter::repeat(52.0).take(5));
        let result = walk_forward(&closes, 1, &EmaDrift::default(), 20)
            .expect("runs")
            .expect("enough history");
        assert!(result.mean_absolute_error > 0.0);
        assert_eq!(result.horizon_days, 1);
    }

    #[test]
    fn zero_horizon_scores_last_close() {
        let closes = (0..40).map(|i| (i as f64).sin() + 5.0).collect::<Vec<_>>();
        let result = walk_forward(&closes, 0, &EmaDrift::default(), 120)
            .expect("runs")
            .expect("enough history");
        assert!(result.mean_absolute_error.abs() < 1e-12);
    }
}
