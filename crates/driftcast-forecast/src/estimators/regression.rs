//! Feature-based next-day return model ("light_ml").
//!
//! Features at day `t`:
//!
//! | Feature | Definition |
//! |---------|------------|
//! | `mom_5`, `mom_10`, `mom_20` | `c[t] / c[t-k] - 1` |
//! | `sma50_slope`, `sma200_slope` | mean change of the last 5 SMA points, relative to `c[t]` |
//! | `vol_22` | `sqrt(252 * mean(r²))` over the last 22 simple returns |
//!
//! The target is the next day's return, so the most recent day only ever
//! serves as the prediction row.

use ndarray::{Array1, Array2};
use tracing::{debug, warn};

use crate::error::ForecastError;
use crate::estimators::{checked_last, degrade, DegradeReason, Estimate, Estimator, ForecastResult};
use crate::indicators::sma;
use crate::method::Method;
use crate::ridge::{RidgeError, RidgeRegression, Standardizer};

pub const MIN_REGRESSION_HISTORY: usize = 250;
pub const MIN_TRAINING_ROWS: usize = 50;
pub const ALPHA_GRID: [f64; 5] = [0.1, 0.3, 1.0, 3.0, 10.0];

const FEATURE_COUNT: usize = 6;
const MOMENTUM_LAGS: [usize; 3] = [5, 10, 20];
const SLOPE_POINTS: usize = 5;
const VOL_WINDOW: usize = 22;
const FIRST_FEATURE_DAY: usize = 200 + SLOPE_POINTS - 2;
const MIN_VALIDATION_ROWS: usize = 10;
const VALIDATION_SHARE: f64 = 0.2;
const DEFAULT_ALPHA: f64 = 1.0;

/// Ridge regression on momentum, trend and volatility features, with the
/// penalty picked from [`ALPHA_GRID`] on a trailing validation split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegressionEstimator;

impl Estimator for RegressionEstimator {
    fn method(&self) -> Method {
        Method::LightMl
    }

    fn estimate(&self, closes: &[f64], horizon: usize) -> Result<Estimate, ForecastError> {
        let last = checked_last(Method::LightMl, closes)?;
        if closes.len() < MIN_REGRESSION_HISTORY {
            return degrade(
                Method::LightMl,
                closes,
                horizon,
                DegradeReason::InsufficientHistory {
                    required: MIN_REGRESSION_HISTORY,
                    available: closes.len(),
                },
            );
        }

        let frame = FeatureFrame::build(closes);
        if frame.rows.len() < MIN_TRAINING_ROWS {
            return degrade(
                Method::LightMl,
                closes,
                horizon,
                DegradeReason::TooFewTrainingRows {
                    required: MIN_TRAINING_ROWS,
                    available: frame.rows.len(),
                },
            );
        }
        let Some(latest) = frame.latest else {
            return degrade(
                Method::LightMl,
                closes,
                horizon,
                DegradeReason::Regression {
                    message: String::from("latest feature row is not finite"),
                },
            );
        };

        let predicted = match fit_and_predict(&frame.rows, &frame.targets, &latest) {
            Ok(value) if value.is_finite() => value,
            Ok(value) => {
                return degrade(
                    Method::LightMl,
                    closes,
                    horizon,
                    DegradeReason::Regression {
                        message: format!("non-finite predicted return {value}"),
                    },
                )
            }
            Err(error) => {
                warn!(%error, "ridge fit failed");
                return degrade(
                    Method::LightMl,
                    closes,
                    horizon,
                    DegradeReason::Regression {
                        message: error.to_string(),
                    },
                );
            }
        };

        let steps = horizon as f64;
        let damp = 1.0 / (1.0 + 0.1 * (steps - 1.0).max(0.0));
        let forecast = last * (1.0 + predicted * damp * steps);
        Ok(Estimate::Fitted(ForecastResult::from_target(
            Method::LightMl,
            last,
            forecast,
            horizon,
        )))
    }
}

struct FeatureFrame {
    rows: Vec<[f64; FEATURE_COUNT]>,
    targets: Vec<f64>,
    latest: Option<[f64; FEATURE_COUNT]>,
}

impl FeatureFrame {
    fn build(closes: &[f64]) -> Self {
        let sma50 = sma(closes, 50);
        let sma200 = sma(closes, 200);
        let returns = std::iter::once(f64::NAN)
            .chain(closes.windows(2).map(|pair| pair[1] / pair[0] - 1.0))
            .collect::<Vec<_>>();

        let features = |t: usize| -> Option<[f64; FEATURE_COUNT]> {
            let close = closes[t];
            let [m5, m10, m20] = MOMENTUM_LAGS.map(|lag| close / closes[t - lag] - 1.0);
            let slope = |averages: &[f64], window: usize| {
                let end = t + 1 - window;
                (averages[end] - averages[end + 1 - SLOPE_POINTS]) / (SLOPE_POINTS - 1) as f64 / close
            };
            let squares = returns[t + 1 - VOL_WINDOW..=t]
                .iter()
                .map(|value| value * value)
                .sum::<f64>();
            let vol = (252.0 * squares / VOL_WINDOW as f64).sqrt();

            let row = [m5, m10, m20, slope(&sma50, 50), slope(&sma200, 200), vol];
            row.iter().all(|value| value.is_finite()).then_some(row)
        };

        let last_day = closes.len() - 1;
        let mut rows = Vec::new();
        let mut targets = Vec::new();
        for t in FIRST_FEATURE_DAY..last_day {
            let target = closes[t + 1] / closes[t] - 1.0;
            if let Some(row) = features(t).filter(|_| target.is_finite()) {
                rows.push(row);
                targets.push(target);
            }
        }

        let latest = (last_day >= FIRST_FEATURE_DAY)
            .then(|| features(last_day))
            .flatten();
        Self {
            rows,
            targets,
            latest,
        }
    }
}

fn fit_and_predict(
    rows: &[[f64; FEATURE_COUNT]],
    targets: &[f64],
    latest: &[f64; FEATURE_COUNT],
) -> Result<f64, RidgeError> {
    let alpha = select_alpha(rows, targets)?;
    let (model, scaler) = fit(rows, targets, alpha)?;
    let query = scaler.transform(&matrix(std::slice::from_ref(latest))?)?;
    let predicted = model.predict(&query)?;
    predicted.get(0).copied().ok_or(RidgeError::Empty)
}

/// Lowest validation MAE over the grid; ties keep the smaller alpha.
fn select_alpha(rows: &[[f64; FEATURE_COUNT]], targets: &[f64]) -> Result<f64, RidgeError> {
    let validation = (rows.len() as f64 * VALIDATION_SHARE).round() as usize;
    if validation < MIN_VALIDATION_ROWS {
        return Ok(DEFAULT_ALPHA);
    }
    let split = rows.len() - validation;

    let actual = Array1::from(targets[split..].to_vec());
    let mut best = (DEFAULT_ALPHA, f64::INFINITY);
    for alpha in ALPHA_GRID {
        let (model, scaler) = fit(&rows[..split], &targets[..split], alpha)?;
        let predicted = model.predict(&scaler.transform(&matrix(&rows[split..])?)?)?;
        let mae = (&predicted - &actual).mapv(f64::abs).mean().unwrap_or(f64::INFINITY);
        if mae < best.1 {
            best = (alpha, mae);
        }
    }

    debug!(alpha = best.0, mae = best.1, "selected ridge penalty");
    Ok(best.0)
}

fn fit(
    rows: &[[f64; FEATURE_COUNT]],
    targets: &[f64],
    alpha: f64,
) -> Result<(RidgeRegression, Standardizer), RidgeError> {
    let x = matrix(rows)?;
    let scaler = Standardizer::fit(&x)?;
    let mut model = RidgeRegression::new(alpha);
    model.fit(&scaler.transform(&x)?, &Array1::from(targets.to_vec()))?;
    Ok((model, scaler))
}

fn matrix(rows: &[[f64; FEATURE_COUNT]]) -> Result<Array2<f64>, RidgeError> {
    let flat = rows.iter().flatten().copied().collect::<Vec<_>>();
    Array2::from_shape_vec((rows.len(), FEATURE_COUNT), flat).map_err(|_| RidgeError::DimensionMismatch {
        expected: FEATURE_COUNT,
        got: rows.first().map_or(0, |row| row.len()),
    })
}
