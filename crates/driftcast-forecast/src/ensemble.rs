//! Fixed-weight blend of drift estimators.

use tracing::{debug, warn};

use crate::error::ForecastError;
use crate::estimators::{
    checked_last, degrade, DegradeReason, EmaDrift, Estimate, Estimator, ForecastResult,
    LinearTrend, MeanReversion, RegressionEstimator,
};
use crate::method::Method;

pub const REGRESSION_WEIGHT: f64 = 0.40;
pub const LINEAR_TREND_WEIGHT: f64 = 0.25;
pub const MEAN_REVERSION_WEIGHT: f64 = 0.20;
pub const EMA_WEIGHT: f64 = 0.15;

/// Series shorter than this skip blending entirely.
pub const MIN_ENSEMBLE_HISTORY: usize = 60;

pub struct WeightedMember {
    pub weight: f64,
    pub estimator: Box<dyn Estimator>,
}

impl WeightedMember {
    pub fn new(weight: f64, estimator: impl Estimator + 'static) -> Self {
        Self {
            weight,
            estimator: Box::new(estimator),
        }
    }
}

/// Weighted average of member forecasts.
///
/// Members that fail or return a non-finite price are dropped and the
/// remaining weights renormalized. When nothing survives the result is plain
/// EMA drift, reported as degraded.
pub struct Ensemble {
    members: Vec<WeightedMember>,
    min_history: usize,
}

impl Ensemble {
    pub fn new(members: Vec<WeightedMember>) -> Self {
        Self {
            members,
            min_history: MIN_ENSEMBLE_HISTORY,
        }
    }

    /// Regression 0.40, linear trend 0.25, mean reversion 0.20, EMA 0.15.
    pub fn standard() -> Self {
        Self::new(vec![
            WeightedMember::new(REGRESSION_WEIGHT, RegressionEstimator),
            WeightedMember::new(LINEAR_TREND_WEIGHT, LinearTrend::default()),
            WeightedMember::new(MEAN_REVERSION_WEIGHT, MeanReversion::default()),
            WeightedMember::new(EMA_WEIGHT, EmaDrift::default()),
        ])
    }

    pub fn with_min_history(mut self, min_history: usize) -> Self {
        self.min_history = min_history;
        self
    }

    pub fn members(&self) -> &[WeightedMember] {
        &self.members
    }
}

impl Estimator for Ensemble {
    fn method(&self) -> Method {
        Method::Ensemble
    }

    fn estimate(&self, closes: &[f64], horizon: usize) -> Result<Estimate, ForecastError> {
        let last = checked_last(Method::Ensemble, closes)?;
        if closes.len() < self.min_history {
            return degrade(
                Method::Ensemble,
                closes,
                horizon,
                DegradeReason::InsufficientHistory {
                    required: self.min_history,
                    available: closes.len(),
                },
            );
        }

        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        for member in &self.members {
            let method = member.estimator.method();
            match member.estimator.estimate(closes, horizon) {
                Ok(estimate) if estimate.result().forecast_price.is_finite() => {
                    if let Some(reason) = estimate.reason() {
                        debug!(%method, ?reason, "ensemble member degraded");
                    }
                    weighted_sum += member.weight * estimate.result().forecast_price;
                    total_weight += member.weight;
                }
                Ok(_) => warn!(%method, "ensemble member produced a non-finite forecast"),
                Err(error) => warn!(%method, %error, "ensemble member failed"),
            }
        }

        if total_weight <= 0.0 {
            return degrade(Method::Ensemble, closes, horizon, DegradeReason::AllMembersFailed);
        }

        Ok(Estimate::Fitted(ForecastResult::from_target(
            Method::Ensemble,
            last,
            weighted_sum / total_weight,
            horizon,
        )))
    }
}
