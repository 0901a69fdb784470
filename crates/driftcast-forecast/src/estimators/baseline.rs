use crate::error::ForecastError;
use crate::estimators::{checked_last, degrade, DegradeReason, Estimate, Estimator, ForecastResult};
use crate::indicators::{diffs, mean, tail};
use crate::method::Method;

const BASELINE_POINTS: usize = 6;

/// Mean change over the last six closes; 0.0 with fewer.
pub fn baseline_drift(closes: &[f64]) -> f64 {
    if closes.len() < BASELINE_POINTS {
        return 0.0;
    }
    mean(&diffs(tail(closes, BASELINE_POINTS))).unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaselineDrift;

impl Estimator for BaselineDrift {
    fn method(&self) -> Method {
        Method::BaselineDrift
    }

    fn estimate(&self, closes: &[f64], horizon: usize) -> Result<Estimate, ForecastError> {
        let last = checked_last(Method::BaselineDrift, closes)?;
        if closes.len() < BASELINE_POINTS {
            return degrade(
                Method::BaselineDrift,
                closes,
                horizon,
                DegradeReason::InsufficientHistory {
                    required: BASELINE_POINTS,
                    available: closes.len(),
                },
            );
        }

        Ok(Estimate::Fitted(ForecastResult::from_drift(
            Method::BaselineDrift,
            last,
            baseline_drift(closes),
            horizon,
        )))
    }
}
