use crate::error::ForecastError;
use crate::estimators::{checked_last, degrade, DegradeReason, Estimate, Estimator, ForecastResult};
use crate::indicators::{linear_fit, tail};
use crate::method::Method;

pub const DEFAULT_TREND_WINDOW: usize = 60;

/// Least-squares line through the most recent `window` closes, extended
/// `horizon` steps past the last fitted point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearTrend {
    pub window: usize,
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self {
            window: DEFAULT_TREND_WINDOW,
        }
    }
}

impl Estimator for LinearTrend {
    fn method(&self) -> Method {
        Method::LinearTrend
    }

    fn estimate(&self, closes: &[f64], horizon: usize) -> Result<Estimate, ForecastError> {
        let last = checked_last(Method::LinearTrend, closes)?;
        let recent = tail(closes, self.window.max(2));

        let Some((slope, intercept)) = linear_fit(recent) else {
            return degrade(
                Method::LinearTrend,
                closes,
                horizon,
                DegradeReason::InsufficientHistory {
                    required: 2,
                    available: closes.len(),
                },
            );
        };

        let at = (recent.len() - 1 + horizon) as f64;
        Ok(Estimate::Fitted(ForecastResult {
            last_close: last,
            forecast_price: intercept + slope * at,
            method: Method::LinearTrend,
            drift_per_day: slope,
        }))
    }
}
