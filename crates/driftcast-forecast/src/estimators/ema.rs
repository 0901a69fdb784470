use crate::error::ForecastError;
use crate::estimators::{checked_last, Estimate, Estimator, ForecastResult};
use crate::indicators::{diffs, ewm_last};
use crate::method::Method;

pub const DEFAULT_EMA_SPAN: usize = 6;

/// Final EWM (unadjusted) of day-over-day changes; 0.0 without changes.
pub fn ema_drift(closes: &[f64], span: usize) -> f64 {
    ewm_last(&diffs(closes), span).unwrap_or(0.0)
}

/// Exponentially weighted drift. Works on any non-empty series and serves
/// as the fallback for every other estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmaDrift {
    pub span: usize,
}

impl Default for EmaDrift {
    fn default() -> Self {
        Self {
            span: DEFAULT_EMA_SPAN,
        }
    }
}

impl EmaDrift {
    pub(crate) fn fit(&self, closes: &[f64], horizon: usize) -> Result<ForecastResult, ForecastError> {
        let last = checked_last(Method::EmaDrift, closes)?;
        Ok(ForecastResult::from_drift(
            Method::EmaDrift,
            last,
            ema_drift(closes, self.span),
            horizon,
        ))
    }
}

impl Estimator for EmaDrift {
    fn method(&self) -> Method {
        Method::EmaDrift
    }

    fn estimate(&self, closes: &[f64], horizon: usize) -> Result<Estimate, ForecastError> {
        self.fit(closes, horizon).map(Estimate::Fitted)
    }
}
