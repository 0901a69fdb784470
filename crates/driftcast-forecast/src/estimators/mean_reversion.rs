use crate::error::ForecastError;
use crate::estimators::{checked_last, degrade, DegradeReason, Estimate, Estimator, ForecastResult};
use crate::indicators::{mean, tail};
use crate::method::Method;

pub const DEFAULT_MA_WINDOW: usize = 20;
const MIN_CLOSES: usize = 5;

/// Pulls the last close toward its `ma_window` moving average, fully once
/// the horizon reaches the window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeanReversion {
    pub ma_window: usize,
}

impl Default for MeanReversion {
    fn default() -> Self {
        Self {
            ma_window: DEFAULT_MA_WINDOW,
        }
    }
}

impl Estimator for MeanReversion {
    fn method(&self) -> Method {
        Method::MeanReversion
    }

    fn estimate(&self, closes: &[f64], horizon: usize) -> Result<Estimate, ForecastError> {
        let last = checked_last(Method::MeanReversion, closes)?;
        if closes.len() < MIN_CLOSES {
            return degrade(
                Method::MeanReversion,
                closes,
                horizon,
                DegradeReason::InsufficientHistory {
                    required: MIN_CLOSES,
                    available: closes.len(),
                },
            );
        }

        let window = self.ma_window.max(1);
        let target = mean(tail(closes, window)).unwrap_or(last);
        let strength = (horizon as f64 / window as f64).min(1.0);
        let forecast = last + (target - last) * strength;

        Ok(Estimate::Fitted(ForecastResult::from_target(
            Method::MeanReversion,
            last,
            forecast,
            horizon,
        )))
    }
}
