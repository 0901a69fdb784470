//! Trend and volatility diagnostics.

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::indicators::{mean, pct_change, sma_slope, tail};

pub const TARGET_VOL: f64 = 0.20;
pub const DONCHIAN_WINDOW: usize = 50;
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const MOMENTUM_LOOKBACK: usize = 252;
const HAR_WEEK: usize = 5;
const HAR_MONTH: usize = 22;
const HAR_WEIGHTS: [f64; 3] = [0.3, 0.3, 0.4];

const LONGS_ALLOWED: &str = "Uptrend intact: longs allowed.";
const LONGS_BLOCKED: &str = "Trend filters not aligned: reduce risk / avoid new longs.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub momentum_12m: f64,
    pub dma50_slope: f64,
    pub dma200_slope: f64,
    pub donchian_breakout: bool,
    pub donchian_hi: f64,
    pub donchian_lo: f64,
    pub annualized_vol_forecast: Option<f64>,
    pub target_vol: f64,
    pub position_size: Option<f64>,
    pub allow_long: bool,
    pub decision: String,
    pub summary: Vec<String>,
}

/// Computes every diagnostic over `closes` (oldest first).
pub fn diagnose(closes: &[f64]) -> Result<DiagnosticsReport, ForecastError> {
    let last = *closes.last().ok_or(ForecastError::EmptySeries)?;

    let momentum = momentum_12m(closes);
    let slope_50 = sma_slope(closes, 50);
    let slope_200 = sma_slope(closes, 200);
    let (breakout, hi, lo) = donchian(closes, DONCHIAN_WINDOW, last);
    let vol = har_rv_forecast(closes);
    let position = position_size(vol, TARGET_VOL);
    let allow_long = momentum > 0.0 && slope_50 > 0.0 && slope_200 >= 0.0;

    let mut summary = vec![
        format!("12-month momentum: {:+.2}%", momentum * 100.0),
        format!("Slope of 50-DMA: {slope_50:+.4} | 200-DMA: {slope_200:+.4}"),
        format!(
            "Donchian-50 breakout: {} (range {lo:.2} - {hi:.2})",
            if breakout { "YES" } else { "no" }
        ),
    ];
    match vol {
        Some(vol) if vol > 0.0 => {
            summary.push(format!("Forecast annualized vol (HAR-RV): {:.1}%", vol * 100.0));
            if let Some(position) = position {
                summary.push(format!(
                    "Position size for {:.0}% vol target: {:.0}%",
                    TARGET_VOL * 100.0,
                    position * 100.0
                ));
            }
        }
        _ => summary.push(String::from("Not enough data to estimate volatility reliably.")),
    }

    Ok(DiagnosticsReport {
        momentum_12m: momentum,
        dma50_slope: slope_50,
        dma200_slope: slope_200,
        donchian_breakout: breakout,
        donchian_hi: hi,
        donchian_lo: lo,
        annualized_vol_forecast: vol,
        target_vol: TARGET_VOL,
        position_size: position,
        allow_long,
        decision: String::from(if allow_long { LONGS_ALLOWED } else { LONGS_BLOCKED }),
        summary,
    })
}

/// Return over up to 252 sessions.
pub fn momentum_12m(closes: &[f64]) -> f64 {
    let n = closes.len();
    let Some(last) = closes.last() else {
        return 0.0;
    };
    let look = if n > 1 { MOMENTUM_LOOKBACK.min(n - 1) } else { 1 };
    closes
        .get(n.saturating_sub(look))
        .map_or(0.0, |base| last / base - 1.0)
}

/// `(last >= high, high, low)` over the last `min(window, n)` closes.
pub fn donchian(closes: &[f64], window: usize, last: f64) -> (bool, f64, f64) {
    let recent = tail(closes, window);
    let hi = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lo = recent.iter().copied().fold(f64::INFINITY, f64::min);
    (last >= hi, hi, lo)
}

/// HAR-RV one-step volatility forecast, annualized.
///
/// Blends the latest squared return with its 5- and 22-day means; `None`
/// with fewer than 22 returns.
pub fn har_rv_forecast(closes: &[f64]) -> Option<f64> {
    let rv = pct_change(closes)
        .into_iter()
        .map(|value| value * value)
        .collect::<Vec<_>>();
    if rv.len() < HAR_MONTH {
        return None;
    }

    let daily = *rv.last()?;
    let weekly = mean(tail(&rv, HAR_WEEK))?;
    let monthly = mean(tail(&rv, HAR_MONTH))?;
    let [bd, bw, bm] = HAR_WEIGHTS;
    let next = bd * daily + bw * weekly + bm * monthly;
    Some((TRADING_DAYS_PER_YEAR * next).sqrt())
}

/// Exposure scaling `vol` to `target`, capped at 100%.
pub fn position_size(vol: Option<f64>, target: f64) -> Option<f64> {
    vol.filter(|vol| *vol > 0.0).map(|vol| (target / vol).min(1.0))
}
