//! Rolling-window helpers over plain close slices.
//!
//! Windows follow the "drop incomplete" convention: a rolling statistic over
//! `n` points only exists once `n` values are available.

/// Day-over-day differences.
pub fn diffs(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

/// Simple returns `c[t] / c[t-1] - 1`.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|pair| pair[1] / pair[0] - 1.0).collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// The last `n` values (or all of them when shorter).
pub fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

/// Final value of an unadjusted exponentially weighted mean with
/// `alpha = 2 / (span + 1)`, seeded with the first value.
pub fn ewm_last(values: &[f64], span: usize) -> Option<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let (first, rest) = values.split_first()?;
    Some(
        rest.iter()
            .fold(*first, |level, value| alpha * value + (1.0 - alpha) * level),
    )
}

/// Complete `n`-point rolling means, oldest first.
pub fn sma(values: &[f64], n: usize) -> Vec<f64> {
    if n == 0 || values.len() < n {
        return Vec::new();
    }

    let mut sums = Vec::with_capacity(values.len() - n + 1);
    let mut running = values[..n].iter().sum::<f64>();
    sums.push(running / n as f64);
    for index in n..values.len() {
        running += values[index] - values[index - n];
        sums.push(running / n as f64);
    }
    sums
}

/// Mean change of the last five `n`-day SMA points; 0.0 with fewer points.
pub fn sma_slope(values: &[f64], n: usize) -> f64 {
    let averages = sma(values, n);
    if averages.len() < 5 {
        return 0.0;
    }
    mean(&diffs(tail(&averages, 5))).unwrap_or(0.0)
}

/// Ordinary least squares of `values` against `0..len`.
///
/// Returns `(slope, intercept)`; `None` with fewer than two points.
pub fn linear_fit(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = mean(values)?;

    let (mut covariance, mut variance) = (0.0, 0.0);
    for (index, value) in values.iter().enumerate() {
        let dx = index as f64 - x_mean;
        covariance += dx * (value - y_mean);
        variance += dx * dx;
    }

    let slope = covariance / variance;
    Some((slope, y_mean - slope * x_mean))
}
