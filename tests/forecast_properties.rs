//! Property-style tests for estimators, the ensemble and walk-forward
//! evaluation.

use std::sync::Mutex;

use driftcast_forecast::estimators::ema_drift;
use driftcast_forecast::{
    estimator_for, walk_forward, EmaDrift, Ensemble, Estimate, Estimator, ForecastError,
    ForecastResult, Method, WeightedMember,
};

fn trending_closes(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            100.0 + 0.15 * t + 3.0 * (t / 11.0).sin()
        })
        .collect()
}

struct Fixed(f64);

impl Estimator for Fixed {
    fn method(&self) -> Method {
        Method::BaselineDrift
    }

    fn estimate(&self, closes: &[f64], horizon: usize) -> Result<Estimate, ForecastError> {
        let last = closes.last().copied().ok_or(ForecastError::EmptySeries)?;
        Ok(Estimate::Fitted(ForecastResult::from_target(
            Method::BaselineDrift,
            last,
            self.0,
            horizon,
        )))
    }
}

struct Failing;

impl Estimator for Failing {
    fn method(&self) -> Method {
        Method::LightMl
    }

    fn estimate(&self, _closes: &[f64], _horizon: usize) -> Result<Estimate, ForecastError> {
        Err(ForecastError::Regression(String::from("singular system")))
    }
}

/// Records the longest history it was shown.
#[derive(Default)]
struct Spy {
    longest: Mutex<usize>,
    calls: Mutex<usize>,
}

impl Estimator for Spy {
    fn method(&self) -> Method {
        Method::EmaDrift
    }

    fn estimate(&self, closes: &[f64], horizon: usize) -> Result<Estimate, ForecastError> {
        let mut longest = self.longest.lock().expect("spy lock");
        *longest = (*longest).max(closes.len());
        *self.calls.lock().expect("spy lock") += 1;
        EmaDrift::default().estimate(closes, horizon)
    }
}

// =============================================================================
// Estimators
// =============================================================================

#[test]
fn when_history_is_short_every_method_degrades_to_ema_drift() {
    // Given: four closes, too few for anything but EMA and a straight line
    let closes = [100.0, 102.0, 101.0, 104.0];
    let expected = ForecastResult::from_drift(Method::EmaDrift, 104.0, ema_drift(&closes, 6), 3);

    for method in [
        Method::BaselineDrift,
        Method::MeanReversion,
        Method::Ensemble,
        Method::LightMl,
    ] {
        // When: the method is asked for a 3-day forecast
        let estimate = estimator_for(method)
            .estimate(&closes, 3)
            .expect("short input still forecasts");

        // Then: it reports degradation and matches EMA drift exactly
        assert!(estimate.is_degraded(), "{method} should degrade");
        assert_eq!(estimate.result(), &expected, "{method}");
    }
}

#[test]
fn when_only_one_close_exists_every_method_forecasts_flat() {
    for method in Method::ALL {
        let result = estimator_for(method)
            .estimate(&[42.0], 5)
            .expect("single close forecasts")
            .into_result();
        assert_eq!(result.last_close, 42.0, "{method}");
        assert_eq!(result.forecast_price, 42.0, "{method}");
        assert_eq!(result.drift_per_day, 0.0, "{method}");
    }
}

#[test]
fn when_input_is_empty_or_non_finite_every_method_errors() {
    for method in Method::ALL {
        let estimator = estimator_for(method);
        assert!(estimator.estimate(&[], 3).is_err(), "{method} on empty input");
        assert!(
            estimator.estimate(&[1.0, f64::NAN, 2.0], 3).is_err(),
            "{method} on NaN input"
        );
    }
}

#[test]
fn when_horizon_is_zero_forecast_is_last_close_for_drift_methods() {
    let closes = trending_closes(120);
    let last = closes[closes.len() - 1];
    for method in [Method::EmaDrift, Method::BaselineDrift, Method::MeanReversion] {
        let result = estimator_for(method)
            .estimate(&closes, 0)
            .expect("forecasts")
            .into_result();
        assert!((result.forecast_price - last).abs() < 1e-9, "{method}");
    }
}

// =============================================================================
// Ensemble
// =============================================================================

#[test]
fn when_a_member_fails_remaining_weights_are_renormalized() {
    // Given: two fixed members around a failing one
    let ensemble = Ensemble::new(vec![
        WeightedMember::new(0.4, Fixed(110.0)),
        WeightedMember::new(0.6, Failing),
        WeightedMember::new(0.2, Fixed(100.0)),
    ])
    .with_min_history(1);

    // When: the blend is computed
    let estimate = ensemble.estimate(&[100.0; 5], 2).expect("blend succeeds");

    // Then: only surviving weights count
    assert!(!estimate.is_degraded());
    let expected = (0.4 * 110.0 + 0.2 * 100.0) / 0.6;
    assert!((estimate.result().forecast_price - expected).abs() < 1e-9);
    assert_eq!(estimate.result().method, Method::Ensemble);
}

#[test]
fn when_every_member_fails_ensemble_falls_back_to_ema_drift() {
    let ensemble = Ensemble::new(vec![
        WeightedMember::new(0.5, Failing),
        WeightedMember::new(0.5, Failing),
    ])
    .with_min_history(1);
    let closes = [10.0, 11.0, 12.0, 13.0];

    let estimate = ensemble.estimate(&closes, 2).expect("fallback succeeds");

    assert!(estimate.is_degraded());
    assert_eq!(estimate.result().method, Method::EmaDrift);
}

#[test]
fn when_standard_ensemble_blends_result_lies_within_member_range() {
    // Given: enough history for every member to fit
    let closes = trending_closes(400);
    let members = [
        Method::LightMl,
        Method::LinearTrend,
        Method::MeanReversion,
        Method::EmaDrift,
    ]
    .map(|method| {
        estimator_for(method)
            .estimate(&closes, 5)
            .expect("member forecasts")
            .result()
            .forecast_price
    });

    // When: the standard blend is computed
    let blended = Ensemble::standard()
        .estimate(&closes, 5)
        .expect("blend succeeds")
        .result()
        .forecast_price;

    // Then: it is a convex combination of the member forecasts
    let low = members.iter().copied().fold(f64::INFINITY, f64::min);
    let high = members.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!(blended >= low - 1e-9 && blended <= high + 1e-9);
}

// =============================================================================
// Walk-forward backtest
// =============================================================================

#[test]
fn when_history_is_shorter_than_horizon_plus_warmup_backtest_is_absent() {
    for horizon in [1, 3, 5, 21] {
        let closes = trending_closes(horizon + 9);
        let result = walk_forward(&closes, horizon, &EmaDrift::default(), 120).expect("runs");
        assert!(result.is_none(), "horizon {horizon}");
    }
}

#[test]
fn when_one_window_fits_backtest_scores_it() {
    for horizon in [1, 3, 5, 21] {
        let closes = trending_closes(horizon + 11);
        let result = walk_forward(&closes, horizon, &EmaDrift::default(), 120)
            .expect("runs")
            .expect("one window");
        assert_eq!(result.windows, 1, "horizon {horizon}");
        assert!(result.mean_absolute_error >= 0.0);
    }
}

#[test]
fn when_backtesting_estimator_never_sees_the_scored_close() {
    // Given: a 50-close series and a spy estimator
    let closes = trending_closes(50);
    let spy = Spy::default();

    // When: a 3-day walk-forward runs
    let result = walk_forward(&closes, 3, &spy, 120)
        .expect("runs")
        .expect("enough history");

    // Then: the longest history shown stops before the last scored close
    let longest = *spy.longest.lock().expect("spy lock");
    let calls = *spy.calls.lock().expect("spy lock");
    assert_eq!(longest, 50 - 3 - 1);
    assert_eq!(calls, result.windows);
    assert_eq!(result.windows, 50 - 3 - 10);
}

#[test]
fn when_history_exceeds_lookback_only_recent_tail_is_replayed() {
    let closes = trending_closes(600);
    let result = walk_forward(&closes, 3, &EmaDrift::default(), 120)
        .expect("runs")
        .expect("enough history");
    assert_eq!(result.windows, 150 - 3 - 10);
    assert_eq!(result.lookback_window, 120);
}
