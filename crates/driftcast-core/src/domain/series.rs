use time::{Date, Weekday};

use crate::{Symbol, ValidationError};

/// One daily close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: Date,
    pub close: f64,
}

impl PricePoint {
    pub const fn new(date: Date, close: f64) -> Self {
        Self { date, close }
    }
}

/// Ascending series of daily closes for one symbol.
///
/// Dates are strictly increasing and every close is finite. Calendar gaps
/// (weekends, holidays) are kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: Symbol,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, dropping non-finite closes.
    ///
    /// Fails when the remaining dates are not strictly increasing.
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        let points = points
            .into_iter()
            .filter(|point| point.close.is_finite())
            .collect::<Vec<_>>();

        for (index, pair) in points.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(ValidationError::UnorderedSeries { index: index + 1 });
            }
        }

        Ok(Self { symbol, points })
    }

    pub fn empty(symbol: Symbol) -> Self {
        Self {
            symbol,
            points: Vec::new(),
        }
    }

    /// Lays `closes` out on consecutive weekdays starting at `start`.
    pub fn from_closes(symbol: Symbol, start: Date, closes: &[f64]) -> Result<Self, ValidationError> {
        let mut date = start;
        let mut points = Vec::with_capacity(closes.len());
        for &close in closes {
            while matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday) {
                date = next_day(date);
            }
            points.push(PricePoint::new(date, close));
            date = next_day(date);
        }
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|point| point.close)
    }

    pub fn last_date(&self) -> Option<Date> {
        self.points.last().map(|point| point.date)
    }

    /// The most recent `n` points (or all of them when shorter).
    pub fn tail(&self, n: usize) -> Self {
        let start = self.points.len().saturating_sub(n);
        Self {
            symbol: self.symbol.clone(),
            points: self.points[start..].to_vec(),
        }
    }
}

fn next_day(date: Date) -> Date {
    date.next_day().unwrap_or(date)
}
