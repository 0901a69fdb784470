use std::collections::BTreeMap;

use time::{Date, Weekday};

use crate::data_source::{
    ClosesRequest, PriceSource, SearchBatch, SearchRequest, SourceError, SourceFuture,
};
use crate::{AssetClass, PriceSeries, ProviderId, SearchHit, Symbol, UtcDateTime};

/// Closes generated per demo symbol; covers more than two years of sessions.
const DEMO_LENGTH: usize = 600;

/// In-memory price source for offline runs and tests.
///
/// Stored closes are laid out on the weekdays that end today, so a request
/// for `lookback_days` returns the trailing closes that fit in that window.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    series: BTreeMap<Symbol, Vec<f64>>,
    catalog: Vec<SearchHit>,
    unavailable: bool,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic synthetic data for a handful of large US listings.
    pub fn demo() -> Self {
        let mut source = Self::new();
        for (symbol, name, exchange) in demo_catalog() {
            let Ok(parsed) = Symbol::parse(symbol) else {
                continue;
            };
            let closes = synthetic_closes(&parsed, DEMO_LENGTH);
            source = source.with_series(parsed.clone(), closes).with_hit(
                SearchHit::new(parsed, name)
                    .with_exchange(exchange)
                    .with_region("US")
                    .with_asset_class(AssetClass::Equity),
            );
        }
        source
    }

    /// Source whose every call fails as a transport error would.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_series(mut self, symbol: Symbol, closes: Vec<f64>) -> Self {
        self.series.insert(symbol, closes);
        self
    }

    pub fn with_hit(mut self, hit: SearchHit) -> Self {
        self.catalog.push(hit);
        self
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.series.keys()
    }

    fn closes_for(&self, req: &ClosesRequest) -> Result<PriceSeries, SourceError> {
        if self.unavailable {
            return Err(SourceError::unavailable("fixture source is offline"));
        }

        let Some(closes) = self.series.get(&req.symbol) else {
            return Ok(PriceSeries::empty(req.symbol.clone()));
        };

        let today = UtcDateTime::now().date();
        let start = UtcDateTime::now().days_before(req.lookback_days).date();
        let sessions = weekdays_between(start, today);
        let skip = closes.len().saturating_sub(sessions);
        let window = &closes[skip..];
        let first = nth_weekday_before(today, window.len());

        PriceSeries::from_closes(req.symbol.clone(), first, window)
            .map_err(|e| SourceError::internal(format!("invalid fixture series: {e}")))
    }

    fn search_for(&self, req: &SearchRequest) -> Result<SearchBatch, SourceError> {
        if self.unavailable {
            return Err(SourceError::unavailable("fixture source is offline"));
        }

        let tokens = req
            .query
            .split(|ch: char| !ch.is_ascii_alphanumeric())
            .filter(|token| token.len() >= 2)
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>();

        let hits = self
            .catalog
            .iter()
            .filter(|hit| {
                let name = hit.name.to_ascii_lowercase();
                let symbol = hit.symbol.as_str().to_ascii_lowercase();
                tokens
                    .iter()
                    .any(|token| name.contains(token.as_str()) || symbol == *token)
            })
            .take(req.limit)
            .cloned()
            .collect();

        Ok(SearchBatch {
            query: req.query.clone(),
            hits,
        })
    }
}

impl PriceSource for FixtureSource {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn closes<'a>(&'a self, req: ClosesRequest) -> SourceFuture<'a, PriceSeries> {
        Box::pin(async move { self.closes_for(&req) })
    }

    fn search<'a>(&'a self, req: SearchRequest) -> SourceFuture<'a, SearchBatch> {
        Box::pin(async move { self.search_for(&req) })
    }
}

fn demo_catalog() -> [(&'static str, &'static str, &'static str); 10] {
    [
        ("AAPL", "Apple Inc.", "NMS"),
        ("APLE", "Apple Hospitality REIT, Inc.", "NYQ"),
        ("MSFT", "Microsoft Corporation", "NMS"),
        ("GOOGL", "Alphabet Inc.", "NMS"),
        ("AMZN", "Amazon.com, Inc.", "NMS"),
        ("TSLA", "Tesla, Inc.", "NMS"),
        ("NVDA", "NVIDIA Corporation", "NMS"),
        ("META", "Meta Platforms, Inc.", "NMS"),
        ("AMD", "Advanced Micro Devices, Inc.", "NMS"),
        ("F", "Ford Motor Company", "NYQ"),
    ]
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

/// Smooth trend with two overlaid cycles; strictly positive.
fn synthetic_closes(symbol: &Symbol, len: usize) -> Vec<f64> {
    let seed = symbol_seed(symbol);
    let base = 40.0 + (seed % 300) as f64;
    let drift = ((seed % 7) as f64 - 2.0) * 0.000_6;
    let phase = (seed % 13) as f64 / 2.0;

    (0..len)
        .map(|index| {
            let t = index as f64;
            let trend = base * (1.0 + drift).powf(t);
            let cycle = 1.0 + 0.03 * (t / 9.0 + phase).sin() + 0.015 * (t / 3.7 + phase * 2.0).sin();
            trend * cycle
        })
        .collect()
}

fn is_weekday(date: Date) -> bool {
    !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

fn weekdays_between(start: Date, end: Date) -> usize {
    let mut count = 0;
    let mut date = start;
    while date <= end {
        if is_weekday(date) {
            count += 1;
        }
        match date.next_day() {
            Some(next) => date = next,
            None => break,
        }
    }
    count
}

/// Date of the first of `sessions` consecutive weekdays ending at or before `end`.
fn nth_weekday_before(end: Date, sessions: usize) -> Date {
    let mut date = end;
    let mut remaining = sessions;
    loop {
        if is_weekday(date) {
            remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                return date;
            }
        }
        match date.previous_day() {
            Some(previous) => date = previous,
            None => return date,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn symbol(value: &str) -> Symbol {
        Symbol::parse(value).expect("valid symbol")
    }

    #[test]
    fn counts_weekdays_inclusive() {
        // Mon 2024-01-01 through Sun 2024-01-14.
        assert_eq!(weekdays_between(date!(2024 - 01 - 01), date!(2024 - 01 - 14)), 10);
        assert_eq!(weekdays_between(date!(2024 - 01 - 06), date!(2024 - 01 - 07)), 0);
    }

    #[test]
    fn nth_weekday_skips_weekends() {
        // Three sessions ending Monday 2024-01-08 start on Thursday 2024-01-04.
        assert_eq!(nth_weekday_before(date!(2024 - 01 - 08), 3), date!(2024 - 01 - 04));
    }

    #[test]
    fn synthetic_closes_are_deterministic_and_positive() {
        let first = synthetic_closes(&symbol("AAPL"), 300);
        let second = synthetic_closes(&symbol("AAPL"), 300);
        assert_eq!(first, second);
        assert!(first.iter().all(|close| *close > 0.0));
        assert_ne!(first, synthetic_closes(&symbol("MSFT"), 300));
    }

    #[test]
    fn demo_catalog_symbols_all_have_series() {
        let source = FixtureSource::demo();
        assert_eq!(source.symbols().count(), demo_catalog().len());
        assert_eq!(source.catalog.len(), demo_catalog().len());
    }
}
