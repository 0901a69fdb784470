//! Price source trait and request/response types.
//!
//! This module defines the adapter contract (`PriceSource`) that every
//! market-data provider implements, along with the request and response
//! types for each endpoint.
//!
//! # Endpoints
//!
//! | Endpoint | Request | Response | Description |
//! |----------|---------|----------|-------------|
//! | Closes | [`ClosesRequest`] | [`PriceSeries`] | Daily closing prices |
//! | Search | [`SearchRequest`] | [`SearchBatch`] | Company-name lookup |
//!
//! # Example
//!
//! ```rust,ignore
//! use driftcast_core::{ClosesRequest, PriceSource, SourceError, Symbol, YahooAdapter};
//!
//! async fn last_close(adapter: &YahooAdapter) -> Result<Option<f64>, SourceError> {
//!     let request = ClosesRequest::new(Symbol::parse("AAPL")?, 365)?;
//!     let series = adapter.closes(request).await?;
//!     Ok(series.last_close())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{PriceSeries, ProviderId, SearchHit, Symbol, ValidationError};

/// Data endpoint type used in logs and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Closes,
    Search,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closes => "closes",
            Self::Search => "search",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(value: ValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

/// Request payload for the daily-closes endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosesRequest {
    pub symbol: Symbol,
    /// Calendar days of history ending now.
    pub lookback_days: u32,
}

impl ClosesRequest {
    pub fn new(symbol: Symbol, lookback_days: u32) -> Result<Self, SourceError> {
        if lookback_days == 0 {
            return Err(SourceError::invalid_request(
                "closes request lookback must be greater than zero",
            ));
        }
        Ok(Self {
            symbol,
            lookback_days,
        })
    }
}

/// Request payload for search endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, limit: usize) -> Result<Self, SourceError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(SourceError::invalid_request(
                "search query must not be empty",
            ));
        }
        if limit == 0 {
            return Err(SourceError::invalid_request(
                "search request limit must be greater than zero",
            ));
        }
        Ok(Self { query, limit })
    }
}

/// Search results in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchBatch {
    pub query: String,
    pub hits: Vec<SearchHit>,
}

/// Future type returned by [`PriceSource`] methods.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Market-data adapter contract.
///
/// Implementations must be `Send + Sync`; the engine shares one source
/// across concurrent requests.
pub trait PriceSource: Send + Sync {
    /// Returns the provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches ascending daily closes covering `lookback_days` calendar days.
    ///
    /// An unknown symbol yields an empty series, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider is unreachable or its
    /// payload cannot be decoded.
    fn closes<'a>(&'a self, req: ClosesRequest) -> SourceFuture<'a, PriceSeries>;

    /// Searches for instruments whose name or ticker matches a query.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider is unreachable or its
    /// payload cannot be decoded.
    fn search<'a>(&'a self, req: SearchRequest) -> SourceFuture<'a, SearchBatch>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closes_request_rejects_zero_lookback() {
        let symbol = Symbol::parse("AAPL").expect("valid symbol");
        let err = ClosesRequest::new(symbol, 0).expect_err("zero lookback must fail");
        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
    }

    #[test]
    fn search_request_rejects_blank_query() {
        let err = SearchRequest::new("   ", 5).expect_err("blank query must fail");
        assert_eq!(err.code(), "source.invalid_request");
    }

    #[test]
    fn unavailable_errors_render_message_and_code() {
        let err = SourceError::unavailable("upstream down");
        assert_eq!(err.kind(), SourceErrorKind::Unavailable);
        assert_eq!(err.to_string(), "upstream down (source.unavailable)");
    }
}
