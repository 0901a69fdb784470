//! # Driftcast Core
//!
//! Core contracts and domain types for the driftcast forecasting toolkit.
//!
//! ## Overview
//!
//! This crate provides everything upstream of the forecasting math:
//!
//! - **Domain models** for symbols, price series and horizons
//! - **Price source trait** with Yahoo and in-memory fixture adapters
//! - **Text parsing** of horizons and company names from free text
//! - **Ticker resolution** with ranked suggestions
//! - **Response envelope** with metadata and structured errors
//! - **Engine configuration** with environment overrides
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Price source adapters (Yahoo, fixture) |
//! | [`config`] | Engine configuration |
//! | [`data_source`] | Price source trait and request/response types |
//! | [`domain`] | Domain models |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`resolver`] | Free text to ticker resolution |
//! | [`source`] | Provider identifiers |
//! | [`text`] | Horizon and company-query parsing |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use driftcast_core::{EngineConfig, FixtureSource, Resolution, TickerResolver};
//!
//! #[tokio::main]
//! async fn main() {
//!     let resolver = TickerResolver::new(Arc::new(FixtureSource::demo()), EngineConfig::default());
//!     if let Resolution::Resolved { symbol, .. } = resolver.resolve("apple in 3 days").await {
//!         println!("resolved {symbol}");
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Free text      │
//! └────────┬────────┘
//!          │
//!     ┌────┴─────────────────┐
//!     ▼                      ▼
//! ┌──────────────┐   ┌─────────────────┐
//! │ Duration     │   │ Ticker Resolver │
//! │ Parser       │   └────────┬────────┘
//! └──────────────┘            │
//!                             ▼
//!                    ┌─────────────────┐     ┌──────────────────┐
//!                    │ PriceSource     │────▶│ HTTP Client      │
//!                    │ (Adapter Trait) │     │ (reqwest)        │
//!                    └─────────────────┘     └──────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod resolver;
pub mod source;
pub mod text;

pub use adapters::{FixtureSource, YahooAdapter};
pub use config::{EngineConfig, ResolutionStrategy};
pub use data_source::{
    ClosesRequest, Endpoint, PriceSource, SearchBatch, SearchRequest, SourceError,
    SourceErrorKind, SourceFuture,
};
pub use domain::{
    horizon_to_trading_days, AssetClass, Horizon, PricePoint, PriceSeries, SearchHit, Symbol,
    TimeUnit, UtcDateTime,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::ValidationError;
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use resolver::{
    echo_with_duration, Resolution, ResolvedVia, Suggestion, TickerResolver,
};
pub use source::ProviderId;
pub use text::{
    extract_company_query, parse_duration, parse_duration_match, strip_duration_phrases,
    DurationMatch, MatchKind,
};
