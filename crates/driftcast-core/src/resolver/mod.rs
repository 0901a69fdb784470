//! Free text to ticker resolution.
//!
//! Resolution runs in two stages:
//!
//! 1. **Explicit symbols**: uppercase tokens such as `AAPL` or `$TSLA`, in
//!    input order. The first one that validates wins.
//! 2. **Company name**: the duration-free query is resolved through the
//!    configured [`ResolutionStrategy`] (provider search or the built-in
//!    catalog). The single winner must validate; there is no second pick.
//!
//! A symbol *validates* when a short pull of recent closes is non-empty.
//! When nothing resolves, [`Resolution::Unresolved`] carries at most three
//! suggestions and is never empty.

mod catalog;
mod explicit;
mod search;
mod similarity;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EngineConfig, ResolutionStrategy};
use crate::data_source::{ClosesRequest, PriceSource, SearchRequest};
use crate::text::{company_query, parse_duration, strip_corporate_suffixes};
use crate::{SearchHit, Symbol};

pub use catalog::{best_catalog_match, rank_catalog, CatalogEntry, CatalogMatch, COMPANY_CATALOG};
pub use explicit::{explicit_candidates, typed_single_letters, ExplicitCandidate};
pub use search::{pick_winner, rank_hits, suggestion_hits, HitRank};
pub use similarity::{indel_ratio, token_sort_ratio};

/// Results requested from the provider per company search.
const SEARCH_LIMIT: usize = 20;

/// Suggestions offered when nothing else is available.
const FALLBACK_SUGGESTIONS: [(&str, &str); 3] = [
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc."),
];

/// Which stage produced a resolved symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedVia {
    Explicit,
    Search,
    Catalog,
}

/// "Did you mean" entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub symbol: Symbol,
    pub name: String,
    /// Display name with the user's duration re-attached, e.g. "Apple in 2 days".
    pub echo: String,
}

/// Outcome of resolving free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Resolved { symbol: Symbol, via: ResolvedVia },
    Unresolved { suggestions: Vec<Suggestion> },
}

impl Resolution {
    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Resolved { symbol, .. } => Some(symbol),
            Self::Unresolved { .. } => None,
        }
    }
}

/// Resolves free text against a [`PriceSource`].
#[derive(Clone)]
pub struct TickerResolver {
    source: Arc<dyn PriceSource>,
    config: EngineConfig,
}

impl TickerResolver {
    pub fn new(source: Arc<dyn PriceSource>, config: EngineConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolves `text`, producing suggestions when no symbol validates.
    pub async fn resolve(&self, text: &str) -> Resolution {
        match self.resolve_symbol(text).await {
            Some((symbol, via)) => {
                debug!(%symbol, ?via, "resolved ticker");
                Resolution::Resolved { symbol, via }
            }
            None => Resolution::Unresolved {
                suggestions: self.suggestions(text).await,
            },
        }
    }

    /// Resolution without the suggestion step.
    pub async fn resolve_symbol(&self, text: &str) -> Option<(Symbol, ResolvedVia)> {
        if text.trim().is_empty() {
            return None;
        }

        for candidate in explicit_candidates(text) {
            if candidate.is_acceptable() && self.validate(&candidate.symbol).await {
                return Some((candidate.symbol, ResolvedVia::Explicit));
            }
        }

        let query = company_query(text);
        if query.is_empty() {
            return None;
        }

        let (winner, via) = match self.config.strategy {
            ResolutionStrategy::Search => {
                let ranked = rank_hits(&query, self.search_with_suffix_retry(&query).await);
                let winner = pick_winner(&ranked, &typed_single_letters(text));
                (winner, ResolvedVia::Search)
            }
            ResolutionStrategy::Catalog => {
                let winner = best_catalog_match(&query, self.config.similarity_threshold)
                    .and_then(|found| Symbol::parse(found.entry.ticker).ok());
                (winner, ResolvedVia::Catalog)
            }
        };

        let winner = winner?;
        if self.validate(&winner).await {
            Some((winner, via))
        } else {
            debug!(symbol = %winner, %query, "name match did not validate");
            None
        }
    }

    /// True when a short pull of recent closes returns data.
    ///
    /// Fetch errors count as invalid and are not propagated.
    pub async fn validate(&self, symbol: &Symbol) -> bool {
        let request = match ClosesRequest::new(symbol.clone(), self.config.validation_days) {
            Ok(request) => request,
            Err(error) => {
                debug!(%symbol, %error, "invalid validation request");
                return false;
            }
        };

        match self.source.closes(request).await {
            Ok(series) => !series.is_empty(),
            Err(error) => {
                debug!(%symbol, %error, "validation pull failed");
                false
            }
        }
    }

    /// Up to `suggestion_limit` alternatives for `text`; never empty.
    pub async fn suggestions(&self, text: &str) -> Vec<Suggestion> {
        let query = company_query(text);
        let limit = self.config.suggestion_limit.max(1);

        let mut suggestions = if query.is_empty() {
            Vec::new()
        } else {
            match self.config.strategy {
                ResolutionStrategy::Search => {
                    let hits = self.search(&query).await;
                    suggestion_hits(&hits, limit)
                        .into_iter()
                        .map(|hit| suggestion(hit.symbol.clone(), &hit.name, text))
                        .collect::<Vec<_>>()
                }
                ResolutionStrategy::Catalog => catalog_suggestions(&query, limit, text),
            }
        };

        if suggestions.is_empty() {
            suggestions = FALLBACK_SUGGESTIONS
                .iter()
                .filter_map(|(ticker, name)| {
                    Symbol::parse(ticker).ok().map(|symbol| suggestion(symbol, name, text))
                })
                .take(limit)
                .collect();
        }
        suggestions
    }

    async fn search_with_suffix_retry(&self, query: &str) -> Vec<SearchHit> {
        let hits = self.search(query).await;
        if !hits.is_empty() {
            return hits;
        }

        let stripped = strip_corporate_suffixes(query);
        if stripped.is_empty() || stripped == query {
            return hits;
        }
        debug!(%query, %stripped, "retrying search without corporate suffix");
        self.search(&stripped).await
    }

    /// Provider search; failures degrade to no hits.
    async fn search(&self, query: &str) -> Vec<SearchHit> {
        let request = match SearchRequest::new(query, SEARCH_LIMIT) {
            Ok(request) => request,
            Err(_) => return Vec::new(),
        };

        match self.source.search(request).await {
            Ok(batch) => batch.hits,
            Err(error) => {
                debug!(%query, %error, "company search failed");
                Vec::new()
            }
        }
    }
}

fn catalog_suggestions(query: &str, limit: usize, original: &str) -> Vec<Suggestion> {
    let mut seen = HashSet::new();
    rank_catalog(query)
        .into_iter()
        .filter(|found| seen.insert(found.entry.ticker))
        .filter_map(|found| {
            Symbol::parse(found.entry.ticker)
                .ok()
                .map(|symbol| suggestion(symbol, found.entry.display_name, original))
        })
        .take(limit)
        .collect()
}

fn suggestion(symbol: Symbol, name: &str, original: &str) -> Suggestion {
    let display = name.split(" (").next().unwrap_or(name).trim();
    let display = if display.is_empty() {
        symbol.as_str().to_owned()
    } else {
        display.to_owned()
    };
    let short = display.split(',').next().unwrap_or(&display).trim().to_owned();

    Suggestion {
        echo: echo_with_duration(&short, original),
        symbol,
        name: display,
    }
}

/// Re-attaches the duration found in `original` to `name`.
///
/// ```rust
/// use driftcast_core::echo_with_duration;
///
/// assert_eq!(echo_with_duration("Apple", "appel in 2 days"), "Apple in 2 days");
/// assert_eq!(echo_with_duration("Apple", "appel"), "Apple");
/// ```
pub fn echo_with_duration(name: &str, original: &str) -> String {
    match parse_duration(original) {
        Some(horizon) => format!("{name} in {horizon}"),
        None => name.to_owned(),
    }
}
