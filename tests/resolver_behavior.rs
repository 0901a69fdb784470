//! Behavior tests for free-text ticker resolution.
//!
//! Offline cases run against the demo fixture. Provider cases drive the
//! Yahoo adapter through a recording HTTP client routed by URL.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use driftcast_core::{
    EngineConfig, FixtureSource, HttpClient, HttpError, HttpRequest, HttpResponse, Resolution,
    ResolutionStrategy, ResolvedVia, TickerResolver, YahooAdapter,
};

const CHART_BODY: &str = r#"{"chart":{"result":[{"timestamp":[1704205800,1704292200,1704378600],
    "indicators":{"quote":[{"close":[185.64,184.25,181.91]}]}}],"error":null}}"#;

const APPLE_SEARCH_BODY: &str = r#"{"quotes":[
    {"symbol":"APLE","longname":"Apple Hospitality REIT, Inc.","exchange":"NYQ","quoteType":"EQUITY"},
    {"symbol":"AAPL","shortname":"Apple Inc.","exchange":"NMS","quoteType":"EQUITY"},
    {"symbol":"AAPB","shortname":"GraniteShares 2x Long AAPL Daily ETF","exchange":"NGM","quoteType":"ETF"}
]}"#;

const EMPTY_SEARCH_BODY: &str = r#"{"quotes":[]}"#;

/// Answers each request with the first route whose marker appears in the URL.
///
/// Unrouted requests get a 404.
struct RoutedHttpClient {
    routes: Vec<(&'static str, HttpResponse)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RoutedHttpClient {
    fn new(routes: Vec<(&'static str, HttpResponse)>) -> Self {
        Self {
            routes,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

impl HttpClient for RoutedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self
            .routes
            .iter()
            .find(|(marker, _)| request.url.contains(marker))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| HttpResponse::with_status(404, "{}"));
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        Box::pin(async move { Ok(response) })
    }
}

fn fixture_resolver(strategy: ResolutionStrategy) -> TickerResolver {
    TickerResolver::new(
        Arc::new(FixtureSource::demo()),
        EngineConfig::default().with_strategy(strategy),
    )
}

fn resolved(resolution: &Resolution) -> Option<(&str, ResolvedVia)> {
    match resolution {
        Resolution::Resolved { symbol, via } => Some((symbol.as_str(), *via)),
        Resolution::Unresolved { .. } => None,
    }
}

// =============================================================================
// Explicit symbols
// =============================================================================

#[tokio::test]
async fn when_user_types_a_prefixed_ticker_it_wins_over_company_words() {
    // Given: a resolver over the demo fixture
    let resolver = fixture_resolver(ResolutionStrategy::Search);

    // When: the text mixes a prefixed ticker and a company name
    let resolution = resolver.resolve("$TSLA apple in 3 days").await;

    // Then: the explicit ticker is used
    assert_eq!(resolved(&resolution), Some(("TSLA", ResolvedVia::Explicit)));
}

#[tokio::test]
async fn when_user_types_a_lone_single_letter_ticker_it_is_accepted() {
    let resolver = fixture_resolver(ResolutionStrategy::Search);

    let resolution = resolver.resolve("F").await;

    assert_eq!(resolved(&resolution), Some(("F", ResolvedVia::Explicit)));
}

#[tokio::test]
async fn when_ticker_is_wrapped_in_punctuation_it_is_still_explicit() {
    // Given: the catalog strategy, which cannot fall back to name search for tickers
    let resolver = fixture_resolver(ResolutionStrategy::Catalog);

    // When/Then: brackets, quotes, possessives, and comma lists keep the ticker explicit
    for (text, expected) in [
        ("(TSLA) in 2 weeks", "TSLA"),
        ("\"NVDA\" next week", "NVDA"),
        ("AAPL's price in 3 days", "AAPL"),
        ("MSFT,AAPL tomorrow", "MSFT"),
    ] {
        let resolution = resolver.resolve(text).await;
        assert_eq!(
            resolved(&resolution),
            Some((expected, ResolvedVia::Explicit)),
            "input: {text}"
        );
    }
}

// =============================================================================
// Company names
// =============================================================================

#[tokio::test]
async fn when_user_types_a_company_name_search_picks_the_primary_listing() {
    let resolver = fixture_resolver(ResolutionStrategy::Search);

    let resolution = resolver.resolve("apple in 4 days").await;

    assert_eq!(resolved(&resolution), Some(("AAPL", ResolvedVia::Search)));
}

#[tokio::test]
async fn when_catalog_strategy_is_used_typos_still_resolve() {
    // Given: the built-in catalog strategy
    let resolver = fixture_resolver(ResolutionStrategy::Catalog);

    // When: a misspelled company name is resolved
    let microsoft = resolver.resolve("microsft in a week").await;
    let google = resolver.resolve("gogle tomorrow").await;

    // Then: the closest catalog aliases win
    assert_eq!(resolved(&microsoft), Some(("MSFT", ResolvedVia::Catalog)));
    assert_eq!(resolved(&google), Some(("GOOGL", ResolvedVia::Catalog)));
}

// =============================================================================
// Suggestions
// =============================================================================

#[tokio::test]
async fn when_nothing_matches_user_gets_suggestions_echoing_the_duration() {
    // Given: text naming no known company
    let resolver = fixture_resolver(ResolutionStrategy::Search);

    // When: it is resolved
    let resolution = resolver.resolve("blahblah in 2 days").await;

    // Then: a short, non-empty suggestion list carries the duration
    let Resolution::Unresolved { suggestions } = resolution else {
        panic!("expected unresolved, got {resolution:?}");
    };
    assert!(!suggestions.is_empty());
    assert!(suggestions.len() <= 3);
    assert!(suggestions
        .iter()
        .all(|suggestion| suggestion.echo.ends_with(" in 2 days")));
}

#[tokio::test]
async fn when_catalog_has_no_close_alias_it_still_suggests_its_best_entries() {
    let resolver = fixture_resolver(ResolutionStrategy::Catalog);

    let resolution = resolver.resolve("blahblah").await;

    let Resolution::Unresolved { suggestions } = resolution else {
        panic!("expected unresolved, got {resolution:?}");
    };
    assert_eq!(suggestions.len(), 3);
    assert!(suggestions
        .iter()
        .all(|suggestion| suggestion.echo == suggestion.name.split(',').next().unwrap_or_default()));
}

// =============================================================================
// Yahoo provider path
// =============================================================================

#[tokio::test]
async fn when_misspelled_name_is_searched_yahoo_hits_are_ranked_and_validated() {
    // Given: Yahoo answering the search and the chart for AAPL
    let client = Arc::new(RoutedHttpClient::new(vec![
        (
            "/v1/finance/search?q=appel&",
            HttpResponse::ok_json(APPLE_SEARCH_BODY),
        ),
        ("/v8/finance/chart/AAPL?", HttpResponse::ok_json(CHART_BODY)),
    ]));
    let resolver = TickerResolver::new(
        Arc::new(YahooAdapter::with_http_client(client.clone())),
        EngineConfig::default(),
    );

    // When: a misspelled name is resolved
    let resolution = resolver.resolve("appel in 2 days").await;

    // Then: the primary listing wins and was validated with a chart pull
    assert_eq!(resolved(&resolution), Some(("AAPL", ResolvedVia::Search)));
    let urls = client.urls();
    assert!(urls[0].starts_with("https://query2.finance.yahoo.com/v1/finance/search?q=appel&"));
    assert!(urls
        .iter()
        .any(|url| url.contains("/v8/finance/chart/AAPL?")));
}

#[tokio::test]
async fn when_search_with_corporate_suffix_is_empty_it_retries_without_it() {
    // Given: Yahoo returning nothing for "apple inc" but hits for "apple"
    let client = Arc::new(RoutedHttpClient::new(vec![
        (
            "/v1/finance/search?q=apple%20inc&",
            HttpResponse::ok_json(EMPTY_SEARCH_BODY),
        ),
        (
            "/v1/finance/search?q=apple&",
            HttpResponse::ok_json(APPLE_SEARCH_BODY),
        ),
        ("/v8/finance/chart/AAPL?", HttpResponse::ok_json(CHART_BODY)),
    ]));
    let resolver = TickerResolver::new(
        Arc::new(YahooAdapter::with_http_client(client.clone())),
        EngineConfig::default(),
    );

    // When: the suffixed name is resolved
    let resolution = resolver.resolve("apple inc next week").await;

    // Then: both hosts were tried before retrying the stripped query
    assert_eq!(resolved(&resolution), Some(("AAPL", ResolvedVia::Search)));
    let searches = client
        .urls()
        .into_iter()
        .filter(|url| url.contains("/v1/finance/search"))
        .collect::<Vec<_>>();
    assert_eq!(searches.len(), 3);
    assert!(searches[0].contains("q=apple%20inc&"));
    assert!(searches[1].starts_with("https://query1.finance.yahoo.com/"));
    assert!(searches[2].contains("q=apple&"));
}

#[tokio::test]
async fn when_winner_has_no_price_data_resolution_fails_with_suggestions() {
    // Given: search hits whose charts all come back 404
    let client = Arc::new(RoutedHttpClient::new(vec![(
        "/v1/finance/search?",
        HttpResponse::ok_json(APPLE_SEARCH_BODY),
    )]));
    let resolver = TickerResolver::new(
        Arc::new(YahooAdapter::with_http_client(client)),
        EngineConfig::default(),
    );

    // When: the name is resolved
    let resolution = resolver.resolve("apple tomorrow").await;

    // Then: no runner-up is tried but the hits become suggestions, domestic first
    let Resolution::Unresolved { suggestions } = resolution else {
        panic!("expected unresolved, got {resolution:?}");
    };
    let symbols = suggestions
        .iter()
        .map(|suggestion| suggestion.symbol.as_str())
        .collect::<Vec<_>>();
    assert_eq!(symbols, vec!["AAPL", "APLE", "AAPB"]);
    assert_eq!(suggestions[0].echo, "Apple Inc. in 1 days");
}
