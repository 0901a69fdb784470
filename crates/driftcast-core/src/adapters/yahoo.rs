use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::data_source::{
    ClosesRequest, Endpoint, PriceSource, SearchBatch, SearchRequest, SourceError, SourceFuture,
};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{AssetClass, PricePoint, PriceSeries, ProviderId, SearchHit, Symbol, UtcDateTime};

/// Hosts tried in order for every call.
const HOSTS: [&str; 2] = [
    "https://query2.finance.yahoo.com",
    "https://query1.finance.yahoo.com",
];

/// Results requested from the search endpoint regardless of the caller's limit.
const SEARCH_QUOTES_COUNT: usize = 20;

/// Yahoo Finance adapter over the public chart and search endpoints.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()))
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Runs `path_and_query` against each host until one answers 2xx.
    ///
    /// Returns `Ok(None)` on 404, which the chart endpoint uses for unknown
    /// symbols.
    async fn fetch(
        &self,
        endpoint: Endpoint,
        path_and_query: &str,
    ) -> Result<Option<String>, SourceError> {
        let mut last_error = SourceError::unavailable(format!("yahoo {endpoint}: no host answered"));

        for host in HOSTS {
            let request = HttpRequest::get(format!("{host}{path_and_query}"))
                .with_header("accept", "application/json")
                .with_timeout_ms(self.timeout_ms);

            match self.http_client.execute(request).await {
                Ok(response) if response.is_success() => return Ok(Some(response.body)),
                Ok(response) if response.status == 404 => return Ok(None),
                Ok(response) if response.status == 429 => {
                    last_error = SourceError::rate_limited(format!(
                        "yahoo {endpoint} rate limited by {host}"
                    ));
                }
                Ok(response) => {
                    last_error = SourceError::unavailable(format!(
                        "yahoo {endpoint} returned status {} from {host}",
                        response.status
                    ));
                }
                Err(error) => {
                    last_error = SourceError::unavailable(format!(
                        "yahoo {endpoint} transport error from {host}: {}",
                        error.message()
                    ));
                }
            }
            debug!(%host, %endpoint, error = %last_error, "yahoo host failed, trying next");
        }

        Err(last_error)
    }

    async fn fetch_closes(&self, req: ClosesRequest) -> Result<PriceSeries, SourceError> {
        let end = UtcDateTime::now();
        let start = end.days_before(req.lookback_days);
        let path = format!(
            "/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            urlencoding::encode(req.symbol.as_str()),
            start.unix_timestamp(),
            end.unix_timestamp(),
        );

        match self.fetch(Endpoint::Closes, &path).await? {
            Some(body) => parse_chart(req.symbol, &body),
            None => Ok(PriceSeries::empty(req.symbol)),
        }
    }

    async fn fetch_search(&self, req: SearchRequest) -> Result<SearchBatch, SourceError> {
        let path = format!(
            "/v1/finance/search?q={}&quotesCount={}&newsCount=0&listsCount=0",
            urlencoding::encode(&req.query),
            SEARCH_QUOTES_COUNT.max(req.limit),
        );

        let mut last_error = None;
        for host in HOSTS {
            let request = HttpRequest::get(format!("{host}{path}"))
                .with_header("accept", "application/json")
                .with_timeout_ms(self.timeout_ms);

            let body = match self.http_client.execute(request).await {
                Ok(response) if response.is_success() => response.body,
                Ok(response) => {
                    last_error = Some(SourceError::unavailable(format!(
                        "yahoo search returned status {} from {host}",
                        response.status
                    )));
                    continue;
                }
                Err(error) => {
                    last_error = Some(SourceError::unavailable(format!(
                        "yahoo search transport error from {host}: {}",
                        error.message()
                    )));
                    continue;
                }
            };

            let hits = parse_search(&body)?;
            if !hits.is_empty() {
                return Ok(SearchBatch {
                    query: req.query,
                    hits: hits.into_iter().take(req.limit).collect(),
                });
            }
            // Empty is not an error; try the next host.
            last_error = None;
        }

        match last_error {
            Some(error) => Err(error),
            None => Ok(SearchBatch {
                query: req.query,
                hits: Vec::new(),
            }),
        }
    }
}

impl PriceSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn closes<'a>(&'a self, req: ClosesRequest) -> SourceFuture<'a, PriceSeries> {
        Box::pin(async move { self.fetch_closes(req).await })
    }

    fn search<'a>(&'a self, req: SearchRequest) -> SourceFuture<'a, SearchBatch> {
        Box::pin(async move { self.fetch_search(req).await })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooSearchResponse {
    #[serde(default)]
    quotes: Vec<YahooSearchQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooSearchQuote {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    shortname: Option<String>,
    #[serde(default)]
    longname: Option<String>,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(rename = "quoteType", default)]
    quote_type: Option<String>,
}

fn parse_chart(symbol: Symbol, body: &str) -> Result<PriceSeries, SourceError> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = response.chart.error {
        if error
            .code
            .as_deref()
            .is_some_and(|code| code.eq_ignore_ascii_case("not found"))
        {
            return Ok(PriceSeries::empty(symbol));
        }
        return Err(SourceError::unavailable(format!(
            "yahoo chart API error: {}",
            error
                .description
                .or(error.code)
                .unwrap_or_else(|| String::from("unknown"))
        )));
    }

    let Some(result) = response.chart.result.and_then(|mut results| {
        if results.is_empty() {
            None
        } else {
            Some(results.swap_remove(0))
        }
    }) else {
        return Ok(PriceSeries::empty(symbol));
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|quote| quote.close)
        .unwrap_or_default();

    let mut points: Vec<PricePoint> = Vec::with_capacity(timestamps.len());
    for (ts, close) in timestamps.into_iter().zip(closes) {
        let Some(close) = close.filter(|value| value.is_finite()) else {
            continue;
        };
        let date = UtcDateTime::from_unix_timestamp(ts)
            .map_err(|e| SourceError::internal(format!("invalid chart timestamp: {e}")))?
            .date();

        // Intraday refreshes can repeat the last session; keep the latest close.
        match points.last_mut() {
            Some(last) if last.date == date => last.close = close,
            Some(last) if last.date > date => continue,
            _ => points.push(PricePoint::new(date, close)),
        }
    }

    PriceSeries::new(symbol, points)
        .map_err(|e| SourceError::internal(format!("invalid chart series: {e}")))
}

fn parse_search(body: &str) -> Result<Vec<SearchHit>, SourceError> {
    let response: YahooSearchResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse search response: {e}")))?;

    Ok(response
        .quotes
        .into_iter()
        .filter_map(|quote| {
            let raw_symbol = quote.symbol?;
            let symbol = Symbol::parse(&raw_symbol).ok()?;
            let name = quote
                .shortname
                .or(quote.longname)
                .unwrap_or_else(|| raw_symbol.clone());

            let mut hit = SearchHit::new(symbol, name);
            hit.exchange = quote.exchange;
            hit.region = quote.region;
            hit.asset_class = AssetClass::from_quote_type(quote.quote_type.as_deref());
            Some(hit)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    const CHART_BODY: &str = r#"{"chart":{"result":[{"timestamp":[1704205800,1704292200,1704292300,1704378600],
        "indicators":{"quote":[{"close":[185.64,184.25,184.30,null]}]}}],"error":null}}"#;

    const SEARCH_BODY: &str = r#"{"quotes":[
        {"symbol":"AAPL","shortname":"Apple Inc.","exchange":"NMS","quoteType":"EQUITY"},
        {"symbol":"APLE","longname":"Apple Hospitality REIT, Inc.","exchange":"NYQ","quoteType":"EQUITY"},
        {"symbol":"^APPLE","shortname":"Bad symbol","quoteType":"INDEX"}
    ]}"#;

    #[derive(Debug)]
    struct RecordingHttpClient {
        responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn scripted(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self
                .responses
                .lock()
                .expect("response queue should not be poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::new("no scripted response")));
            Box::pin(async move { response })
        }
    }

    fn symbol(value: &str) -> Symbol {
        Symbol::parse(value).expect("valid symbol")
    }

    #[tokio::test]
    async fn chart_request_falls_back_to_second_host() {
        let client = Arc::new(RecordingHttpClient::scripted(vec![
            Err(HttpError::new("connection reset")),
            Ok(HttpResponse::ok_json(CHART_BODY)),
        ]));
        let adapter = YahooAdapter::with_http_client(client.clone()).with_timeout_ms(2_500);
        let request = ClosesRequest::new(symbol("AAPL"), 30).expect("valid request");

        let series = adapter.closes(request).await.expect("closes should succeed");

        // Duplicate session collapses to its latest close and the null close is dropped.
        assert_eq!(series.closes(), vec![185.64, 184.30]);

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].url.starts_with("https://query2.finance.yahoo.com/v8/finance/chart/AAPL?period1="));
        assert!(requests[1].url.starts_with("https://query1.finance.yahoo.com/"));
        assert!(requests[1].url.ends_with("&interval=1d"));
        assert_eq!(requests[1].timeout_ms, 2_500);
    }

    #[tokio::test]
    async fn unknown_symbol_yields_empty_series() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let client = Arc::new(RecordingHttpClient::scripted(vec![Ok(
            HttpResponse::with_status(404, body),
        )]));
        let adapter = YahooAdapter::with_http_client(client);
        let request = ClosesRequest::new(symbol("ZZZZZ"), 14).expect("valid request");

        let series = adapter.closes(request).await.expect("404 is not an error");
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn all_hosts_failing_is_unavailable() {
        let client = Arc::new(RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::with_status(500, "")),
            Err(HttpError::new("upstream timeout")),
        ]));
        let adapter = YahooAdapter::with_http_client(client);
        let request = ClosesRequest::new(symbol("MSFT"), 14).expect("valid request");

        let error = adapter.closes(request).await.expect_err("both hosts failed");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert_eq!(error.code(), "source.unavailable");
    }

    #[tokio::test]
    async fn search_maps_quotes_and_skips_invalid_symbols() {
        let client = Arc::new(RecordingHttpClient::scripted(vec![Ok(HttpResponse::ok_json(
            SEARCH_BODY,
        ))]));
        let adapter = YahooAdapter::with_http_client(client.clone());
        let request = SearchRequest::new("apple inc", 10).expect("valid request");

        let batch = adapter.search(request).await.expect("search should succeed");

        assert_eq!(batch.hits.len(), 2);
        assert_eq!(batch.hits[0].symbol.as_str(), "AAPL");
        assert_eq!(batch.hits[0].name, "Apple Inc.");
        assert!(batch.hits[0].is_domestic());
        assert_eq!(batch.hits[1].name, "Apple Hospitality REIT, Inc.");

        let url = &client.recorded_requests()[0].url;
        assert!(url.contains("/v1/finance/search?q=apple%20inc&quotesCount=20"));
    }

    #[tokio::test]
    async fn empty_search_tries_next_host_then_returns_empty() {
        let client = Arc::new(RecordingHttpClient::scripted(vec![
            Ok(HttpResponse::ok_json(r#"{"quotes":[]}"#)),
            Ok(HttpResponse::ok_json(r#"{"quotes":[]}"#)),
        ]));
        let adapter = YahooAdapter::with_http_client(client.clone());
        let request = SearchRequest::new("blahblah", 3).expect("valid request");

        let batch = adapter.search(request).await.expect("empty search is ok");
        assert!(batch.hits.is_empty());
        assert_eq!(client.recorded_requests().len(), 2);
    }
}
