use super::similarity::token_sort_ratio;

/// One curated company alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Lowercase alias matched against the user's query.
    pub alias: &'static str,
    pub ticker: &'static str,
    pub display_name: &'static str,
}

const fn entry(alias: &'static str, ticker: &'static str, display_name: &'static str) -> CatalogEntry {
    CatalogEntry {
        alias,
        ticker,
        display_name,
    }
}

/// Well-known US listings, several aliases per company where people use them.
pub const COMPANY_CATALOG: &[CatalogEntry] = &[
    entry("apple", "AAPL", "Apple Inc."),
    entry("microsoft", "MSFT", "Microsoft Corporation"),
    entry("google", "GOOGL", "Alphabet Inc."),
    entry("alphabet", "GOOGL", "Alphabet Inc."),
    entry("amazon", "AMZN", "Amazon.com, Inc."),
    entry("meta", "META", "Meta Platforms, Inc."),
    entry("facebook", "META", "Meta Platforms, Inc."),
    entry("tesla", "TSLA", "Tesla, Inc."),
    entry("nvidia", "NVDA", "NVIDIA Corporation"),
    entry("netflix", "NFLX", "Netflix, Inc."),
    entry("disney", "DIS", "The Walt Disney Company"),
    entry("walt disney", "DIS", "The Walt Disney Company"),
    entry("boeing", "BA", "The Boeing Company"),
    entry("walmart", "WMT", "Walmart Inc."),
    entry("coca cola", "KO", "The Coca-Cola Company"),
    entry("coke", "KO", "The Coca-Cola Company"),
    entry("pepsi", "PEP", "PepsiCo, Inc."),
    entry("pepsico", "PEP", "PepsiCo, Inc."),
    entry("intel", "INTC", "Intel Corporation"),
    entry("amd", "AMD", "Advanced Micro Devices, Inc."),
    entry("advanced micro devices", "AMD", "Advanced Micro Devices, Inc."),
    entry("ibm", "IBM", "International Business Machines Corporation"),
    entry("oracle", "ORCL", "Oracle Corporation"),
    entry("salesforce", "CRM", "Salesforce, Inc."),
    entry("adobe", "ADBE", "Adobe Inc."),
    entry("cisco", "CSCO", "Cisco Systems, Inc."),
    entry("qualcomm", "QCOM", "QUALCOMM Incorporated"),
    entry("broadcom", "AVGO", "Broadcom Inc."),
    entry("paypal", "PYPL", "PayPal Holdings, Inc."),
    entry("visa", "V", "Visa Inc."),
    entry("mastercard", "MA", "Mastercard Incorporated"),
    entry("jpmorgan", "JPM", "JPMorgan Chase & Co."),
    entry("jp morgan", "JPM", "JPMorgan Chase & Co."),
    entry("goldman sachs", "GS", "The Goldman Sachs Group, Inc."),
    entry("morgan stanley", "MS", "Morgan Stanley"),
    entry("bank of america", "BAC", "Bank of America Corporation"),
    entry("wells fargo", "WFC", "Wells Fargo & Company"),
    entry("citigroup", "C", "Citigroup Inc."),
    entry("berkshire hathaway", "BRK-B", "Berkshire Hathaway Inc."),
    entry("johnson and johnson", "JNJ", "Johnson & Johnson"),
    entry("pfizer", "PFE", "Pfizer Inc."),
    entry("moderna", "MRNA", "Moderna, Inc."),
    entry("merck", "MRK", "Merck & Co., Inc."),
    entry("unitedhealth", "UNH", "UnitedHealth Group Incorporated"),
    entry("exxon", "XOM", "Exxon Mobil Corporation"),
    entry("exxon mobil", "XOM", "Exxon Mobil Corporation"),
    entry("chevron", "CVX", "Chevron Corporation"),
    entry("procter and gamble", "PG", "The Procter & Gamble Company"),
    entry("mcdonalds", "MCD", "McDonald's Corporation"),
    entry("starbucks", "SBUX", "Starbucks Corporation"),
    entry("nike", "NKE", "NIKE, Inc."),
    entry("costco", "COST", "Costco Wholesale Corporation"),
    entry("home depot", "HD", "The Home Depot, Inc."),
    entry("target", "TGT", "Target Corporation"),
    entry("ford", "F", "Ford Motor Company"),
    entry("general motors", "GM", "General Motors Company"),
    entry("uber", "UBER", "Uber Technologies, Inc."),
    entry("airbnb", "ABNB", "Airbnb, Inc."),
    entry("spotify", "SPOT", "Spotify Technology S.A."),
    entry("shopify", "SHOP", "Shopify Inc."),
    entry("palantir", "PLTR", "Palantir Technologies Inc."),
    entry("snowflake", "SNOW", "Snowflake Inc."),
    entry("verizon", "VZ", "Verizon Communications Inc."),
    entry("at&t", "T", "AT&T Inc."),
    entry("comcast", "CMCSA", "Comcast Corporation"),
];

/// Catalog alias with its similarity to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogMatch {
    pub entry: CatalogEntry,
    pub score: f64,
}

/// Every catalog alias scored against `query`, best first.
///
/// Ties keep catalog order.
pub fn rank_catalog(query: &str) -> Vec<CatalogMatch> {
    let mut matches = COMPANY_CATALOG
        .iter()
        .map(|entry| CatalogMatch {
            entry: *entry,
            score: token_sort_ratio(query, entry.alias),
        })
        .collect::<Vec<_>>();
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches
}

/// Best alias at or above `threshold`.
pub fn best_catalog_match(query: &str, threshold: f64) -> Option<CatalogMatch> {
    rank_catalog(query)
        .into_iter()
        .next()
        .filter(|best| best.score >= threshold)
}
