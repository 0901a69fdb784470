use serde::{Deserialize, Serialize};

use crate::Symbol;

/// Instrument class reported by company search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Equity,
    Etf,
    MutualFund,
    Index,
    Crypto,
    Forex,
    Other,
}

impl AssetClass {
    /// Maps a provider `quoteType` string; `None` when the provider omitted it.
    pub fn from_quote_type(value: Option<&str>) -> Option<Self> {
        value.map(|raw| match raw.trim().to_ascii_uppercase().as_str() {
            "EQUITY" => Self::Equity,
            "ETF" => Self::Etf,
            "MUTUALFUND" => Self::MutualFund,
            "INDEX" => Self::Index,
            "CRYPTOCURRENCY" => Self::Crypto,
            "CURRENCY" => Self::Forex,
            _ => Self::Other,
        })
    }

    /// Classes a price forecast makes sense for.
    pub const fn is_stock_like(self) -> bool {
        matches!(
            self,
            Self::Equity | Self::Etf | Self::MutualFund | Self::Index
        )
    }
}

const US_EXCHANGES: [&str; 4] = ["NMS", "NYQ", "ASE", "NMS2"];

/// One company-search candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub symbol: Symbol,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_class: Option<AssetClass>,
}

impl SearchHit {
    pub fn new(symbol: Symbol, name: impl Into<String>) -> Self {
        Self {
            symbol,
            name: name.into(),
            exchange: None,
            region: None,
            asset_class: None,
        }
    }

    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = Some(exchange.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_asset_class(mut self, asset_class: AssetClass) -> Self {
        self.asset_class = Some(asset_class);
        self
    }

    /// Listed on a domestic (US) venue.
    pub fn is_domestic(&self) -> bool {
        self.region.as_deref() == Some("US")
            || self
                .exchange
                .as_deref()
                .is_some_and(|exchange| US_EXCHANGES.contains(&exchange))
    }

    pub fn is_equity(&self) -> bool {
        self.asset_class == Some(AssetClass::Equity)
    }

    /// Unknown class counts as stock-like.
    pub fn is_stock_like(&self) -> bool {
        self.asset_class.map_or(true, AssetClass::is_stock_like)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(symbol: &str) -> SearchHit {
        SearchHit::new(Symbol::parse(symbol).expect("valid"), "Example")
    }

    #[test]
    fn domestic_by_exchange_or_region() {
        assert!(hit("AAPL").with_exchange("NMS").is_domestic());
        assert!(hit("AAPL").with_region("US").is_domestic());
        assert!(!hit("AAPL.L").with_exchange("LSE").is_domestic());
    }

    #[test]
    fn unknown_asset_class_is_stock_like() {
        assert!(hit("AAPL").is_stock_like());
        assert!(!hit("BTC-USD")
            .with_asset_class(AssetClass::Crypto)
            .is_stock_like());
        assert_eq!(
            AssetClass::from_quote_type(Some("MUTUALFUND")),
            Some(AssetClass::MutualFund)
        );
    }
}
