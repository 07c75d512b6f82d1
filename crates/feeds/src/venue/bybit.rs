use async_trait::async_trait;
use serde_json::Value;
use spread_core::{Symbol, Venue};
use tracing::debug;

use super::{Capabilities, MarketKind, VenueClient};
use crate::http::{field_f64, first_item, get_json};
use crate::{FeedError, FeedResult};

/// Bybit v5 unified market API.
pub struct BybitClient {
    http: reqwest::Client,
}

impl BybitClient {
    const BASE_URL: &'static str = "https://api.bybit.com";

    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    fn category(kind: MarketKind) -> &'static str {
        match kind {
            MarketKind::Spot => "spot",
            MarketKind::Swap => "linear",
        }
    }

    /// Envelope: `{"retCode":0,"retMsg":"OK","result":{"list":[{...}]}}`
    fn ticker_entry<'a>(body: &'a Value, market: &str) -> FeedResult<&'a Value> {
        if body["retCode"].as_i64() != Some(0) {
            return Err(FeedError::Api(body["retMsg"].to_string()));
        }
        first_item(body, "/result/list", market)
    }

    pub fn parse_ticker(body: &Value, market: &str) -> FeedResult<f64> {
        field_f64(Self::ticker_entry(body, market)?, "/lastPrice")
    }

    /// Linear tickers carry the current funding rate alongside the price.
    pub fn parse_funding_rate(body: &Value, market: &str) -> FeedResult<f64> {
        field_f64(Self::ticker_entry(body, market)?, "/fundingRate")
    }

    async fn tickers(&self, market: &str, kind: MarketKind) -> FeedResult<Value> {
        let url = format!("{}/v5/market/tickers", Self::BASE_URL);
        let query = [
            ("category", Self::category(kind).to_string()),
            ("symbol", market.to_string()),
        ];
        get_json(&self.http, &url, &query).await
    }
}

#[async_trait]
impl VenueClient for BybitClient {
    fn venue(&self) -> Venue {
        Venue::Bybit
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PERPETUALS
    }

    fn market_id(&self, symbol: &Symbol, _kind: MarketKind) -> FeedResult<String> {
        Ok(symbol.joined(""))
    }

    async fn fetch_ticker(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<f64> {
        let market = self.market_id(symbol, kind)?;
        debug!("Bybit: Fetching {:?} ticker {}", kind, market);
        let body = self.tickers(&market, kind).await?;
        Self::parse_ticker(&body, &market)
    }

    async fn fetch_funding_rate(&self, symbol: &Symbol) -> FeedResult<f64> {
        let market = self.market_id(symbol, MarketKind::Swap)?;
        let body = self.tickers(&market, MarketKind::Swap).await?;
        Self::parse_funding_rate(&body, &market)
    }
}
