use async_trait::async_trait;
use serde_json::Value;
use spread_core::{Symbol, Venue};
use tracing::debug;

use super::{Capabilities, MarketKind, VenueClient};
use crate::http::{field_f64, first_item, get_json};
use crate::{FeedError, FeedResult};

/// Gate.io spot and USDT-settled futures (API v4).
pub struct GateClient {
    http: reqwest::Client,
}

impl GateClient {
    const BASE_URL: &'static str = "https://api.gateio.ws/api/v4";

    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// `[{"currency_pair":"BTC_USDT","last":"60000.1",...}]` for spot, and
    /// `[{"contract":"BTC_USDT","last":"60010.2","funding_rate":"0.0001",...}]`
    /// for futures.
    pub fn parse_ticker(body: &Value, market: &str) -> FeedResult<f64> {
        field_f64(first_item(body, "", market)?, "/last")
    }

    /// Contract detail: `{"name":"BTC_USDT","funding_rate":"0.0001",...}`
    pub fn parse_funding_rate(body: &Value) -> FeedResult<f64> {
        field_f64(body, "/funding_rate")
    }
}

#[async_trait]
impl VenueClient for GateClient {
    fn venue(&self) -> Venue {
        Venue::Gate
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PERPETUALS
    }

    fn market_id(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<String> {
        let market = symbol.joined("_");
        if kind == MarketKind::Swap && !symbol.quote().eq_ignore_ascii_case("USDT") {
            return Err(FeedError::UnsupportedMarket(market));
        }
        Ok(market)
    }

    async fn fetch_ticker(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<f64> {
        let market = self.market_id(symbol, kind)?;
        debug!("Gate: Fetching {:?} ticker {}", kind, market);

        let (url, query) = match kind {
            MarketKind::Spot => (
                format!("{}/spot/tickers", Self::BASE_URL),
                [("currency_pair", market.clone())],
            ),
            MarketKind::Swap => (
                format!("{}/futures/usdt/tickers", Self::BASE_URL),
                [("contract", market.clone())],
            ),
        };
        let body = get_json(&self.http, &url, &query).await?;
        Self::parse_ticker(&body, &market)
    }

    async fn fetch_funding_rate(&self, symbol: &Symbol) -> FeedResult<f64> {
        let market = self.market_id(symbol, MarketKind::Swap)?;
        let url = format!("{}/futures/usdt/contracts/{}", Self::BASE_URL, market);

        let body = get_json(&self.http, &url, &[]).await?;
        Self::parse_funding_rate(&body)
    }
}
