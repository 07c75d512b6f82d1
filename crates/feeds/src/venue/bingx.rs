use async_trait::async_trait;
use serde_json::Value;
use spread_core::{Symbol, Venue};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use super::{Capabilities, MarketKind, VenueClient};
use crate::http::{field_f64, first_item, get_json};
use crate::{FeedError, FeedResult};

/// BingX spot (v1) and perpetual swap (v2) public endpoints.
pub struct BingxClient {
    http: reqwest::Client,
}

impl BingxClient {
    const BASE_URL: &'static str = "https://open-api.bingx.com/openApi";

    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// The spot ticker endpoint requires a request timestamp.
    fn timestamp_ms() -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default()
            .to_string()
    }

    /// Envelope: `{"code":0,"msg":"","data":...}`. Spot returns a list, swap
    /// an object.
    fn entry<'a>(body: &'a Value, market: &str) -> FeedResult<&'a Value> {
        if body["code"].as_i64() != Some(0) {
            return Err(FeedError::Api(body["msg"].to_string()));
        }
        first_item(body, "/data", market)
    }

    pub fn parse_ticker(body: &Value, market: &str) -> FeedResult<f64> {
        field_f64(Self::entry(body, market)?, "/lastPrice")
    }

    /// Premium index: `{"code":0,"data":{"symbol":"BTC-USDT","lastFundingRate":"0.0001",...}}`
    pub fn parse_funding_rate(body: &Value, market: &str) -> FeedResult<f64> {
        field_f64(Self::entry(body, market)?, "/lastFundingRate")
    }
}

#[async_trait]
impl VenueClient for BingxClient {
    fn venue(&self) -> Venue {
        Venue::Bingx
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PERPETUALS
    }

    fn market_id(&self, symbol: &Symbol, _kind: MarketKind) -> FeedResult<String> {
        Ok(symbol.joined("-"))
    }

    async fn fetch_ticker(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<f64> {
        let market = self.market_id(symbol, kind)?;
        debug!("BingX: Fetching {:?} ticker {}", kind, market);

        let body = match kind {
            MarketKind::Spot => {
                let url = format!("{}/spot/v1/ticker/24hr", Self::BASE_URL);
                let query = [
                    ("symbol", market.clone()),
                    ("timestamp", Self::timestamp_ms()),
                ];
                get_json(&self.http, &url, &query).await?
            }
            MarketKind::Swap => {
                let url = format!("{}/swap/v2/quote/ticker", Self::BASE_URL);
                get_json(&self.http, &url, &[("symbol", market.clone())]).await?
            }
        };
        Self::parse_ticker(&body, &market)
    }

    async fn fetch_funding_rate(&self, symbol: &Symbol) -> FeedResult<f64> {
        let market = self.market_id(symbol, MarketKind::Swap)?;
        let url = format!("{}/swap/v2/quote/premiumIndex", Self::BASE_URL);

        let body = get_json(&self.http, &url, &[("symbol", market.clone())]).await?;
        Self::parse_funding_rate(&body, &market)
    }
}
