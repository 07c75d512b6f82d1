use async_trait::async_trait;
use serde_json::Value;
use spread_core::{Symbol, Venue};
use tracing::debug;

use super::{Capabilities, MarketKind, VenueClient};
use crate::http::{field, field_f64, first_item, get_json};
use crate::{FeedError, FeedResult};

/// BitMart spot (v3 quotation) and contract public APIs.
pub struct BitmartClient {
    http: reqwest::Client,
}

impl BitmartClient {
    const SPOT_URL: &'static str = "https://api-cloud.bitmart.com";
    const CONTRACT_URL: &'static str = "https://api-cloud-v2.bitmart.com";
    const OK: i64 = 1000;

    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Envelope: `{"code":1000,"message":"OK","data":{...}}`
    fn data(body: &Value) -> FeedResult<&Value> {
        if body["code"].as_i64() != Some(Self::OK) {
            return Err(FeedError::Api(body["message"].to_string()));
        }
        field(body, "/data")
    }

    /// Spot: `data.last`.
    pub fn parse_spot_ticker(body: &Value) -> FeedResult<f64> {
        field_f64(Self::data(body)?, "/last")
    }

    /// Contract details: `data.symbols[0].last_price`.
    pub fn parse_swap_ticker(body: &Value, market: &str) -> FeedResult<f64> {
        let contract = first_item(Self::data(body)?, "/symbols", market)?;
        field_f64(contract, "/last_price")
    }

    /// Funding: `data.rate_value`.
    pub fn parse_funding_rate(body: &Value) -> FeedResult<f64> {
        field_f64(Self::data(body)?, "/rate_value")
    }
}

#[async_trait]
impl VenueClient for BitmartClient {
    fn venue(&self) -> Venue {
        Venue::Bitmart
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PERPETUALS
    }

    fn market_id(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<String> {
        Ok(match kind {
            MarketKind::Spot => symbol.joined("_"),
            MarketKind::Swap => symbol.joined(""),
        })
    }

    async fn fetch_ticker(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<f64> {
        let market = self.market_id(symbol, kind)?;
        debug!("BitMart: Fetching {:?} ticker {}", kind, market);

        match kind {
            MarketKind::Spot => {
                let url = format!("{}/spot/quotation/v3/ticker", Self::SPOT_URL);
                let body = get_json(&self.http, &url, &[("symbol", market)]).await?;
                Self::parse_spot_ticker(&body)
            }
            MarketKind::Swap => {
                let url = format!("{}/contract/public/details", Self::CONTRACT_URL);
                let body = get_json(&self.http, &url, &[("symbol", market.clone())]).await?;
                Self::parse_swap_ticker(&body, &market)
            }
        }
    }

    async fn fetch_funding_rate(&self, symbol: &Symbol) -> FeedResult<f64> {
        let market = self.market_id(symbol, MarketKind::Swap)?;
        let url = format!("{}/contract/public/funding-rate", Self::CONTRACT_URL);

        let body = get_json(&self.http, &url, &[("symbol", market)]).await?;
        Self::parse_funding_rate(&body)
    }
}
