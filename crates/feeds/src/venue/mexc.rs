use async_trait::async_trait;
use serde_json::Value;
use spread_core::{Symbol, Venue};
use tracing::debug;

use super::{Capabilities, MarketKind, VenueClient};
use crate::http::{field, field_f64, get_json};
use crate::{FeedError, FeedResult};

/// MEXC spot (v3) and contract (v1) APIs.
pub struct MexcClient {
    http: reqwest::Client,
}

impl MexcClient {
    const SPOT_URL: &'static str = "https://api.mexc.com";
    const CONTRACT_URL: &'static str = "https://contract.mexc.com";

    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Spot: `{"symbol":"BTCUSDT","price":"60000.1"}`
    pub fn parse_spot_ticker(body: &Value) -> FeedResult<f64> {
        field_f64(body, "/price")
    }

    /// Contract envelope: `{"success":true,"code":0,"data":{...}}`
    fn contract_data(body: &Value) -> FeedResult<&Value> {
        if body["success"].as_bool() != Some(true) {
            return Err(FeedError::Api(body["message"].to_string()));
        }
        field(body, "/data")
    }

    pub fn parse_swap_ticker(body: &Value) -> FeedResult<f64> {
        field_f64(Self::contract_data(body)?, "/lastPrice")
    }

    pub fn parse_funding_rate(body: &Value) -> FeedResult<f64> {
        field_f64(Self::contract_data(body)?, "/fundingRate")
    }
}

#[async_trait]
impl VenueClient for MexcClient {
    fn venue(&self) -> Venue {
        Venue::Mexc
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PERPETUALS
    }

    fn market_id(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<String> {
        Ok(match kind {
            MarketKind::Spot => symbol.joined(""),
            MarketKind::Swap => symbol.joined("_"),
        })
    }

    async fn fetch_ticker(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<f64> {
        let market = self.market_id(symbol, kind)?;
        debug!("MEXC: Fetching {:?} ticker {}", kind, market);

        match kind {
            MarketKind::Spot => {
                let url = format!("{}/api/v3/ticker/price", Self::SPOT_URL);
                let body = get_json(&self.http, &url, &[("symbol", market)]).await?;
                Self::parse_spot_ticker(&body)
            }
            MarketKind::Swap => {
                let url = format!("{}/api/v1/contract/ticker", Self::CONTRACT_URL);
                let body = get_json(&self.http, &url, &[("symbol", market)]).await?;
                Self::parse_swap_ticker(&body)
            }
        }
    }

    async fn fetch_funding_rate(&self, symbol: &Symbol) -> FeedResult<f64> {
        let market = self.market_id(symbol, MarketKind::Swap)?;
        let url = format!("{}/api/v1/contract/funding_rate/{}", Self::CONTRACT_URL, market);

        let body = get_json(&self.http, &url, &[]).await?;
        Self::parse_funding_rate(&body)
    }
}
