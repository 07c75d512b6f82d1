use async_trait::async_trait;
use serde_json::Value;
use spread_core::{Symbol, Venue};
use tracing::debug;

use super::{Capabilities, MarketKind, VenueClient};
use crate::http::{field_f64, first_item, get_json};
use crate::{FeedError, FeedResult};

/// CoinEx API v2.
pub struct CoinexClient {
    http: reqwest::Client,
}

impl CoinexClient {
    const BASE_URL: &'static str = "https://api.coinex.com/v2";

    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Envelope: `{"code":0,"data":[{...}],"message":"OK"}`
    fn entry<'a>(body: &'a Value, market: &str) -> FeedResult<&'a Value> {
        if body["code"].as_i64() != Some(0) {
            return Err(FeedError::Api(body["message"].to_string()));
        }
        first_item(body, "/data", market)
    }

    pub fn parse_ticker(body: &Value, market: &str) -> FeedResult<f64> {
        field_f64(Self::entry(body, market)?, "/last")
    }

    pub fn parse_funding_rate(body: &Value, market: &str) -> FeedResult<f64> {
        field_f64(Self::entry(body, market)?, "/latest_funding_rate")
    }
}

#[async_trait]
impl VenueClient for CoinexClient {
    fn venue(&self) -> Venue {
        Venue::Coinex
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PERPETUALS
    }

    fn market_id(&self, symbol: &Symbol, _kind: MarketKind) -> FeedResult<String> {
        Ok(symbol.joined(""))
    }

    async fn fetch_ticker(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<f64> {
        let market = self.market_id(symbol, kind)?;
        let path = match kind {
            MarketKind::Spot => "spot/ticker",
            MarketKind::Swap => "futures/ticker",
        };
        debug!("CoinEx: Fetching {} {}", path, market);

        let url = format!("{}/{}", Self::BASE_URL, path);
        let body = get_json(&self.http, &url, &[("market", market.clone())]).await?;
        Self::parse_ticker(&body, &market)
    }

    async fn fetch_funding_rate(&self, symbol: &Symbol) -> FeedResult<f64> {
        let market = self.market_id(symbol, MarketKind::Swap)?;
        let url = format!("{}/futures/funding-rate", Self::BASE_URL);

        let body = get_json(&self.http, &url, &[("market", market.clone())]).await?;
        Self::parse_funding_rate(&body, &market)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_ticker() {
        let body = json!({
            "code": 0,
            "data": [{"market": "BTCUSDT", "last": "60333.33", "open": "59000"}],
            "message": "OK"
        });
        assert_eq!(CoinexClient::parse_ticker(&body, "BTCUSDT").unwrap(), 60333.33);
    }

    #[test]
    fn test_parse_funding_rate() {
        let body = json!({
            "code": 0,
            "data": [{"market": "BTCUSDT", "latest_funding_rate": "0.00005", "next_funding_rate": "0.0001"}],
            "message": "OK"
        });
        assert_eq!(CoinexClient::parse_funding_rate(&body, "BTCUSDT").unwrap(), 0.00005);
    }

    #[test]
    fn test_parse_error() {
        let body = json!({"code": 3639, "data": {}, "message": "market not found"});
        assert!(matches!(
            CoinexClient::parse_ticker(&body, "FOOUSDT"),
            Err(FeedError::Api(_))
        ));
    }
}
