use async_trait::async_trait;
use serde_json::Value;
use spread_core::{Symbol, Venue};
use tracing::debug;

use super::{no_swap, Capabilities, MarketKind, VenueClient};
use crate::http::{field_f64, get_json};
use crate::{FeedError, FeedResult};

/// KuCoin spot. Perpetuals live on a separate futures venue, so this client
/// reports no swap support.
pub struct KucoinClient {
    http: reqwest::Client,
}

impl KucoinClient {
    const BASE_URL: &'static str = "https://api.kucoin.com";
    const OK: &'static str = "200000";

    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// `{"code":"200000","data":{"price":"60000.1","bestBid":"...",...}}`.
    /// Unknown markets come back with `"data": null`.
    pub fn parse_ticker(body: &Value, market: &str) -> FeedResult<f64> {
        if body["code"].as_str() != Some(Self::OK) {
            return Err(FeedError::Api(body["msg"].to_string()));
        }
        if body["data"].is_null() {
            return Err(FeedError::UnsupportedMarket(market.to_string()));
        }
        field_f64(body, "/data/price")
    }
}

#[async_trait]
impl VenueClient for KucoinClient {
    fn venue(&self) -> Venue {
        Venue::Kucoin
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SPOT_ONLY
    }

    fn market_id(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<String> {
        match kind {
            MarketKind::Spot => Ok(symbol.joined("-")),
            MarketKind::Swap => Err(no_swap(self.venue())),
        }
    }

    async fn fetch_ticker(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<f64> {
        let market = self.market_id(symbol, kind)?;
        debug!("KuCoin: Fetching ticker {}", market);

        let url = format!("{}/api/v1/market/orderbook/level1", Self::BASE_URL);
        let body = get_json(&self.http, &url, &[("symbol", market.clone())]).await?;
        Self::parse_ticker(&body, &market)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_ticker() {
        let body = json!({
            "code": "200000",
            "data": {"time": 1700000000000u64, "sequence": "1", "price": "60001.2", "size": "0.01"}
        });
        assert_eq!(KucoinClient::parse_ticker(&body, "BTC-USDT").unwrap(), 60001.2);
    }

    #[test]
    fn test_parse_unknown_market() {
        let body = json!({"code": "200000", "data": null});
        assert!(KucoinClient::parse_ticker(&body, "FOO-USDT")
            .unwrap_err()
            .is_unsupported());
    }

    #[test]
    fn test_parse_error_code() {
        let body = json!({"code": "400100", "msg": "Invalid request"});
        assert!(matches!(
            KucoinClient::parse_ticker(&body, "BTC-USDT"),
            Err(FeedError::Api(_))
        ));
    }

    #[tokio::test]
    async fn test_no_funding_rate() {
        let client = KucoinClient::new(reqwest::Client::new());
        let err = client
            .fetch_funding_rate(&Symbol::new("BTC", "USDT"))
            .await
            .unwrap_err();
        assert!(err.is_unsupported());
    }
}
