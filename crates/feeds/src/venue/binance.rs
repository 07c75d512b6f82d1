use async_trait::async_trait;
use serde_json::Value;
use spread_core::{Symbol, Venue};
use tracing::debug;

use super::{Capabilities, MarketKind, VenueClient};
use crate::http::{field_f64, get_json};
use crate::FeedResult;

/// Binance spot and USDⓈ-M futures.
pub struct BinanceClient {
    http: reqwest::Client,
}

impl BinanceClient {
    const SPOT_URL: &'static str = "https://api.binance.com";
    const FUTURES_URL: &'static str = "https://fapi.binance.com";

    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// `{"symbol":"BTCUSDT","price":"60000.01"}`, same shape for spot and futures.
    pub fn parse_ticker(body: &Value) -> FeedResult<f64> {
        field_f64(body, "/price")
    }

    /// `{"symbol":"BTCUSDT","markPrice":"...","lastFundingRate":"0.00010000",...}`
    pub fn parse_funding_rate(body: &Value) -> FeedResult<f64> {
        field_f64(body, "/lastFundingRate")
    }
}

#[async_trait]
impl VenueClient for BinanceClient {
    fn venue(&self) -> Venue {
        Venue::Binance
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PERPETUALS
    }

    fn market_id(&self, symbol: &Symbol, _kind: MarketKind) -> FeedResult<String> {
        Ok(symbol.joined(""))
    }

    async fn fetch_ticker(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<f64> {
        let market = self.market_id(symbol, kind)?;
        let url = match kind {
            MarketKind::Spot => format!("{}/api/v3/ticker/price", Self::SPOT_URL),
            MarketKind::Swap => format!("{}/fapi/v1/ticker/price", Self::FUTURES_URL),
        };
        debug!("Binance: Fetching {:?} ticker {}", kind, market);

        let body = get_json(&self.http, &url, &[("symbol", market)]).await?;
        Self::parse_ticker(&body)
    }

    async fn fetch_funding_rate(&self, symbol: &Symbol) -> FeedResult<f64> {
        let market = self.market_id(symbol, MarketKind::Swap)?;
        let url = format!("{}/fapi/v1/premiumIndex", Self::FUTURES_URL);

        let body = get_json(&self.http, &url, &[("symbol", market)]).await?;
        Self::parse_funding_rate(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeedError;
    use serde_json::json;

    #[test]
    fn test_parse_ticker() {
        let body = json!({"symbol": "BTCUSDT", "price": "60123.45000000"});
        assert_eq!(BinanceClient::parse_ticker(&body).unwrap(), 60123.45);
    }

    #[test]
    fn test_parse_ticker_error_body() {
        let body = json!({"code": -1121, "msg": "Invalid symbol."});
        assert!(matches!(
            BinanceClient::parse_ticker(&body),
            Err(FeedError::MissingField(_))
        ));
    }

    #[test]
    fn test_parse_funding_rate() {
        let body = json!({
            "symbol": "BTCUSDT",
            "markPrice": "60100.10000000",
            "lastFundingRate": "0.00010000",
            "nextFundingTime": 1700000000000u64
        });
        assert_eq!(BinanceClient::parse_funding_rate(&body).unwrap(), 0.0001);
    }
}
