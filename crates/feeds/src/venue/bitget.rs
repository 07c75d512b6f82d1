use async_trait::async_trait;
use serde_json::Value;
use spread_core::{Symbol, Venue};
use tracing::debug;

use super::{Capabilities, MarketKind, VenueClient};
use crate::http::{field_f64, first_item, get_json};
use crate::{FeedError, FeedResult};

/// Bitget API v2: spot and USDT/USDC-margined mix (futures) markets.
pub struct BitgetClient {
    http: reqwest::Client,
}

impl BitgetClient {
    const BASE_URL: &'static str = "https://api.bitget.com/api/v2";
    const OK: &'static str = "00000";

    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Mix product type for a quote currency.
    fn product_type(symbol: &Symbol) -> FeedResult<&'static str> {
        match symbol.quote().to_ascii_uppercase().as_str() {
            "USDT" => Ok("USDT-FUTURES"),
            "USDC" => Ok("USDC-FUTURES"),
            _ => Err(FeedError::UnsupportedMarket(symbol.to_string())),
        }
    }

    /// Envelope: `{"code":"00000","msg":"success","data":[{...}]}`
    fn entry<'a>(body: &'a Value, market: &str) -> FeedResult<&'a Value> {
        if body["code"].as_str() != Some(Self::OK) {
            return Err(FeedError::Api(body["msg"].to_string()));
        }
        first_item(body, "/data", market)
    }

    pub fn parse_ticker(body: &Value, market: &str) -> FeedResult<f64> {
        field_f64(Self::entry(body, market)?, "/lastPr")
    }

    pub fn parse_funding_rate(body: &Value, market: &str) -> FeedResult<f64> {
        field_f64(Self::entry(body, market)?, "/fundingRate")
    }
}

#[async_trait]
impl VenueClient for BitgetClient {
    fn venue(&self) -> Venue {
        Venue::Bitget
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PERPETUALS
    }

    fn market_id(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<String> {
        if kind == MarketKind::Swap {
            Self::product_type(symbol)?;
        }
        Ok(symbol.joined(""))
    }

    async fn fetch_ticker(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<f64> {
        let market = self.market_id(symbol, kind)?;
        debug!("Bitget: Fetching {:?} ticker {}", kind, market);

        let body = match kind {
            MarketKind::Spot => {
                let url = format!("{}/spot/market/tickers", Self::BASE_URL);
                get_json(&self.http, &url, &[("symbol", market.clone())]).await?
            }
            MarketKind::Swap => {
                let url = format!("{}/mix/market/ticker", Self::BASE_URL);
                let query = [
                    ("symbol", market.clone()),
                    ("productType", Self::product_type(symbol)?.to_string()),
                ];
                get_json(&self.http, &url, &query).await?
            }
        };
        Self::parse_ticker(&body, &market)
    }

    async fn fetch_funding_rate(&self, symbol: &Symbol) -> FeedResult<f64> {
        let market = self.market_id(symbol, MarketKind::Swap)?;
        let url = format!("{}/mix/market/current-fund-rate", Self::BASE_URL);
        let query = [
            ("symbol", market.clone()),
            ("productType", Self::product_type(symbol)?.to_string()),
        ];

        let body = get_json(&self.http, &url, &query).await?;
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
            "code": "00000",
            "msg": "success",
            "data": [{"symbol": "BTCUSDT", "lastPr": "60450.1", "bidPr": "60450"}]
        });
        assert_eq!(BitgetClient::parse_ticker(&body, "BTCUSDT").unwrap(), 60450.1);
    }

    #[test]
    fn test_parse_funding_rate() {
        let body = json!({
            "code": "00000",
            "msg": "success",
            "data": [{"symbol": "BTCUSDT", "fundingRate": "0.000068"}]
        });
        assert_eq!(BitgetClient::parse_funding_rate(&body, "BTCUSDT").unwrap(), 0.000068);
    }

    #[test]
    fn test_parse_error_code() {
        let body = json!({"code": "40034", "msg": "Parameter does not exist", "data": null});
        assert!(matches!(
            BitgetClient::parse_ticker(&body, "FOOUSDT"),
            Err(FeedError::Api(_))
        ));
    }

    #[test]
    fn test_swap_product_type() {
        let client = BitgetClient::new(reqwest::Client::new());
        assert!(client.market_id(&Symbol::new("SOL", "USDC"), MarketKind::Swap).is_ok());
        assert!(client
            .market_id(&Symbol::new("ETH", "BTC"), MarketKind::Swap)
            .unwrap_err()
            .is_unsupported());
    }
}
