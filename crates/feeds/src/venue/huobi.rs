use async_trait::async_trait;
use serde_json::Value;
use spread_core::{Symbol, Venue};
use tracing::debug;

use super::{Capabilities, MarketKind, VenueClient};
use crate::http::{field_f64, get_json};
use crate::{FeedError, FeedResult};

/// Huobi (HTX) spot and USDT-margined linear swaps.
pub struct HuobiClient {
    http: reqwest::Client,
}

impl HuobiClient {
    const SPOT_URL: &'static str = "https://api.huobi.pro";
    const SWAP_URL: &'static str = "https://api.hbdm.com";

    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Both APIs wrap payloads as `{"status":"ok",...}` or
    /// `{"status":"error","err-msg":"..."}`.
    fn check(body: &Value) -> FeedResult<()> {
        match body["status"].as_str() {
            Some("ok") => Ok(()),
            _ => Err(FeedError::Api(body["err-msg"].to_string())),
        }
    }

    /// Merged market detail: `{"status":"ok","tick":{"close":60000.1,...}}`.
    /// Spot sends numbers, linear swap sends strings.
    pub fn parse_ticker(body: &Value) -> FeedResult<f64> {
        Self::check(body)?;
        field_f64(body, "/tick/close")
    }

    /// `{"status":"ok","data":{"contract_code":"BTC-USDT","funding_rate":"0.0001",...}}`
    pub fn parse_funding_rate(body: &Value) -> FeedResult<f64> {
        Self::check(body)?;
        field_f64(body, "/data/funding_rate")
    }
}

#[async_trait]
impl VenueClient for HuobiClient {
    fn venue(&self) -> Venue {
        Venue::Huobi
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PERPETUALS
    }

    fn market_id(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<String> {
        Ok(match kind {
            MarketKind::Spot => symbol.joined("").to_lowercase(),
            MarketKind::Swap => symbol.joined("-"),
        })
    }

    async fn fetch_ticker(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<f64> {
        let market = self.market_id(symbol, kind)?;
        debug!("Huobi: Fetching {:?} ticker {}", kind, market);

        let body = match kind {
            MarketKind::Spot => {
                let url = format!("{}/market/detail/merged", Self::SPOT_URL);
                get_json(&self.http, &url, &[("symbol", market)]).await?
            }
            MarketKind::Swap => {
                let url = format!("{}/linear-swap-ex/market/detail/merged", Self::SWAP_URL);
                get_json(&self.http, &url, &[("contract_code", market)]).await?
            }
        };
        Self::parse_ticker(&body)
    }

    async fn fetch_funding_rate(&self, symbol: &Symbol) -> FeedResult<f64> {
        let market = self.market_id(symbol, MarketKind::Swap)?;
        let url = format!("{}/linear-swap-api/v1/swap_funding_rate", Self::SWAP_URL);

        let body = get_json(&self.http, &url, &[("contract_code", market)]).await?;
        Self::parse_funding_rate(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_spot_ticker() {
        let body = json!({"ch": "market.btcusdt.detail.merged", "status": "ok", "tick": {"close": 60111.0}});
        assert_eq!(HuobiClient::parse_ticker(&body).unwrap(), 60111.0);
    }

    #[test]
    fn test_parse_swap_ticker_string_close() {
        let body = json!({"status": "ok", "tick": {"close": "60120.5", "vol": "100"}});
        assert_eq!(HuobiClient::parse_ticker(&body).unwrap(), 60120.5);
    }

    #[test]
    fn test_parse_error_status() {
        let body = json!({"status": "error", "err-code": "invalid-parameter", "err-msg": "invalid symbol"});
        assert!(matches!(
            HuobiClient::parse_ticker(&body),
            Err(FeedError::Api(_))
        ));
    }

    #[test]
    fn test_parse_funding_rate() {
        let body = json!({
            "status": "ok",
            "data": {"contract_code": "BTC-USDT", "funding_rate": "0.000100000000000000"}
        });
        assert_eq!(HuobiClient::parse_funding_rate(&body).unwrap(), 0.0001);
    }
}
