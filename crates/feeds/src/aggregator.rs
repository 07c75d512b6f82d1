//! DEX swap-aggregator quotes (1inch on Ethereum, Jupiter on Solana).
//!
//! Both aggregators take the same request shape: input token, output token
//! and an integer input amount in the input token's smallest unit. They answer
//! with the integer output amount, which is converted back into a unit price.

use crate::http::{field, get_json};
use crate::{FeedError, FeedResult, QuoteSource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spread_core::{from_base_units, to_base_units, Symbol, TokenTable};
use tracing::debug;

/// Whether an aggregator's entry is added to the price book when it returns
/// no quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Listing {
    /// Always add the entry, empty if unquoted.
    #[default]
    Always,
    /// Add the entry only when a price came back.
    WhenQuoted,
}

/// Static description of one aggregator endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Price book key.
    pub name: String,
    /// Quote endpoint URL.
    pub endpoint: String,
    /// Query parameter carrying the input token.
    pub input_param: String,
    /// Query parameter carrying the output token.
    pub output_param: String,
    /// Query parameter carrying the integer input amount.
    pub amount_param: String,
    /// Response field holding the integer output amount.
    pub output_field: String,
    #[serde(default)]
    pub listing: Listing,
    pub tokens: TokenTable,
}

impl AggregatorConfig {
    /// 1inch v5 quote API on Ethereum mainnet.
    pub fn one_inch() -> Self {
        Self {
            name: "1inch".to_string(),
            endpoint: "https://api.1inch.io/v5.0/1/quote".to_string(),
            input_param: "fromTokenAddress".to_string(),
            output_param: "toTokenAddress".to_string(),
            amount_param: "amount".to_string(),
            output_field: "toTokenAmount".to_string(),
            listing: Listing::Always,
            tokens: TokenTable::ethereum_mainnet(),
        }
    }

    /// Jupiter v6 quote API on Solana.
    pub fn jupiter() -> Self {
        Self {
            name: "jupiter".to_string(),
            endpoint: "https://quote-api.jup.ag/v6/quote".to_string(),
            input_param: "inputMint".to_string(),
            output_param: "outputMint".to_string(),
            amount_param: "amount".to_string(),
            output_field: "outAmount".to_string(),
            listing: Listing::WhenQuoted,
            tokens: TokenTable::solana(),
        }
    }
}

/// A resolved quote request for one pair and amount.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub input: String,
    pub output: String,
    /// Input amount in the base token's smallest unit.
    pub raw_amount: u128,
    /// Human amount the price is normalised by.
    pub amount: f64,
    pub quote_decimals: u8,
}

impl QuoteRequest {
    /// Unit price from the aggregator's integer output amount.
    pub fn unit_price(&self, raw_out: u128) -> f64 {
        from_base_units(raw_out, self.quote_decimals) / self.amount
    }
}

/// Parse an integer output amount. Aggregators send it as a decimal string;
/// plain JSON integers are accepted too.
pub fn parse_out_amount(body: &Value, output_field: &str) -> FeedResult<u128> {
    let raw = field(body, &format!("/{output_field}"))?;
    let parsed = match raw {
        Value::String(s) => s.trim().parse::<u128>().ok(),
        Value::Number(n) => n.as_u64().map(u128::from),
        _ => None,
    };
    parsed.ok_or_else(|| FeedError::Parse(format!("{output_field} is not an integer: {raw}")))
}

/// Quote client for one aggregator.
pub struct AggregatorClient {
    config: AggregatorConfig,
    http: reqwest::Client,
}

impl AggregatorClient {
    pub fn new(config: AggregatorConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Build the request for `amount` base tokens. `None` when either leg is
    /// not in this aggregator's token table or the amount is not positive.
    pub fn quote_request(&self, symbol: &Symbol, amount: f64) -> Option<QuoteRequest> {
        if !(amount.is_finite() && amount > 0.0) {
            return None;
        }
        let (base, quote) = self.config.tokens.resolve(symbol)?;
        Some(QuoteRequest {
            input: base.address.clone(),
            output: quote.address.clone(),
            raw_amount: to_base_units(amount, base.decimals),
            amount,
            quote_decimals: quote.decimals,
        })
    }

    /// Send a resolved request and return the raw output amount.
    pub async fn fetch_out_amount(&self, request: &QuoteRequest) -> FeedResult<u128> {
        let query = [
            (self.config.input_param.as_str(), request.input.clone()),
            (self.config.output_param.as_str(), request.output.clone()),
            (self.config.amount_param.as_str(), request.raw_amount.to_string()),
        ];
        let body = get_json(&self.http, &self.config.endpoint, &query).await?;
        parse_out_amount(&body, &self.config.output_field)
    }
}

#[async_trait]
impl QuoteSource for AggregatorClient {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn listing(&self) -> Listing {
        self.config.listing
    }

    async fn quote_price(&self, symbol: &Symbol, amount: f64) -> Option<f64> {
        let Some(request) = self.quote_request(symbol, amount) else {
            debug!("{}: {} not quotable", self.config.name, symbol);
            return None;
        };

        match self.fetch_out_amount(&request).await {
            Ok(raw_out) => Some(request.unit_price(raw_out)),
            Err(e) => {
                debug!("{}: Quote for {} failed: {}", self.config.name, symbol, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client(config: AggregatorConfig) -> AggregatorClient {
        AggregatorClient::new(config, reqwest::Client::new())
    }

    #[test]
    fn test_one_inch_request() {
        let agg = client(AggregatorConfig::one_inch());
        let request = agg.quote_request(&Symbol::new("BTC", "USDT"), 1.0).unwrap();

        assert_eq!(request.input, "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599");
        assert_eq!(request.output, "0xdAC17F958D2ee523a2206206994597C13D831ec7");
        assert_eq!(request.raw_amount, 100_000_000);
        assert_eq!(request.quote_decimals, 6);
    }

    #[test]
    fn test_jupiter_request_with_amount() {
        let agg = client(AggregatorConfig::jupiter());
        let request = agg.quote_request(&Symbol::new("SOL", "USDC"), 2.5).unwrap();

        assert_eq!(request.raw_amount, 2_500_000_000);
        // 2.5 SOL -> 375 USDC
        assert_eq!(request.unit_price(375_000_000), 150.0);
    }

    #[test]
    fn test_lower_case_symbol_resolves_like_exchanges() {
        let agg = client(AggregatorConfig::one_inch());
        let symbol = Symbol::parse("btc/usdt").unwrap();

        assert_eq!(symbol.joined(""), "BTCUSDT");
        assert_eq!(
            agg.quote_request(&symbol, 1.0),
            agg.quote_request(&Symbol::new("BTC", "USDT"), 1.0)
        );
        assert!(agg.quote_request(&symbol, 1.0).is_some());
    }

    #[test]
    fn test_unsupported_pair_is_none() {
        let one_inch = client(AggregatorConfig::one_inch());
        assert!(one_inch.quote_request(&Symbol::new("SOL", "USDC"), 1.0).is_none());
        assert!(one_inch.quote_request(&Symbol::new("BTC", "DAI"), 1.0).is_none());

        let jupiter = client(AggregatorConfig::jupiter());
        assert!(jupiter.quote_request(&Symbol::new("BTC", "USDT"), 1.0).is_none());
    }

    #[tokio::test]
    async fn test_unsupported_pair_skips_network() {
        let jupiter = client(AggregatorConfig::jupiter());
        assert_eq!(jupiter.quote_price(&Symbol::new("ETH", "USDT"), 1.0).await, None);
    }

    #[test]
    fn test_non_positive_amount_is_none() {
        let agg = client(AggregatorConfig::one_inch());
        let symbol = Symbol::new("ETH", "USDT");
        assert!(agg.quote_request(&symbol, 0.0).is_none());
        assert!(agg.quote_request(&symbol, -1.0).is_none());
        assert!(agg.quote_request(&symbol, f64::NAN).is_none());
    }

    #[test]
    fn test_parse_out_amount() {
        let one_inch = json!({"fromToken": {}, "toToken": {}, "toTokenAmount": "3012450000"});
        assert_eq!(parse_out_amount(&one_inch, "toTokenAmount").unwrap(), 3_012_450_000);

        let jupiter = json!({"inAmount": "1000000000", "outAmount": 150123456});
        assert_eq!(parse_out_amount(&jupiter, "outAmount").unwrap(), 150_123_456);
    }

    #[test]
    fn test_parse_out_amount_errors() {
        let missing = json!({"error": "No routes found"});
        assert!(matches!(
            parse_out_amount(&missing, "outAmount"),
            Err(FeedError::MissingField(_))
        ));

        let fractional = json!({"outAmount": "12.5"});
        assert!(matches!(
            parse_out_amount(&fractional, "outAmount"),
            Err(FeedError::Parse(_))
        ));
    }

    /// Local HTTP endpoint answering every request with `response`, after
    /// `delay`.
    async fn serve(response: String, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let response = response.clone();
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    tokio::time::sleep(delay).await;
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{addr}/v6/quote")
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn local_jupiter(endpoint: String) -> AggregatorClient {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(300))
            .no_proxy()
            .build()
            .unwrap();
        AggregatorClient::new(
            AggregatorConfig {
                endpoint,
                ..AggregatorConfig::jupiter()
            },
            http,
        )
    }

    #[tokio::test]
    async fn test_quote_over_http() {
        let endpoint = serve(
            http_response("200 OK", r#"{"outAmount":"150000000"}"#),
            Duration::ZERO,
        )
        .await;
        let jupiter = local_jupiter(endpoint);

        let price = jupiter.quote_price(&Symbol::new("SOL", "USDC"), 1.0).await;
        assert_eq!(price, Some(150.0));
    }

    #[tokio::test]
    async fn test_server_error_is_none() {
        let endpoint = serve(
            http_response("500 Internal Server Error", r#"{"error":"internal"}"#),
            Duration::ZERO,
        )
        .await;
        let jupiter = local_jupiter(endpoint);
        let symbol = Symbol::new("SOL", "USDC");

        let request = jupiter.quote_request(&symbol, 1.0).unwrap();
        assert!(matches!(
            jupiter.fetch_out_amount(&request).await,
            Err(FeedError::Status(500))
        ));
        assert_eq!(jupiter.quote_price(&symbol, 1.0).await, None);
    }

    #[tokio::test]
    async fn test_body_without_amount_is_none() {
        let endpoint = serve(
            http_response("200 OK", r#"{"error":"No routes found"}"#),
            Duration::ZERO,
        )
        .await;
        let jupiter = local_jupiter(endpoint);

        assert_eq!(jupiter.quote_price(&Symbol::new("SOL", "USDC"), 1.0).await, None);
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out() {
        let endpoint = serve(
            http_response("200 OK", r#"{"outAmount":"150000000"}"#),
            Duration::from_secs(5),
        )
        .await;
        let jupiter = local_jupiter(endpoint);
        let symbol = Symbol::new("SOL", "USDC");

        let request = jupiter.quote_request(&symbol, 1.0).unwrap();
        let err = jupiter.fetch_out_amount(&request).await.unwrap_err();
        assert!(err.is_timeout(), "{err}");
        assert_eq!(jupiter.quote_price(&symbol, 1.0).await, None);
    }

    #[test]
    fn test_listing_defaults() {
        assert_eq!(AggregatorConfig::one_inch().listing, Listing::Always);
        assert_eq!(AggregatorConfig::jupiter().listing, Listing::WhenQuoted);

        let parsed: Listing = serde_json::from_str("\"when_quoted\"").unwrap();
        assert_eq!(parsed, Listing::WhenQuoted);
    }
}
