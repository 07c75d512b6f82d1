//! REST market-data clients for centralized exchanges.
//!
//! Each venue exposes the same four operations: resolve a market id, fetch a
//! spot or perpetual ticker, and fetch the current funding rate. Response
//! parsing lives in plain functions over `serde_json::Value` so it can be
//! tested on captured bodies.

mod binance;
mod bingx;
mod bitget;
mod bitmart;
mod bybit;
mod coinex;
mod gate;
mod huobi;
mod kucoin;
mod mexc;

pub use binance::BinanceClient;
pub use bingx::BingxClient;
pub use bitget::BitgetClient;
pub use bitmart::BitmartClient;
pub use bybit::BybitClient;
pub use coinex::CoinexClient;
pub use gate::GateClient;
pub use huobi::HuobiClient;
pub use kucoin::KucoinClient;
pub use mexc::MexcClient;

use crate::{FeedError, FeedResult};
use async_trait::async_trait;
use spread_core::{Symbol, Venue};
use std::sync::Arc;

/// Which market a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketKind {
    Spot,
    /// Linear perpetual swap.
    Swap,
}

/// Optional features a venue client supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Perpetual swap markets are available.
    pub swap: bool,
    /// Current funding rate can be queried.
    pub funding_rate: bool,
}

impl Capabilities {
    pub const SPOT_ONLY: Self = Self {
        swap: false,
        funding_rate: false,
    };

    pub const PERPETUALS: Self = Self {
        swap: true,
        funding_rate: true,
    };
}

/// Market-data client for one centralized exchange.
#[async_trait]
pub trait VenueClient: Send + Sync {
    /// Venue identifier.
    fn venue(&self) -> Venue;

    fn capabilities(&self) -> Capabilities;

    /// Venue-native market id for a symbol, e.g. `BTCUSDT` or `BTC-USDT`.
    fn market_id(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<String>;

    /// Last traded price.
    async fn fetch_ticker(&self, symbol: &Symbol, kind: MarketKind) -> FeedResult<f64>;

    /// Current funding rate of the perpetual market.
    async fn fetch_funding_rate(&self, _symbol: &Symbol) -> FeedResult<f64> {
        Err(FeedError::Unsupported(self.venue().to_string()))
    }
}

/// Build the client for a venue. Clients share one HTTP connection pool.
pub fn client_for(venue: Venue, http: reqwest::Client) -> Arc<dyn VenueClient> {
    match venue {
        Venue::Binance => Arc::new(BinanceClient::new(http)),
        Venue::Bybit => Arc::new(BybitClient::new(http)),
        Venue::Mexc => Arc::new(MexcClient::new(http)),
        Venue::Kucoin => Arc::new(KucoinClient::new(http)),
        Venue::Gate => Arc::new(GateClient::new(http)),
        Venue::Coinex => Arc::new(CoinexClient::new(http)),
        Venue::Huobi => Arc::new(HuobiClient::new(http)),
        Venue::Bitget => Arc::new(BitgetClient::new(http)),
        Venue::Bingx => Arc::new(BingxClient::new(http)),
        Venue::Bitmart => Arc::new(BitmartClient::new(http)),
    }
}

/// Build clients for a venue list, keeping its order.
pub fn build_clients(venues: &[Venue], http: &reqwest::Client) -> Vec<Arc<dyn VenueClient>> {
    venues
        .iter()
        .map(|&venue| client_for(venue, http.clone()))
        .collect()
}

/// Error for a swap request against a spot-only client.
pub(crate) fn no_swap(venue: Venue) -> FeedError {
    FeedError::Unsupported(format!("{venue} perpetual swaps"))
}
