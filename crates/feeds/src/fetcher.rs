//! Venue fan-out: spot prices and perpetual quotes across all configured
//! exchanges.
//!
//! Requests for one symbol are issued to every venue at once and collected
//! back in venue-list order. A failing venue only affects its own entry.

use crate::venue::{MarketKind, VenueClient};
use crate::{FeedResult, FuturesSource, SpotSource};
use async_trait::async_trait;
use futures_util::future::join_all;
use spread_core::{FuturesBook, FuturesQuote, PriceBook, Symbol};
use std::sync::Arc;
use tracing::{debug, trace};

/// Last-traded spot price from every configured venue.
pub struct VenuePriceFetcher {
    clients: Vec<Arc<dyn VenueClient>>,
}

impl VenuePriceFetcher {
    pub fn new(clients: Vec<Arc<dyn VenueClient>>) -> Self {
        Self { clients }
    }

    /// Resolve the spot market, then fetch its ticker.
    async fn last_price(client: &dyn VenueClient, symbol: &Symbol) -> FeedResult<f64> {
        client.market_id(symbol, MarketKind::Spot)?;
        client.fetch_ticker(symbol, MarketKind::Spot).await
    }

    pub async fn fetch_prices(&self, symbol: &Symbol) -> PriceBook {
        let requests = self.clients.iter().map(|client| async move {
            let venue = client.venue();
            match Self::last_price(client.as_ref(), symbol).await {
                Ok(price) => (venue, Some(price)),
                Err(e) if e.is_unsupported() => {
                    trace!("{}: {} not listed: {}", venue, symbol, e);
                    (venue, None)
                }
                Err(e) => {
                    debug!("{}: No spot price for {}: {}", venue, symbol, e);
                    (venue, None)
                }
            }
        });

        join_all(requests)
            .await
            .into_iter()
            .map(|(venue, price)| (venue.as_str(), price))
            .collect()
    }
}

#[async_trait]
impl SpotSource for VenuePriceFetcher {
    async fn spot_prices(&self, symbol: &Symbol) -> PriceBook {
        self.fetch_prices(symbol).await
    }
}

/// Perpetual-swap price and funding rate from every configured venue.
pub struct FuturesFetcher {
    clients: Vec<Arc<dyn VenueClient>>,
}

impl FuturesFetcher {
    pub fn new(clients: Vec<Arc<dyn VenueClient>>) -> Self {
        Self { clients }
    }

    /// `Ok(None)` for venues without swap markets. A failed funding lookup
    /// leaves the funding rate empty but keeps the price.
    async fn perpetual_quote(
        client: &dyn VenueClient,
        symbol: &Symbol,
    ) -> FeedResult<Option<FuturesQuote>> {
        let caps = client.capabilities();
        if !caps.swap {
            return Ok(None);
        }

        client.market_id(symbol, MarketKind::Swap)?;
        let price = client.fetch_ticker(symbol, MarketKind::Swap).await?;

        let funding_rate = if caps.funding_rate {
            match client.fetch_funding_rate(symbol).await {
                Ok(rate) => Some(rate),
                Err(e) => {
                    debug!("{}: No funding rate for {}: {}", client.venue(), symbol, e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Some(FuturesQuote::new(price, funding_rate)))
    }

    pub async fn fetch_futures(&self, symbol: &Symbol) -> FuturesBook {
        let requests = self.clients.iter().map(|client| async move {
            let venue = client.venue();
            match Self::perpetual_quote(client.as_ref(), symbol).await {
                Ok(quote) => (venue, quote),
                Err(e) if e.is_unsupported() => {
                    trace!("{}: No perpetual market for {}: {}", venue, symbol, e);
                    (venue, None)
                }
                Err(e) => {
                    debug!("{}: No perpetual quote for {}: {}", venue, symbol, e);
                    (venue, None)
                }
            }
        });

        let mut book = FuturesBook::new();
        for (venue, quote) in join_all(requests).await {
            book.insert(venue.as_str(), quote);
        }
        book
    }
}

#[async_trait]
impl FuturesSource for FuturesFetcher {
    async fn futures(&self, symbol: &Symbol) -> FuturesBook {
        self.fetch_futures(symbol).await
    }
}
