//! Price source traits consumed by the spread analyzer.
//!
//! Sources never fail: every error is absorbed at the source and shows up as
//! a missing price.

use crate::Listing;
use async_trait::async_trait;
use spread_core::{FuturesBook, PriceBook, Symbol};

/// Last-traded spot prices from a fixed list of venues.
#[async_trait]
pub trait SpotSource: Send + Sync {
    /// One entry per venue, in venue-list order.
    async fn spot_prices(&self, symbol: &Symbol) -> PriceBook;
}

/// A swap aggregator quoting a unit price for a pair.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Key used for this source in the price book.
    fn name(&self) -> &str;

    /// Whether an unquoted result still gets a book entry.
    fn listing(&self) -> Listing;

    /// Unit price of `amount` base tokens, or `None` if the pair is not listed
    /// or the request failed.
    async fn quote_price(&self, symbol: &Symbol, amount: f64) -> Option<f64>;
}

/// Perpetual prices and funding rates from a fixed list of venues.
#[async_trait]
pub trait FuturesSource: Send + Sync {
    /// One entry per venue, `None` where swaps are unsupported or failed.
    async fn futures(&self, symbol: &Symbol) -> FuturesBook;
}
