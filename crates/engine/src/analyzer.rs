//! Cross-venue spread analyzer.
//!
//! For one symbol: collect exchange spot prices, add aggregator quotes under
//! their own names, pick the cheapest and dearest venue, then attach
//! perpetual quotes. Venues that failed are simply absent.

use async_trait::async_trait;
use futures_util::future::join_all;
use spread_core::{PriceBook, SpreadAnalysis, Symbol};
use spread_feeds::{FuturesSource, Listing, QuoteSource, SpotSource};
use std::sync::Arc;
use tracing::debug;

/// Anything that can turn a symbol into a spread analysis.
#[async_trait]
pub trait SymbolAnalyzer: Send + Sync {
    /// `None` when no venue produced a price.
    async fn analyze(&self, symbol: &Symbol) -> Option<SpreadAnalysis>;
}

/// Analyzer over exchange, aggregator and futures sources.
pub struct SpreadAnalyzer {
    spot: Arc<dyn SpotSource>,
    aggregators: Vec<Arc<dyn QuoteSource>>,
    futures: Arc<dyn FuturesSource>,
    trade_amount: f64,
}

impl SpreadAnalyzer {
    /// Base-asset amount quoted on aggregators unless configured otherwise.
    pub const DEFAULT_TRADE_AMOUNT: f64 = 1.0;

    pub fn new(spot: Arc<dyn SpotSource>, futures: Arc<dyn FuturesSource>) -> Self {
        Self {
            spot,
            aggregators: Vec::new(),
            futures,
            trade_amount: Self::DEFAULT_TRADE_AMOUNT,
        }
    }

    /// Add an aggregator. Aggregators are merged in registration order.
    pub fn with_aggregator(mut self, aggregator: Arc<dyn QuoteSource>) -> Self {
        self.aggregators.push(aggregator);
        self
    }

    pub fn with_trade_amount(mut self, amount: f64) -> Self {
        self.trade_amount = amount;
        self
    }

    /// Exchange prices followed by aggregator quotes.
    pub async fn collect_prices(&self, symbol: &Symbol) -> PriceBook {
        let mut book = self.spot.spot_prices(symbol).await;

        let quotes = join_all(
            self.aggregators
                .iter()
                .map(|agg| agg.quote_price(symbol, self.trade_amount)),
        )
        .await;

        for (agg, price) in self.aggregators.iter().zip(quotes) {
            match (price, agg.listing()) {
                (Some(price), _) => book.insert(agg.name(), Some(price)),
                (None, Listing::Always) => book.insert(agg.name(), None),
                (None, Listing::WhenQuoted) => {}
            }
        }

        book
    }

    pub async fn analyze_symbol(&self, symbol: &Symbol) -> Option<SpreadAnalysis> {
        let book = self.collect_prices(symbol).await;
        debug!(
            "{}: {} of {} venues priced",
            symbol,
            book.quoted_count(),
            book.len()
        );

        let all_prices = book.into_quoted();
        if all_prices.is_empty() {
            return None;
        }

        let futures = self.futures.futures(symbol).await.into_available();
        SpreadAnalysis::from_prices(all_prices, futures)
    }
}

#[async_trait]
impl SymbolAnalyzer for SpreadAnalyzer {
    async fn analyze(&self, symbol: &Symbol) -> Option<SpreadAnalysis> {
        self.analyze_symbol(symbol).await
    }
}
