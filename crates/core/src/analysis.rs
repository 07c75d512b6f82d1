//! Spread computation over a set of venue prices.

use crate::{FuturesQuote, VenueName};
use serde::{Deserialize, Serialize};

/// Relative spread `(sell - buy) / buy`. Zero when `buy` is zero.
pub fn spread_ratio(buy: f64, sell: f64) -> f64 {
    if buy == 0.0 {
        return 0.0;
    }
    (sell - buy) / buy
}

/// Cheapest and most expensive venue among a set of prices.
#[derive(Debug, Clone, PartialEq)]
pub struct BestQuotes {
    pub buy_venue: VenueName,
    pub buy_price: f64,
    pub sell_venue: VenueName,
    pub sell_price: f64,
}

impl BestQuotes {
    /// Scan prices in order. On equal prices the first venue seen wins, for
    /// both the minimum and the maximum.
    pub fn find<'a, I>(prices: I) -> Option<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut iter = prices.into_iter();
        let (first_venue, first_price) = iter.next()?;
        let (mut buy_venue, mut buy_price) = (first_venue, first_price);
        let (mut sell_venue, mut sell_price) = (first_venue, first_price);

        for (venue, price) in iter {
            if price < buy_price {
                buy_venue = venue;
                buy_price = price;
            }
            if price > sell_price {
                sell_venue = venue;
                sell_price = price;
            }
        }

        Some(Self {
            buy_venue: VenueName::new(buy_venue),
            buy_price,
            sell_venue: VenueName::new(sell_venue),
            sell_price,
        })
    }

    pub fn spread(&self) -> f64 {
        spread_ratio(self.buy_price, self.sell_price)
    }
}

/// Result of analysing one symbol across all venues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadAnalysis {
    pub buy_venue: VenueName,
    pub buy_price: f64,
    pub sell_venue: VenueName,
    pub sell_price: f64,
    /// Every venue that produced a price, in collection order.
    pub all_prices: Vec<(VenueName, f64)>,
    /// Relative spread as a fraction (0.01 == 1%).
    pub spread: f64,
    /// Perpetual quotes for venues that support them.
    pub futures: Vec<(VenueName, FuturesQuote)>,
}

impl SpreadAnalysis {
    /// Build an analysis from priced venues. Returns `None` when `all_prices`
    /// is empty.
    pub fn from_prices(
        all_prices: Vec<(VenueName, f64)>,
        futures: Vec<(VenueName, FuturesQuote)>,
    ) -> Option<Self> {
        let best = BestQuotes::find(all_prices.iter().map(|(name, p)| (name.as_str(), *p)))?;
        let spread = best.spread();
        Some(Self {
            buy_venue: best.buy_venue,
            buy_price: best.buy_price,
            sell_venue: best.sell_venue,
            sell_price: best.sell_price,
            all_prices,
            spread,
            futures,
        })
    }

    /// Spread in percent.
    pub fn spread_pct(&self) -> f64 {
        self.spread * 100.0
    }

    /// Whether the spread meets or exceeds `threshold` (a fraction).
    pub fn meets(&self, threshold: f64) -> bool {
        self.spread >= threshold
    }

    /// Prices sorted ascending. Equal prices keep collection order.
    pub fn prices_ascending(&self) -> Vec<(&str, f64)> {
        let mut sorted: Vec<(&str, f64)> = self
            .all_prices
            .iter()
            .map(|(name, price)| (name.as_str(), *price))
            .collect();
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn prices(raw: &[(&str, f64)]) -> Vec<(VenueName, f64)> {
        raw.iter().map(|(n, p)| (VenueName::new(n), *p)).collect()
    }

    #[test]
    fn test_spread_ratio() {
        assert_eq!(spread_ratio(60000.0, 60600.0), 0.01);
        assert_eq!(spread_ratio(100.0, 100.0), 0.0);
        assert_eq!(spread_ratio(0.0, 5.0), 0.0);
    }

    #[test]
    fn test_best_quotes_min_and_max() {
        let best = BestQuotes::find(vec![("a", 101.0), ("b", 99.0), ("c", 103.0)]).unwrap();
        assert_eq!(best.buy_venue, "b");
        assert_eq!(best.buy_price, 99.0);
        assert_eq!(best.sell_venue, "c");
        assert_eq!(best.sell_price, 103.0);
    }

    #[test]
    fn test_best_quotes_first_occurrence_wins_ties() {
        let best =
            BestQuotes::find(vec![("a", 100.0), ("b", 100.0), ("c", 105.0), ("d", 105.0)])
                .unwrap();
        assert_eq!(best.buy_venue, "a");
        assert_eq!(best.sell_venue, "c");

        let flat = BestQuotes::find(vec![("x", 7.0), ("y", 7.0)]).unwrap();
        assert_eq!(flat.buy_venue, "x");
        assert_eq!(flat.sell_venue, "x");
        assert_eq!(flat.spread(), 0.0);
    }

    #[test]
    fn test_best_quotes_empty() {
        assert!(BestQuotes::find(Vec::<(&str, f64)>::new()).is_none());
    }

    #[test]
    fn test_analysis_invariants() {
        let analysis = SpreadAnalysis::from_prices(
            prices(&[("binance", 60300.0), ("bybit", 60000.0), ("mexc", 60600.0)]),
            Vec::new(),
        )
        .unwrap();

        assert!(analysis.buy_price <= analysis.sell_price);
        assert_eq!(
            analysis.spread,
            (analysis.sell_price - analysis.buy_price) / analysis.buy_price
        );
        assert!(analysis.meets(0.01));
        assert!(!analysis.meets(0.015));
    }

    #[test]
    fn test_analysis_zero_buy_price() {
        let analysis =
            SpreadAnalysis::from_prices(prices(&[("a", 0.0), ("b", 10.0)]), Vec::new()).unwrap();
        assert_eq!(analysis.buy_venue, "a");
        assert_eq!(analysis.spread, 0.0);
    }

    #[test]
    fn test_prices_ascending_is_stable() {
        let analysis = SpreadAnalysis::from_prices(
            prices(&[("c", 3.0), ("a", 1.0), ("b", 3.0), ("d", 2.0)]),
            Vec::new(),
        )
        .unwrap();

        assert_eq!(
            analysis.prices_ascending(),
            vec![("a", 1.0), ("d", 2.0), ("c", 3.0), ("b", 3.0)]
        );
    }

    #[test]
    fn test_from_prices_empty() {
        assert!(SpreadAnalysis::from_prices(Vec::new(), Vec::new()).is_none());
    }
}
