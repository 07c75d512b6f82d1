//! Per-venue price observations.
//!
//! Both books keep insertion order: the spread analyzer relies on it to break
//! ties between equal prices deterministically.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Venue key in a book. Exchanges use their lowercase id, aggregators their
/// configured name (`1inch`, `jupiter`).
pub type VenueName = CompactString;

/// Ordered mapping of venue name to an optional last price.
///
/// A `None` entry records that the venue was asked and returned nothing usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBook {
    entries: Vec<(VenueName, Option<f64>)>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a venue's price. Non-finite values are stored as missing.
    /// Re-inserting an existing venue overwrites it in place.
    pub fn insert(&mut self, venue: impl Into<VenueName>, price: Option<f64>) {
        let venue = venue.into();
        let price = price.filter(|p| p.is_finite());
        match self.entries.iter_mut().find(|(name, _)| *name == venue) {
            Some(entry) => entry.1 = price,
            None => self.entries.push((venue, price)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(name, price)| (name.as_str(), *price))
    }

    /// Priced entries only, in insertion order.
    pub fn quoted(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .filter_map(|(name, price)| price.map(|p| (name.as_str(), p)))
    }

    pub fn quoted_count(&self) -> usize {
        self.quoted().count()
    }

    pub fn into_quoted(self) -> Vec<(VenueName, f64)> {
        self.entries
            .into_iter()
            .filter_map(|(name, price)| price.map(|p| (name, p)))
            .collect()
    }
}

impl<N: Into<VenueName>> FromIterator<(N, Option<f64>)> for PriceBook {
    fn from_iter<I: IntoIterator<Item = (N, Option<f64>)>>(iter: I) -> Self {
        let mut book = PriceBook::new();
        for (venue, price) in iter {
            book.insert(venue, price);
        }
        book
    }
}

/// Perpetual-swap observation for one venue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuturesQuote {
    /// Last traded swap price.
    pub price: f64,
    /// Current funding rate, if the venue exposes one and it was fetched.
    pub funding_rate: Option<f64>,
}

impl FuturesQuote {
    pub fn new(price: f64, funding_rate: Option<f64>) -> Self {
        Self {
            price,
            funding_rate,
        }
    }
}

/// Ordered mapping of venue name to an optional perpetual quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuturesBook {
    entries: Vec<(VenueName, Option<FuturesQuote>)>,
}

impl FuturesBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, venue: impl Into<VenueName>, quote: Option<FuturesQuote>) {
        let venue = venue.into();
        let quote = quote.filter(|q| q.price.is_finite());
        match self.entries.iter_mut().find(|(name, _)| *name == venue) {
            Some(entry) => entry.1 = quote,
            None => self.entries.push((venue, quote)),
        }
    }

    /// Venues with a quote, in insertion order. Unsupported or failed venues
    /// are dropped.
    pub fn into_available(self) -> Vec<(VenueName, FuturesQuote)> {
        self.entries
            .into_iter()
            .filter_map(|(name, quote)| quote.map(|q| (name, q)))
            .collect()
    }
}
