//! Spread analysis engine.
//!
//! Merges spot prices from exchanges and swap aggregators for one symbol and
//! finds the widest buy/sell spread between venues.

pub mod analyzer;

pub use analyzer::*;
