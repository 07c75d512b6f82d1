//! Price collection from centralized exchanges and DEX aggregators.
//!
//! ## Architecture
//!
//! - `venue/` - Exchange-specific REST clients (market ids, tickers, funding)
//! - `fetcher` - Fan-out over all venues for spot prices and perpetual quotes
//! - `aggregator` - 1inch / Jupiter swap-quote client
//! - `source` - Source traits the analyzer is written against

pub mod aggregator;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod source;
pub mod venue;

pub use aggregator::*;
pub use error::*;
pub use fetcher::*;
pub use http::{build_client, DEFAULT_TIMEOUT};
pub use source::*;
pub use venue::{build_clients, client_for, Capabilities, MarketKind, VenueClient};
