//! Centralized exchange identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Centralized exchange polled for spot and perpetual prices.
///
/// The lowercase id doubles as the venue's key in price books and reports.
/// Deserialization goes through [`Venue::from_id`], so aliases are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Venue {
    Binance,
    Bybit,
    Mexc,
    Kucoin,
    Gate,
    Coinex,
    Huobi,
    Bitget,
    Bingx,
    Bitmart,
}

impl Venue {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_ascii_lowercase().as_str() {
            "binance" => Some(Venue::Binance),
            "bybit" => Some(Venue::Bybit),
            "mexc" => Some(Venue::Mexc),
            "kucoin" => Some(Venue::Kucoin),
            "gate" | "gateio" => Some(Venue::Gate),
            "coinex" => Some(Venue::Coinex),
            "huobi" | "htx" => Some(Venue::Huobi),
            "bitget" => Some(Venue::Bitget),
            "bingx" => Some(Venue::Bingx),
            "bitmart" => Some(Venue::Bitmart),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Venue::Binance => "binance",
            Venue::Bybit => "bybit",
            Venue::Mexc => "mexc",
            Venue::Kucoin => "kucoin",
            Venue::Gate => "gate",
            Venue::Coinex => "coinex",
            Venue::Huobi => "huobi",
            Venue::Bitget => "bitget",
            Venue::Bingx => "bingx",
            Venue::Bitmart => "bitmart",
        }
    }

    /// Default polling order.
    pub fn all() -> &'static [Venue] {
        &[
            Venue::Binance,
            Venue::Bybit,
            Venue::Mexc,
            Venue::Kucoin,
            Venue::Gate,
            Venue::Coinex,
            Venue::Huobi,
            Venue::Bitget,
            Venue::Bingx,
            Venue::Bitmart,
        ]
    }
}

impl TryFrom<String> for Venue {
    type Error = String;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::from_id(&id).ok_or_else(|| format!("unknown venue {id:?}"))
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_from_id() {
        assert_eq!(Venue::from_id("binance"), Some(Venue::Binance));
        assert_eq!(Venue::from_id("GATE"), Some(Venue::Gate));
        assert_eq!(Venue::from_id("htx"), Some(Venue::Huobi));
        assert_eq!(Venue::from_id("coinbase"), None);
    }

    #[test]
    fn test_venue_id_round_trip() {
        for venue in Venue::all() {
            assert_eq!(Venue::from_id(venue.as_str()), Some(*venue));
        }
    }

    #[test]
    fn test_venue_default_order() {
        let all = Venue::all();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0], Venue::Binance);
        assert_eq!(all[9], Venue::Bitmart);
    }

    #[test]
    fn test_venue_serde_uses_id() {
        let json = serde_json::to_string(&Venue::Kucoin).unwrap();
        assert_eq!(json, "\"kucoin\"");
        let parsed: Venue = serde_json::from_str("\"bingx\"").unwrap();
        assert_eq!(parsed, Venue::Bingx);

        let alias: Venue = serde_json::from_str("\"gateio\"").unwrap();
        assert_eq!(alias, Venue::Gate);
        assert!(serde_json::from_str::<Venue>("\"coinbase\"").is_err());
    }
}
