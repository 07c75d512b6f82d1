//! On-chain token identity tables used to build aggregator quote requests.

use crate::Symbol;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// On-chain identity of a token: contract address (EVM) or mint (Solana).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: String,
    /// Decimal places of the smallest unit (e.g. 6 for USDT, 18 for ETH)
    pub decimals: u8,
}

impl TokenInfo {
    pub fn new(address: &str, decimals: u8) -> Self {
        Self {
            address: address.to_string(),
            decimals,
        }
    }
}

/// Ticker → token identity for one aggregator. Tickers are stored upper-case
/// and matched case-insensitively, like exchange market ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenTable {
    tokens: BTreeMap<String, TokenInfo>,
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, ticker: &str, address: &str, decimals: u8) -> Self {
        self.tokens
            .insert(ticker.to_ascii_uppercase(), TokenInfo::new(address, decimals));
        self
    }

    pub fn get(&self, ticker: &str) -> Option<&TokenInfo> {
        self.tokens.get(&ticker.to_ascii_uppercase())
    }

    /// Resolve both legs of a symbol. `None` when either leg is not listed.
    pub fn resolve(&self, symbol: &Symbol) -> Option<(&TokenInfo, &TokenInfo)> {
        Some((self.get(symbol.base())?, self.get(symbol.quote())?))
    }

    /// Ethereum mainnet tokens quoted through 1inch. BTC maps to WBTC and ETH
    /// to the native-asset sentinel address.
    pub fn ethereum_mainnet() -> Self {
        Self::new()
            .with("BTC", "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599", 8)
            .with("ETH", "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE", 18)
            .with("USDT", "0xdAC17F958D2ee523a2206206994597C13D831ec7", 6)
    }

    /// Solana mints quoted through Jupiter.
    pub fn solana() -> Self {
        Self::new()
            .with("SOL", "So11111111111111111111111111111111111111112", 9)
            .with("USDC", "EPjFWdd5AufqSSqeM2qVw2fChwxhKMPhnT7SqDfjaap", 6)
    }
}

impl FromIterator<(String, TokenInfo)> for TokenTable {
    fn from_iter<I: IntoIterator<Item = (String, TokenInfo)>>(iter: I) -> Self {
        let tokens = iter
            .into_iter()
            .map(|(ticker, info)| (ticker.to_ascii_uppercase(), info))
            .collect();
        Self { tokens }
    }
}

impl<'de> Deserialize<'de> for TokenTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, TokenInfo>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

/// Convert a human amount into the token's smallest integer unit, truncating
/// toward zero. Negative or non-finite amounts map to zero.
pub fn to_base_units(amount: f64, decimals: u8) -> u128 {
    let scaled = amount * 10f64.powi(i32::from(decimals));
    if scaled.is_finite() && scaled > 0.0 {
        scaled as u128
    } else {
        0
    }
}

/// Convert an integer amount of smallest units back into a human amount.
pub fn from_base_units(raw: u128, decimals: u8) -> f64 {
    raw as f64 / 10f64.powi(i32::from(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_both_legs() {
        let table = TokenTable::ethereum_mainnet();
        let (base, quote) = table.resolve(&Symbol::new("ETH", "USDT")).unwrap();
        assert_eq!(base.decimals, 18);
        assert_eq!(quote.decimals, 6);
        assert!(quote.address.starts_with("0xdAC17F"));
    }

    #[test]
    fn test_resolve_missing_leg() {
        let table = TokenTable::solana();
        assert!(table.resolve(&Symbol::new("BTC", "USDT")).is_none());
        assert!(table.resolve(&Symbol::new("SOL", "USDT")).is_none());
        assert!(table.resolve(&Symbol::new("SOL", "USDC")).is_some());
    }

    #[test]
    fn test_resolve_ignores_case() {
        let table = TokenTable::ethereum_mainnet();
        let (base, quote) = table.resolve(&Symbol::new("btc", "Usdt")).unwrap();
        assert_eq!(base.decimals, 8);
        assert_eq!(quote.decimals, 6);
        assert!(TokenTable::solana().resolve(&Symbol::new("sol", "usdc")).is_some());
    }

    #[test]
    fn test_deserialized_tickers_are_upper_case() {
        let table: TokenTable =
            serde_json::from_str(r#"{"weth": {"address": "0xC02a", "decimals": 18}}"#).unwrap();
        assert_eq!(table.get("WETH").unwrap().decimals, 18);
        assert_eq!(serde_json::to_value(&table).unwrap()["WETH"]["address"], "0xC02a");
    }

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units(1.0, 8), 100_000_000);
        assert_eq!(to_base_units(1.0, 18), 1_000_000_000_000_000_000);
        assert_eq!(to_base_units(0.5, 9), 500_000_000);
        assert_eq!(to_base_units(-1.0, 6), 0);
        assert_eq!(to_base_units(f64::NAN, 6), 0);
    }

    #[test]
    fn test_from_base_units() {
        assert_eq!(from_base_units(150_250_000, 6), 150.25);
        assert_eq!(from_base_units(0, 18), 0.0);
    }

    #[test]
    fn test_table_serde_is_flat_map() {
        let table = TokenTable::new().with("SOL", "So1", 9);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["SOL"]["decimals"], 9);
        assert_eq!(json["SOL"]["address"], "So1");
    }
}
