//! Trading pair symbols.

use crate::SymbolError;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `BASE/QUOTE` trading pair, e.g. `BTC/USDT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    base: CompactString,
    quote: CompactString,
}

impl Symbol {
    /// Create a symbol from its two legs.
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            base: CompactString::new(base),
            quote: CompactString::new(quote),
        }
    }

    /// Parse `BASE/QUOTE`. Both legs must be non-empty and there must be
    /// exactly one separator.
    pub fn parse(raw: &str) -> Result<Self, SymbolError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SymbolError::Empty);
        }

        let mut parts = raw.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(base), Some(quote), None) if !base.is_empty() && !quote.is_empty() => {
                Ok(Self::new(base, quote))
            }
            _ => Err(SymbolError::Malformed(raw.to_string())),
        }
    }

    #[inline]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[inline]
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Upper-case legs joined by `sep` (e.g. `BTC-USDT`, `BTCUSDT`).
    pub fn joined(&self, sep: &str) -> String {
        format!(
            "{}{}{}",
            self.base.to_uppercase(),
            sep,
            self.quote.to_uppercase()
        )
    }
}

impl FromStr for Symbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}
