//! Error types for core parsing.

use thiserror::Error;

/// Errors raised while parsing a `BASE/QUOTE` symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("Symbol is empty")]
    Empty,

    #[error("Expected BASE/QUOTE, got {0:?}")]
    Malformed(String),
}
