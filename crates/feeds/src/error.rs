//! Error types for venue and aggregator requests.

use thiserror::Error;

/// Errors that can occur while fetching a price.
///
/// Fetchers log these and collapse them to a missing value; they never reach
/// the report.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Venue API error: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Missing field in response: {0}")]
    MissingField(String),

    #[error("Market not listed: {0}")]
    UnsupportedMarket(String),

    #[error("Operation not supported by {0}")]
    Unsupported(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout(err.to_string())
        } else if err.is_decode() {
            FeedError::Parse(err.to_string())
        } else {
            FeedError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Parse(err.to_string())
    }
}

impl FeedError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FeedError::Timeout(_))
    }

    /// True when the venue simply does not carry the market or operation.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            FeedError::UnsupportedMarket(_) | FeedError::Unsupported(_)
        )
    }
}

/// Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;
