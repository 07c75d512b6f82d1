//! Shared HTTP plumbing for venue and aggregator requests.

use crate::{FeedError, FeedResult};
use serde_json::Value;
use std::time::Duration;

/// Per-request timeout applied when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("spread-scanner/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client. Every request made through it is bounded by
/// `timeout`.
pub fn build_client(timeout: Duration) -> FeedResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(FeedError::from)
}

/// GET `url` with query parameters and decode the body as JSON.
/// Non-2xx statuses are errors.
pub async fn get_json(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, String)],
) -> FeedResult<Value> {
    let response = client.get(url).query(query).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Status(status.as_u16()));
    }

    Ok(response.json::<Value>().await?)
}

/// Read a JSON number or a numeric string. Non-finite values are rejected.
pub fn as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Non-null value at a JSON pointer (e.g. `/data/price`).
pub fn field<'a>(value: &'a Value, pointer: &str) -> FeedResult<&'a Value> {
    match value.pointer(pointer) {
        Some(Value::Null) | None => Err(FeedError::MissingField(pointer.to_string())),
        Some(v) => Ok(v),
    }
}

/// Numeric value at a JSON pointer.
pub fn field_f64(value: &Value, pointer: &str) -> FeedResult<f64> {
    let raw = field(value, pointer)?;
    as_f64(raw).ok_or_else(|| FeedError::Parse(format!("{pointer} is not a number: {raw}")))
}

/// First element of the array at `pointer`, or the value itself when the venue
/// returns a bare object. An empty array means the market is not listed.
pub fn first_item<'a>(value: &'a Value, pointer: &str, market: &str) -> FeedResult<&'a Value> {
    let raw = field(value, pointer)?;
    match raw {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| FeedError::UnsupportedMarket(market.to_string())),
        other => Ok(other),
    }
}
