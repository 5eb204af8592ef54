//! Response delivery with simulated latency.

use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Root key of a resolved payload overriding the configured delay (milliseconds).
pub const DELAY_KEY: &str = "__delay";

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Serialized mock response ready to be written by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Latency that was applied before the response was produced
    pub delay: Duration,
}

impl MockResponse {
    /// `200 OK` JSON response for a resolved payload.
    pub fn json(payload: &Value, delay: Duration) -> Self {
        Self {
            status: 200,
            content_type: JSON_CONTENT_TYPE,
            body: payload.to_string(),
            delay,
        }
    }
}

/// Delay to apply for a resolved payload.
///
/// A positive numeric `__delay` on the payload root wins; otherwise the configured
/// delay is used.
pub fn effective_delay(payload: &Value, configured: Duration) -> Duration {
    let declared = payload
        .get(DELAY_KEY)
        .and_then(Value::as_f64)
        .filter(|ms| ms.is_finite() && *ms > 0.0);

    match declared {
        Some(ms) => Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX),
        None => configured,
    }
}

/// Whole milliseconds of `delay` for logging, saturating at `u64::MAX`.
pub fn delay_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// Serialize `payload` after waiting out its effective delay.
pub async fn emit(payload: &Value, configured_delay: Duration) -> MockResponse {
    let delay = effective_delay(payload, configured_delay);
    if !delay.is_zero() {
        debug!(delay_ms = delay_millis(delay), "delaying mock response");
        tokio::time::sleep(delay).await;
    }
    MockResponse::json(payload, delay)
}
