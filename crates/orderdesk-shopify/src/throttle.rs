//! Shopify REST call-limit tracking.
//!
//! Every Admin API response carries `X-Shopify-Shop-Api-Call-Limit: used/limit`
//! describing the leaky bucket for the access token. The fetch loop pauses
//! before the next request when the bucket is close to full rather than
//! waiting to be answered with a 429.

use std::time::Duration;

/// Header carrying the current bucket fill.
pub const CALL_LIMIT_HEADER: &str = "X-Shopify-Shop-Api-Call-Limit";

/// Parsed `used/limit` pair from [`CALL_LIMIT_HEADER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallLimit {
    pub used: u32,
    pub limit: u32,
}

impl CallLimit {
    /// Parses a header value such as `"38/40"`. Whitespace around either
    /// number is tolerated; anything else yields `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (used, limit) = value.split_once('/')?;
        let used = used.trim().parse().ok()?;
        let limit = limit.trim().parse().ok()?;
        if limit == 0 {
            return None;
        }
        Some(Self { used, limit })
    }

    /// `true` when `used` is within `margin` calls of `limit`.
    #[must_use]
    pub fn should_throttle(&self, margin: u32) -> bool {
        self.used >= self.limit.saturating_sub(margin)
    }
}

/// Sleeps for `pause` when `call_limit` says the bucket is nearly full.
/// Returns whether it paused.
pub(crate) async fn pause_if_near_limit(
    call_limit: Option<CallLimit>,
    margin: u32,
    pause: Duration,
) -> bool {
    let Some(call_limit) = call_limit else {
        return false;
    };
    if !call_limit.should_throttle(margin) {
        return false;
    }
    tracing::info!(
        used = call_limit.used,
        limit = call_limit.limit,
        pause_secs = pause.as_secs(),
        "shopify call limit nearly reached; pausing before next page"
    );
    tokio::time::sleep(pause).await;
    true
}
