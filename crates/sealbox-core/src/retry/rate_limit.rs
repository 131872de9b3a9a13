//! Rate-limit snapshots from `X-RateLimit-*` response headers.

use serde::Serialize;

/// Header carrying the window's request quota.
pub const HEADER_LIMIT: &str = "x-ratelimit-limit";
/// Header carrying the requests left in the window.
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
/// Header carrying the window reset time, epoch seconds.
pub const HEADER_RESET: &str = "x-ratelimit-reset";

/// Usage share at which a front end should start warning the user.
pub const NEAR_LIMIT_PERCENT: f64 = 90.0;

/// One response's view of the server's rate-limit window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateLimitInfo {
    /// Requests allowed in the window.
    pub limit: u64,
    /// Requests left in the window.
    pub remaining: u64,
    /// When the window resets, epoch seconds.
    pub reset: i64,
    /// Share of the window already used, clamped to [0, 100].
    pub percent_used: f64,
}

impl RateLimitInfo {
    /// Build a snapshot from the three `X-RateLimit-*` header values.
    ///
    /// All-or-nothing: a missing or non-integer value, or a zero limit,
    /// yields `None` rather than a partial snapshot.
    pub fn from_header_values(
        limit: Option<&str>,
        remaining: Option<&str>,
        reset: Option<&str>,
    ) -> Option<Self> {
        let limit: u64 = limit?.trim().parse().ok()?;
        let remaining: u64 = remaining?.trim().parse().ok()?;
        let reset: i64 = reset?.trim().parse().ok()?;
        if limit == 0 {
            return None;
        }
        // Saturate so `remaining > limit` reads as an unused window, not a
        // negative percentage.
        let used = limit.saturating_sub(remaining);
        let percent_used = (used as f64 / limit as f64 * 100.0).clamp(0.0, 100.0);
        Some(Self {
            limit,
            remaining,
            reset,
            percent_used,
        })
    }

    /// Whether usage has crossed [`NEAR_LIMIT_PERCENT`].
    pub fn is_near_limit(&self) -> bool {
        self.percent_used >= NEAR_LIMIT_PERCENT
    }

    /// Seconds from `now_epoch` until the window resets, floored at zero.
    pub fn seconds_until_reset(&self, now_epoch: i64) -> i64 {
        (self.reset - now_epoch).max(0)
    }
}
