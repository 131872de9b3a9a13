//! Retry delays: `Retry-After` parsing and jittered exponential backoff.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::RngExt;
use tracing::debug;

/// First backoff step in milliseconds.
pub const BACKOFF_BASE_MS: u64 = 1_000;
/// Backoff ceiling in milliseconds.
pub const BACKOFF_CAP_MS: u64 = 10_000;

/// Retry input for one failed attempt. Built fresh per response; nothing in
/// this module keeps state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// Zero-based count of attempts that have already failed.
    pub attempt: u32,
    /// Server-dictated wait from `Retry-After`, when the header was usable.
    pub retry_after_seconds: Option<u64>,
}

impl RetryState {
    /// The delay to sleep before the next attempt.
    pub fn delay(&self) -> Duration {
        retry_delay(self.attempt, self.retry_after_seconds)
    }
}

/// Parse a `Retry-After` header value against the current wall clock.
///
/// Same semantics as [`parse_retry_after_at`]; this variant reads
/// `Utc::now()` and is the one clock read in the crate.
pub fn parse_retry_after(header: Option<&str>) -> Option<u64> {
    parse_retry_after_at(header, Utc::now())
}

/// Parse a `Retry-After` header value against a caller-supplied `now`.
///
/// Accepts a non-negative integer second count or an RFC 2822 HTTP date.
/// Date waits round up to whole seconds; a date at or before `now` is
/// `None` (nothing usable to wait for), as is any unparseable value.
pub fn parse_retry_after_at(header: Option<&str>, now: DateTime<Utc>) -> Option<u64> {
    let value = header?.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(seconds);
    }
    let Ok(date) = DateTime::parse_from_rfc2822(value) else {
        debug!(value, "unparseable Retry-After header");
        return None;
    };
    let wait_ms = date.signed_duration_since(now).num_milliseconds();
    if wait_ms <= 0 {
        debug!(value, "Retry-After date not in the future");
        return None;
    }
    Some((wait_ms as u64).div_ceil(1_000))
}

/// Delay before retry number `attempt + 1`.
///
/// A server-dictated wait is honored exactly. Otherwise the delay doubles
/// from [`BACKOFF_BASE_MS`] up to [`BACKOFF_CAP_MS`], with a fresh ±25%
/// uniform jitter drawn per call so synchronized clients fan out.
pub fn retry_delay(attempt: u32, retry_after_seconds: Option<u64>) -> Duration {
    if let Some(seconds) = retry_after_seconds {
        return Duration::from_millis(seconds.saturating_mul(1_000));
    }
    let base = BACKOFF_BASE_MS
        .saturating_mul(1u64 << attempt.min(63))
        .min(BACKOFF_CAP_MS);
    let jitter = rand::rng().random_range(0.75..=1.25);
    Duration::from_millis((base as f64 * jitter) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_numeric_seconds() {
        let now = Utc.with_ymd_and_hms(2026, 4, 10, 10, 0, 0).unwrap();
        assert_eq!(parse_retry_after_at(Some("5"), now), Some(5));
        assert_eq!(parse_retry_after_at(Some(" 60 "), now), Some(60));
        assert_eq!(parse_retry_after_at(Some("0"), now), Some(0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let now = Utc.with_ymd_and_hms(2026, 4, 10, 10, 0, 0).unwrap();
        for header in [None, Some(""), Some("  "), Some("abc"), Some("-5"), Some("1.5")] {
            assert_eq!(parse_retry_after_at(header, now), None, "header {header:?}");
        }
    }

    #[test]
    fn test_parse_http_date_rounds_up() {
        let now = Utc.timestamp_opt(1_760_000_000, 500_000_000).unwrap();
        let date = Utc.timestamp_opt(1_760_000_090, 0).unwrap().to_rfc2822();
        // 89.5s away rounds up to a full 90.
        assert_eq!(parse_retry_after_at(Some(&date), now), Some(90));
        // A whole-second distance stays exact, no extra second tacked on.
        let on_the_second = Utc.timestamp_opt(1_760_000_000, 0).unwrap();
        assert_eq!(parse_retry_after_at(Some(&date), on_the_second), Some(90));
    }

    #[test]
    fn test_parse_past_http_date_is_none() {
        let now = Utc.with_ymd_and_hms(2026, 4, 10, 10, 0, 0).unwrap();
        let past = (now - chrono::Duration::seconds(60)).to_rfc2822();
        assert_eq!(parse_retry_after_at(Some(&past), now), None);
        assert_eq!(parse_retry_after_at(Some(&now.to_rfc2822()), now), None);
    }

    #[test]
    fn test_server_wait_is_exact() {
        assert_eq!(retry_delay(0, Some(5)), Duration::from_millis(5_000));
        assert_eq!(retry_delay(7, Some(5)), Duration::from_millis(5_000));
        assert_eq!(retry_delay(0, Some(0)), Duration::ZERO);
    }

    #[test]
    fn test_backoff_stays_within_jitter_band() {
        for _ in 0..100 {
            let ms = retry_delay(2, None).as_millis() as u64;
            assert!((3_000..=5_000).contains(&ms), "attempt 2 delay {ms}ms");
        }
    }

    #[test]
    fn test_backoff_band_tracks_doubling_base() {
        for attempt in 0..=10u32 {
            let base = (BACKOFF_BASE_MS << attempt).min(BACKOFF_CAP_MS);
            let ms = retry_delay(attempt, None).as_millis() as u64;
            assert!(
                (base * 3 / 4..=base * 5 / 4).contains(&ms),
                "attempt {attempt}: {ms}ms outside ±25% of {base}ms"
            );
        }
    }

    #[test]
    fn test_backoff_caps_after_fourth_attempt() {
        for attempt in [4, 10, 63, u32::MAX] {
            let ms = retry_delay(attempt, None).as_millis() as u64;
            assert!((7_500..=12_500).contains(&ms), "attempt {attempt}: {ms}ms");
        }
    }

    #[test]
    fn test_backoff_draws_vary() {
        let draws: Vec<u64> = (0..100)
            .map(|_| retry_delay(0, None).as_millis() as u64)
            .collect();
        assert!(draws.iter().any(|&d| d != draws[0]), "jitter never varied");
    }

    #[test]
    fn test_retry_state_delegates() {
        let state = RetryState {
            attempt: 3,
            retry_after_seconds: Some(2),
        };
        assert_eq!(state.delay(), Duration::from_millis(2_000));
    }
}
