//! Retry plumbing for the API client: rate-limit snapshots, `Retry-After`
//! parsing, and jittered exponential backoff.

mod backoff;
mod rate_limit;

pub use backoff::{
    parse_retry_after, parse_retry_after_at, retry_delay, RetryState, BACKOFF_BASE_MS,
    BACKOFF_CAP_MS,
};
pub use rate_limit::{
    RateLimitInfo, HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET, NEAR_LIMIT_PERCENT,
};
