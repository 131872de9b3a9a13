//! Pure expiration math.
//!
//! Every function takes an explicit reference instant (or timezone) instead
//! of reading the system clock, so front ends and tests control time.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, TimeZone, Timelike};

use crate::expiry::types::{
    AbsoluteParts, ExpirationSpec, ExpiryValidation, Meridiem, OffsetUnit, ResolvedExpiration,
};

/// Minimum gap between "now" and a submitted expiration, in minutes.
pub const DEFAULT_MIN_LEAD_MINUTES: u32 = 15;

/// Expiration `amount` minutes or hours after `now`.
///
/// Instant arithmetic: the result is exactly `amount * unit` seconds after
/// `now` regardless of DST transitions or month/year boundaries in between.
pub fn compute_relative<Tz: TimeZone>(
    now: &DateTime<Tz>,
    amount: u32,
    unit: OffsetUnit,
) -> DateTime<Tz> {
    let offset = match unit {
        OffsetUnit::Minutes => Duration::minutes(i64::from(amount)),
        OffsetUnit::Hours => Duration::hours(i64::from(amount)),
    };
    // chrono dates top out around year 262000; clamp absurd offsets to `now`
    // so validation rejects them as InPast instead of panicking.
    now.clone()
        .checked_add_signed(offset)
        .unwrap_or_else(|| now.clone())
}

/// 24-hour clock hour to 12-hour clock: `0` is 12 AM, `12` is 12 PM.
pub fn to_hour12(hour24: u32) -> (u32, Meridiem) {
    let meridiem = if hour24 < 12 {
        Meridiem::Am
    } else {
        Meridiem::Pm
    };
    let hour12 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    (hour12, meridiem)
}

/// 12-hour clock (1-12 plus AM/PM) to 24-hour clock hour.
pub fn to_hour24(hour12: u32, meridiem: Meridiem) -> u32 {
    let base = hour12 % 12;
    match meridiem {
        Meridiem::Am => base,
        Meridiem::Pm => base + 12,
    }
}

/// Resolve a calendar date plus 12-hour-clock time to an instant in `tz`.
///
/// Seconds are zero. Local times made ambiguous by a DST fold resolve to the
/// earlier occurrence; times that fall in a DST gap shift forward one hour.
/// Returns `None` only when the fields cannot name a real local time at all.
pub fn compute_absolute<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    hour12: u32,
    minute: u32,
    meridiem: Meridiem,
) -> Option<DateTime<Tz>> {
    let naive = date.and_hms_opt(to_hour24(hour12, meridiem), minute, 0)?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Some(instant),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest(),
    }
}

/// Round an instant to the nearest half hour and split it into the field
/// values an absolute-mode form presents.
///
/// Minutes 0-14 round down to :00, 15-44 to :30, 45-59 up to the next hour;
/// the hour (and date, at 11:45 PM and later) rolls over accordingly.
pub fn round_to_half_hour<Tz: TimeZone>(instant: &DateTime<Tz>) -> AbsoluteParts {
    let floored = instant.clone()
        - Duration::seconds(i64::from(instant.second()))
        - Duration::nanoseconds(i64::from(instant.nanosecond()));
    let delta = match floored.minute() {
        m @ 0..=14 => -i64::from(m),
        m @ 15..=44 => 30 - i64::from(m),
        m => 60 - i64::from(m),
    };
    let rounded = floored + Duration::minutes(delta);
    let (hour12, meridiem) = to_hour12(rounded.hour());
    AbsoluteParts {
        date: rounded.date_naive(),
        hour12,
        minute: rounded.minute(),
        meridiem,
    }
}

/// Epoch seconds for the wire. Sub-second precision truncates.
pub fn to_epoch_seconds<Tz: TimeZone>(instant: &DateTime<Tz>) -> i64 {
    instant.timestamp()
}

/// Check a candidate expiration against `now` and the minimum lead time.
///
/// Never fails: every outcome is a value the caller renders, worst case
/// "cannot submit yet".
pub fn validate_lead_time<Tz: TimeZone>(
    now: &DateTime<Tz>,
    candidate: Option<&DateTime<Tz>>,
    min_lead_minutes: u32,
) -> ExpiryValidation {
    let Some(candidate) = candidate else {
        return ExpiryValidation::MissingInput;
    };
    if candidate <= now {
        return ExpiryValidation::InPast;
    }
    let lead = candidate.clone().signed_duration_since(now.clone());
    if lead < Duration::minutes(i64::from(min_lead_minutes)) {
        ExpiryValidation::TooSoon { min_lead_minutes }
    } else {
        ExpiryValidation::Valid
    }
}

/// Resolve an expiration spec against `now`: compute the candidate instant
/// (in `now`'s timezone) and validate its lead time.
pub fn resolve_spec<Tz: TimeZone>(
    now: &DateTime<Tz>,
    spec: Option<&ExpirationSpec>,
    min_lead_minutes: u32,
) -> ResolvedExpiration<Tz> {
    let instant = match spec {
        None => None,
        Some(ExpirationSpec::Relative { amount, unit }) => {
            Some(compute_relative(now, *amount, *unit))
        }
        Some(ExpirationSpec::Absolute {
            date,
            hour12,
            minute,
            meridiem,
        }) => compute_absolute(&now.timezone(), *date, *hour12, *minute, *meridiem),
    };
    let validation = validate_lead_time(now, instant.as_ref(), min_lead_minutes);
    ResolvedExpiration {
        instant,
        validation,
    }
}
