//! Parsing for the free-text expiration fields.
//!
//! Front ends constrain these inputs; anything that still arrives malformed
//! is a hard [`ExpiryError`], not a validation outcome.

use crate::expiry::types::{ExpiryError, Meridiem, OffsetUnit};

/// Parse a 12-hour clock time like `"5:30"`, `"11:05 pm"` or `"5:30PM"`.
///
/// The meridiem suffix is optional; when absent the caller supplies it from
/// its own AM/PM control. Minutes must be two digits.
pub fn parse_time_of_day(input: &str) -> Result<(u32, u32, Option<Meridiem>), ExpiryError> {
    let malformed = || ExpiryError::MalformedTime {
        input: input.to_string(),
    };
    let trimmed = input.trim();
    let (clock, meridiem) = match strip_meridiem(trimmed) {
        Some((head, m)) => (head.trim_end(), Some(m)),
        None => (trimmed, None),
    };

    let (hour_text, minute_text) = clock.split_once(':').ok_or_else(malformed)?;
    if hour_text.is_empty()
        || hour_text.len() > 2
        || !hour_text.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(malformed());
    }
    if minute_text.len() != 2 || !minute_text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let hour: u32 = hour_text.parse().map_err(|_| malformed())?;
    let minute: u32 = minute_text.parse().map_err(|_| malformed())?;
    if !(1..=12).contains(&hour) {
        return Err(ExpiryError::HourOutOfRange(hour));
    }
    if minute > 59 {
        return Err(ExpiryError::MinuteOutOfRange(minute));
    }
    Ok((hour, minute, meridiem))
}

/// Parse a relative offset like `"45m"` or `"2h"`.
pub fn parse_offset(input: &str) -> Result<(u32, OffsetUnit), ExpiryError> {
    let malformed = || ExpiryError::MalformedOffset {
        input: input.to_string(),
    };
    let trimmed = input.trim();
    let last = trimmed.chars().last().ok_or_else(malformed)?;
    let unit = match last.to_ascii_lowercase() {
        'm' => OffsetUnit::Minutes,
        'h' => OffsetUnit::Hours,
        _ => return Err(malformed()),
    };

    let digits = trimmed[..trimmed.len() - last.len_utf8()].trim_end();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let amount: u32 = digits.parse().map_err(|_| malformed())?;
    if amount == 0 {
        return Err(ExpiryError::ZeroOffset);
    }
    Ok((amount, unit))
}

fn strip_meridiem(s: &str) -> Option<(&str, Meridiem)> {
    if s.len() < 2 || !s.is_char_boundary(s.len() - 2) {
        return None;
    }
    let (head, tail) = s.split_at(s.len() - 2);
    if tail.eq_ignore_ascii_case("am") {
        Some((head, Meridiem::Am))
    } else if tail.eq_ignore_ascii_case("pm") {
        Some((head, Meridiem::Pm))
    } else {
        None
    }
}
