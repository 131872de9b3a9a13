//! Expiration input model shared by every sealbox front end.

use chrono::{DateTime, NaiveDate, TimeZone};
use thiserror::Error;

/// Offset unit for a relative expiration ("45 minutes", "2 hours").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetUnit {
    Minutes,
    Hours,
}

/// AM/PM half of the 12-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// User-selected expiration input: an offset from now, or a fixed calendar
/// date and time of day in the viewer's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationSpec {
    /// Expire `amount` minutes/hours after submission.
    Relative { amount: u32, unit: OffsetUnit },
    /// Expire at a fixed date and 12-hour-clock time.
    Absolute {
        date: NaiveDate,
        hour12: u32,
        minute: u32,
        meridiem: Meridiem,
    },
}

/// Absolute-mode field values exactly as a front end presents them.
///
/// Produced by [`round_to_half_hour`](super::round_to_half_hour) to seed the
/// date/time/AM-PM fields when the user switches from relative to absolute
/// mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsoluteParts {
    pub date: NaiveDate,
    pub hour12: u32,
    pub minute: u32,
    pub meridiem: Meridiem,
}

/// Outcome of lead-time validation.
///
/// Ordinary bad input is always one of these values, never an error; the
/// worst case is "cannot submit yet", rendered to the user as a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryValidation {
    /// Far enough in the future to submit.
    Valid,
    /// No expiration selected (no date picked, blank fields).
    MissingInput,
    /// At or before the reference "now".
    InPast,
    /// In the future, but closer than the minimum lead time.
    TooSoon { min_lead_minutes: u32 },
}

impl ExpiryValidation {
    /// Whether the candidate may be submitted.
    pub fn is_valid(&self) -> bool {
        matches!(self, ExpiryValidation::Valid)
    }

    /// User-facing rejection message, `None` when valid.
    pub fn rejection(&self) -> Option<String> {
        match self {
            ExpiryValidation::Valid => None,
            ExpiryValidation::MissingInput => Some("no expiration selected".to_string()),
            ExpiryValidation::InPast => Some("expiration must be in the future".to_string()),
            ExpiryValidation::TooSoon { min_lead_minutes } => Some(format!(
                "expiration must be at least {} minutes from now",
                min_lead_minutes
            )),
        }
    }
}

/// A resolved expiration: the candidate instant when one could be computed,
/// plus the validation outcome a front end renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedExpiration<Tz: TimeZone> {
    pub instant: Option<DateTime<Tz>>,
    pub validation: ExpiryValidation,
}

impl<Tz: TimeZone> ResolvedExpiration<Tz> {
    /// The instant to submit, present only when validation passed.
    pub fn submittable(&self) -> Option<&DateTime<Tz>> {
        if self.validation.is_valid() {
            self.instant.as_ref()
        } else {
            None
        }
    }
}

/// Contract violations at the field-parsing edge.
///
/// Front ends restrict these inputs (pickers, dropdowns, numeric fields), so
/// a malformed value here means a broken caller, not ordinary user input
/// variance - unlike [`ExpiryValidation`], these are real errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpiryError {
    #[error("malformed time of day {input:?} (expected h:mm, e.g. \"5:30\")")]
    MalformedTime { input: String },

    #[error("hour {0} is outside 1-12")]
    HourOutOfRange(u32),

    #[error("minute {0} is outside 0-59")]
    MinuteOutOfRange(u32),

    #[error("malformed offset {input:?} (expected <n>m or <n>h, e.g. \"45m\")")]
    MalformedOffset { input: String },

    #[error("offset amount must be at least 1")]
    ZeroOffset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_valid() {
        assert!(ExpiryValidation::Valid.is_valid());
        assert!(!ExpiryValidation::MissingInput.is_valid());
        assert!(!ExpiryValidation::InPast.is_valid());
        assert!(!ExpiryValidation::TooSoon {
            min_lead_minutes: 15
        }
        .is_valid());
    }

    #[test]
    fn test_validation_rejection_messages() {
        assert_eq!(ExpiryValidation::Valid.rejection(), None);
        assert_eq!(
            ExpiryValidation::InPast.rejection().as_deref(),
            Some("expiration must be in the future")
        );
        let msg = ExpiryValidation::TooSoon {
            min_lead_minutes: 15,
        }
        .rejection()
        .expect("rejection message");
        assert!(msg.contains("15 minutes"));
    }

    #[test]
    fn test_expiry_error_display() {
        let err = ExpiryError::MalformedTime {
            input: "ab:cd".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed time of day \"ab:cd\" (expected h:mm, e.g. \"5:30\")"
        );
        assert_eq!(
            ExpiryError::HourOutOfRange(13).to_string(),
            "hour 13 is outside 1-12"
        );
    }
}
