//! Expiration selection: offset and fixed date/time computation, half-hour
//! rounding, lead-time validation, and the headless form front ends bind to.

mod calc;
mod form;
mod parser;
mod types;

pub use calc::{
    compute_absolute, compute_relative, resolve_spec, round_to_half_hour, to_epoch_seconds,
    to_hour12, to_hour24, validate_lead_time, DEFAULT_MIN_LEAD_MINUTES,
};
pub use form::{ExpirationForm, ExpirationMode};
pub use parser::{parse_offset, parse_time_of_day};
pub use types::{
    AbsoluteParts, ExpirationSpec, ExpiryError, ExpiryValidation, Meridiem, OffsetUnit,
    ResolvedExpiration,
};
