//! Headless state behind the expiration selector.
//!
//! A front end binds its widgets to the raw fields here and calls
//! [`ExpirationForm::resolve`] after every change; all date math lives in
//! [`calc`](crate::expiry::calc), so the same behavior backs any UI.

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::expiry::calc;
use crate::expiry::parser::parse_time_of_day;
use crate::expiry::types::{
    ExpirationSpec, ExpiryError, Meridiem, OffsetUnit, ResolvedExpiration,
};

/// Which input mode the selector shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpirationMode {
    #[default]
    Relative,
    Absolute,
}

/// Framework-agnostic expiration selector state.
///
/// Fields hold raw widget values (free text included); nothing is validated
/// until [`resolve`](Self::resolve).
#[derive(Debug, Clone)]
pub struct ExpirationForm {
    mode: ExpirationMode,
    amount: String,
    unit: OffsetUnit,
    date: Option<NaiveDate>,
    time: String,
    meridiem: Meridiem,
}

impl Default for ExpirationForm {
    fn default() -> Self {
        Self {
            mode: ExpirationMode::Relative,
            amount: "1".to_string(),
            unit: OffsetUnit::Hours,
            date: None,
            time: String::new(),
            meridiem: Meridiem::Am,
        }
    }
}

impl ExpirationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ExpirationMode {
        self.mode
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn unit(&self) -> OffsetUnit {
        self.unit
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn meridiem(&self) -> Meridiem {
        self.meridiem
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    pub fn set_unit(&mut self, unit: OffsetUnit) {
        self.unit = unit;
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
    }

    pub fn set_time(&mut self, time: impl Into<String>) {
        self.time = time.into();
    }

    pub fn set_meridiem(&mut self, meridiem: Meridiem) {
        self.meridiem = meridiem;
    }

    /// Switch input modes.
    ///
    /// Entering absolute mode seeds the date/time/AM-PM fields from the
    /// current relative selection, rounded to the nearest half hour, so the
    /// user starts from roughly the expiration they already picked. An
    /// unparseable relative amount leaves the absolute fields untouched.
    pub fn set_mode<Tz: TimeZone>(&mut self, mode: ExpirationMode, now: &DateTime<Tz>) {
        if mode == self.mode {
            return;
        }
        if mode == ExpirationMode::Absolute {
            if let Ok(Some(ExpirationSpec::Relative { amount, unit })) = self.to_spec() {
                let seed = calc::round_to_half_hour(&calc::compute_relative(now, amount, unit));
                self.date = Some(seed.date);
                self.time = format!("{}:{:02}", seed.hour12, seed.minute);
                self.meridiem = seed.meridiem;
            }
        }
        self.mode = mode;
    }

    /// Snapshot the current fields as an [`ExpirationSpec`].
    ///
    /// `Ok(None)` means the fields are incomplete (blank or non-numeric
    /// amount, no date, blank time) and the form cannot be submitted yet.
    /// A malformed time string is a hard error.
    pub fn to_spec(&self) -> Result<Option<ExpirationSpec>, ExpiryError> {
        match self.mode {
            ExpirationMode::Relative => {
                let amount: u32 = match self.amount.trim().parse() {
                    Ok(n) if n > 0 => n,
                    _ => return Ok(None),
                };
                Ok(Some(ExpirationSpec::Relative {
                    amount,
                    unit: self.unit,
                }))
            }
            ExpirationMode::Absolute => {
                let Some(date) = self.date else {
                    return Ok(None);
                };
                if self.time.trim().is_empty() {
                    return Ok(None);
                }
                let (hour12, minute, suffix) = parse_time_of_day(&self.time)?;
                Ok(Some(ExpirationSpec::Absolute {
                    date,
                    hour12,
                    minute,
                    // A typed am/pm suffix beats the dropdown.
                    meridiem: suffix.unwrap_or(self.meridiem),
                }))
            }
        }
    }

    /// Resolve the form against `now` in `now`'s timezone.
    pub fn resolve<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        min_lead_minutes: u32,
    ) -> Result<ResolvedExpiration<Tz>, ExpiryError> {
        let spec = self.to_spec()?;
        Ok(calc::resolve_spec(now, spec.as_ref(), min_lead_minutes))
    }
}
