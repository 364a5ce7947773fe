//! Date/time helpers.
//!
//! Appointments are entered as local wall-clock time with minute precision, so the core works
//! with [`chrono::NaiveDateTime`] throughout. Parsing lives here so the interactive caller and
//! the tests agree on one format, but the registry itself only ever sees parsed values.

use crate::constants::{APPOINTMENT_DATETIME_FORMAT, DEFAULT_REMINDER_WINDOW_HOURS};
use crate::error::DateTimeError;
use chrono::{Duration, Local, NaiveDateTime};

/// A point in time with at least minute precision.
pub type Moment = NaiveDateTime;

/// Parses `YYYY-MM-DD HH:MM` into a [`Moment`].
///
/// Leading and trailing whitespace is ignored. Parsing follows chrono's rules, which are lenient
/// about padding and separators: `2024-1-1 9:5` and `2024-01-0110:00` are both accepted. Only
/// the resulting moment matters to the registry, so these are not rejected.
///
/// # Errors
///
/// Returns [`DateTimeError::Invalid`] if the trimmed input does not match the format.
pub fn parse_appointment_datetime(input: &str) -> Result<Moment, DateTimeError> {
    let trimmed = input.trim();
    NaiveDateTime::parse_from_str(trimmed, APPOINTMENT_DATETIME_FORMAT).map_err(|source| {
        DateTimeError::Invalid {
            input: trimmed.to_string(),
            source,
        }
    })
}

/// Renders a moment as `YYYY-MM-DD HH:MM`.
pub fn format_moment(moment: &Moment) -> String {
    moment.format(APPOINTMENT_DATETIME_FORMAT).to_string()
}

/// Current local wall-clock time.
pub fn now() -> Moment {
    Local::now().naive_local()
}

/// Window used by the reminder scan: [`DEFAULT_REMINDER_WINDOW_HOURS`] hours.
pub fn default_reminder_window() -> Duration {
    Duration::hours(DEFAULT_REMINDER_WINDOW_HOURS)
}
