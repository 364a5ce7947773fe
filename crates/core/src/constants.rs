//! Constants used throughout the healthmon core crate.

/// Format accepted for appointment date/time input and used when rendering appointments.
pub const APPOINTMENT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format used when rendering diagnosis timestamps.
pub const DIAGNOSIS_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Reminder window used by the menu, in hours.
pub const DEFAULT_REMINDER_WINDOW_HOURS: i64 = 24;
