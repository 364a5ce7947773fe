//! # Healthmon Core
//!
//! Core business logic for the healthmon patient record manager.
//!
//! This crate contains the in-memory data model and its operations:
//! - Patient registration and lookup by caller-assigned identifier
//! - Per-patient diagnosis history and appointment scheduling
//! - The appointment reminder scan
//!
//! **No I/O concerns**: prompting, printing and process setup belong in the `healthmon-run`
//! binary. Nothing here persists across restarts.

pub mod constants;
pub mod datetime;
pub mod error;
pub mod record;
pub mod registry;
pub mod reminders;

pub use datetime::{format_moment, parse_appointment_datetime, Moment};
pub use error::{DateTimeError, RegistryError, RegistryResult};
pub use record::{Appointment, DiagnosisEntry, PatientRecord};
pub use registry::{PatientRegistry, PatientSnapshot};
pub use reminders::ReminderEntry;
