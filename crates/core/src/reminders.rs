//! Appointment reminder scan.

use crate::datetime::{format_moment, Moment};
use crate::record::PatientRecord;
use chrono::Duration;
use serde::Serialize;
use std::fmt;

/// One appointment that falls inside the reminder window, with its owning patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderEntry {
    pub patient_id: String,
    pub patient_name: String,
    pub doctor: String,
    pub date_time: Moment,
}

impl fmt::Display for ReminderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reminder: {} (ID: {}) has an appointment with Dr. {} on {}.",
            self.patient_name,
            self.patient_id,
            self.doctor,
            format_moment(&self.date_time)
        )
    }
}

/// Whether an appointment at `appointment_time` is due for a reminder.
///
/// The test is `appointment_time - now < window`, so appointments that have already passed
/// are always due.
pub fn is_due(appointment_time: Moment, now: Moment, window: Duration) -> bool {
    appointment_time - now < window
}

/// Collects reminders for every due appointment across `patients`.
///
/// Appointment order within a patient is preserved; patient order follows the iterator.
pub fn collect_reminders<'a, I>(patients: I, now: Moment, window: Duration) -> Vec<ReminderEntry>
where
    I: IntoIterator<Item = &'a PatientRecord>,
{
    let reminders: Vec<ReminderEntry> = patients
        .into_iter()
        .flat_map(|patient| {
            patient
                .list_appointments()
                .iter()
                .filter(move |appointment| is_due(appointment.date_time, now, window))
                .map(move |appointment| ReminderEntry {
                    patient_id: patient.id().to_string(),
                    patient_name: patient.name().to_string(),
                    doctor: appointment.doctor.clone(),
                    date_time: appointment.date_time,
                })
        })
        .collect();

    tracing::debug!(count = reminders.len(), "reminder scan complete");
    reminders
}
