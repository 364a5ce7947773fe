//! Per-patient state.
//!
//! A [`PatientRecord`] owns one patient's demographics, diagnosis history and appointment list.
//! Records are only constructed by [`crate::PatientRegistry`]; everything else reaches them
//! through the registry by identifier.

use crate::constants::DIAGNOSIS_TIMESTAMP_FORMAT;
use crate::datetime::{self, format_moment, Moment};
use serde::Serialize;
use std::fmt;

/// One diagnosis with its prescription, stamped when it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosisEntry {
    pub timestamp: Moment,
    pub diagnosis: String,
    pub prescription: String,
}

impl fmt::Display for DiagnosisEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Date: {}, Diagnosis: {}, Prescription: {}",
            self.timestamp.format(DIAGNOSIS_TIMESTAMP_FORMAT),
            self.diagnosis,
            self.prescription
        )
    }
}

/// A scheduled appointment with a doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    pub doctor: String,
    pub date_time: Moment,
}

impl Appointment {
    fn matches(&self, doctor: &str, date_time: &Moment) -> bool {
        self.doctor == doctor && self.date_time == *date_time
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Doctor: {}, Date & Time: {}",
            self.doctor,
            format_moment(&self.date_time)
        )
    }
}

/// A single patient's demographics, diagnosis history and appointments.
///
/// Demographic fields are stored exactly as supplied. Both lists keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientRecord {
    id: String,
    name: String,
    age: String,
    gender: String,
    diagnosis_history: Vec<DiagnosisEntry>,
    appointments: Vec<Appointment>,
}

impl PatientRecord {
    pub(crate) fn new(id: String, name: String, age: String, gender: String) -> Self {
        Self {
            id,
            name,
            age,
            gender,
            diagnosis_history: Vec::new(),
            appointments: Vec::new(),
        }
    }

    /// Caller-assigned identifier, fixed at registration.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Patient name as entered.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Age as entered; not validated or parsed.
    pub fn age(&self) -> &str {
        &self.age
    }

    /// Gender as entered.
    pub fn gender(&self) -> &str {
        &self.gender
    }

    /// Appends a diagnosis stamped with the current local time.
    pub fn add_diagnosis(&mut self, diagnosis: impl Into<String>, prescription: impl Into<String>) {
        self.add_diagnosis_at(datetime::now(), diagnosis, prescription);
    }

    pub(crate) fn add_diagnosis_at(
        &mut self,
        timestamp: Moment,
        diagnosis: impl Into<String>,
        prescription: impl Into<String>,
    ) {
        self.diagnosis_history.push(DiagnosisEntry {
            timestamp,
            diagnosis: diagnosis.into(),
            prescription: prescription.into(),
        });
        tracing::debug!(
            patient_id = %self.id,
            entries = self.diagnosis_history.len(),
            "diagnosis recorded"
        );
    }

    /// Diagnosis history in the order entries were added.
    pub fn list_diagnoses(&self) -> &[DiagnosisEntry] {
        &self.diagnosis_history
    }

    /// Appends an appointment. The same doctor and time may be booked more than once.
    pub fn schedule_appointment(&mut self, doctor: impl Into<String>, date_time: Moment) {
        self.appointments.push(Appointment {
            doctor: doctor.into(),
            date_time,
        });
        tracing::debug!(
            patient_id = %self.id,
            appointments = self.appointments.len(),
            "appointment scheduled"
        );
    }

    /// Appointments in the order they were scheduled.
    pub fn list_appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Removes the first appointment matching `doctor` and `date_time` exactly.
    ///
    /// Returns `false` and leaves the list untouched when nothing matches.
    pub fn cancel_appointment(&mut self, doctor: &str, date_time: &Moment) -> bool {
        match self
            .appointments
            .iter()
            .position(|appointment| appointment.matches(doctor, date_time))
        {
            Some(index) => {
                self.appointments.remove(index);
                tracing::debug!(patient_id = %self.id, "appointment cancelled");
                true
            }
            None => false,
        }
    }
}
