//! Patient registry.
//!
//! The registry owns every [`PatientRecord`] keyed by its caller-assigned identifier and is the
//! only way to reach a record. Failed operations never mutate state.

use crate::datetime::Moment;
use crate::error::{RegistryError, RegistryResult};
use crate::record::{Appointment, DiagnosisEntry, PatientRecord};
use crate::reminders::{self, ReminderEntry};
use chrono::Duration;
use serde::Serialize;
use std::collections::HashMap;

/// Read-only copy of one patient for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientSnapshot {
    pub id: String,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub diagnoses: Vec<DiagnosisEntry>,
    pub appointments: Vec<Appointment>,
}

impl PatientSnapshot {
    pub fn has_diagnoses(&self) -> bool {
        !self.diagnoses.is_empty()
    }

    pub fn has_appointments(&self) -> bool {
        !self.appointments.is_empty()
    }
}

impl From<&PatientRecord> for PatientSnapshot {
    fn from(record: &PatientRecord) -> Self {
        Self {
            id: record.id().to_string(),
            name: record.name().to_string(),
            age: record.age().to_string(),
            gender: record.gender().to_string(),
            diagnoses: record.list_diagnoses().to_vec(),
            appointments: record.list_appointments().to_vec(),
        }
    }
}

/// In-memory collection of patient records.
///
/// The registry assumes exclusive single-threaded access. Callers sharing one across threads
/// must wrap it in their own lock.
#[derive(Debug, Default)]
pub struct PatientRegistry {
    patients: HashMap<String, PatientRecord>,
}

impl PatientRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered patients.
    pub fn len(&self) -> usize {
        self.patients.len()
    }

    /// Returns `true` if no patient has been registered.
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Returns `true` if `id` is a registered patient identifier.
    pub fn contains(&self, id: &str) -> bool {
        self.patients.contains_key(id)
    }

    /// Registers a new patient.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyExists`] if `id` is already registered. The existing
    /// record is left exactly as it was.
    pub fn add_patient(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        age: impl Into<String>,
        gender: impl Into<String>,
    ) -> RegistryResult<()> {
        let id = id.into();
        if self.patients.contains_key(&id) {
            tracing::debug!(patient_id = %id, "duplicate patient registration rejected");
            return Err(RegistryError::AlreadyExists(id));
        }

        let record = PatientRecord::new(id.clone(), name.into(), age.into(), gender.into());
        tracing::info!(patient_id = %id, "patient registered");
        self.patients.insert(id, record);
        Ok(())
    }

    /// Resolves a patient for reading.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if `id` is not registered.
    pub fn get_patient(&self, id: &str) -> RegistryResult<&PatientRecord> {
        self.patients.get(id).ok_or_else(|| not_found(id))
    }

    /// Resolves a patient for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if `id` is not registered.
    pub fn get_patient_mut(&mut self, id: &str) -> RegistryResult<&mut PatientRecord> {
        self.patients.get_mut(id).ok_or_else(|| not_found(id))
    }

    /// Records a diagnosis and prescription for patient `id`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if `id` is not registered.
    pub fn add_diagnosis(
        &mut self,
        id: &str,
        diagnosis: impl Into<String>,
        prescription: impl Into<String>,
    ) -> RegistryResult<()> {
        self.get_patient_mut(id)?.add_diagnosis(diagnosis, prescription);
        Ok(())
    }

    /// Books an appointment for patient `id`. Double-booking the same slot is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if `id` is not registered.
    pub fn schedule_appointment(
        &mut self,
        id: &str,
        doctor: impl Into<String>,
        date_time: Moment,
    ) -> RegistryResult<()> {
        self.get_patient_mut(id)?.schedule_appointment(doctor, date_time);
        Ok(())
    }

    /// Cancels the first appointment matching `doctor` and `date_time` for patient `id`.
    ///
    /// `Ok(false)` means the patient exists but had no such appointment.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if `id` is not registered.
    pub fn cancel_appointment(
        &mut self,
        id: &str,
        doctor: &str,
        date_time: &Moment,
    ) -> RegistryResult<bool> {
        Ok(self.get_patient_mut(id)?.cancel_appointment(doctor, date_time))
    }

    /// Copies a patient's demographics, diagnoses and appointments for display.
    ///
    /// # Returns
    ///
    /// A [`PatientSnapshot`] detached from the registry; later mutations do not affect it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if `id` is not registered.
    pub fn view_patient(&self, id: &str) -> RegistryResult<PatientSnapshot> {
        self.get_patient(id).map(PatientSnapshot::from)
    }

    /// Every appointment, across all patients, due within `window` of `now`.
    ///
    /// # Returns
    ///
    /// One [`ReminderEntry`] per due appointment; empty when nothing is due.
    /// Patient order is unspecified. See [`reminders::is_due`] for the inclusion rule.
    pub fn collect_reminders(&self, now: Moment, window: Duration) -> Vec<ReminderEntry> {
        reminders::collect_reminders(self.patients.values(), now, window)
    }
}

fn not_found(id: &str) -> RegistryError {
    tracing::debug!(patient_id = %id, "patient not found");
    RegistryError::NotFound(id.to_string())
}
