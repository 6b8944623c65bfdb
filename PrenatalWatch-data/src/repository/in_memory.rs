use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use super::errors::RepositoryError;
use crate::models::{
    ClinicalEntryRecord, GuidanceMessageRecord, MedicationRecord, NewClinicalEntryRecord,
    NewGuidanceMessageRecord, NewMedicationRecord, NewReportRecord, PatientRecord, ReportRecord,
    REPORT_SCHEMA_VERSION,
};

/// Upstream source a repository call reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    Reports,
    Medications,
}

#[derive(Debug, Default)]
struct StorageState {
    /// Patients in registration order
    patients: Vec<PatientRecord>,
    /// Reports per patient, in arrival order
    reports: HashMap<String, Vec<ReportRecord>>,
    /// Medication rows in prescription order
    medications: Vec<MedicationRecord>,
    /// Encounter notes per patient, in arrival order
    clinical_entries: HashMap<String, Vec<ClinicalEntryRecord>>,
    /// Guidance messages per patient, in arrival order
    guidance: HashMap<String, Vec<GuidanceMessageRecord>>,
    outages: HashSet<(Dependency, String)>,
    delays: HashMap<(Dependency, String), Duration>,
}

impl StorageState {
    fn ensure_patient(&self, patient_id: &str) -> Result<(), RepositoryError> {
        if self.patients.iter().any(|p| p.id == patient_id) {
            Ok(())
        } else {
            Err(RepositoryError::NotFound(format!("patient {}", patient_id)))
        }
    }

    fn ensure_available(&self, dependency: Dependency, patient_id: &str) -> Result<(), RepositoryError> {
        if self.outages.contains(&(dependency, patient_id.to_string())) {
            Err(RepositoryError::Unavailable(format!(
                "{:?} source failed for patient {}",
                dependency, patient_id
            )))
        } else {
            Ok(())
        }
    }
}

/// In-memory storage shared by the report, medication and patient repositories
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    state: Arc<Mutex<StorageState>>,
}

impl InMemoryStorage {
    /// Create a new, empty in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a patient
    pub fn add_patient(&self, patient: PatientRecord) -> Result<(), RepositoryError> {
        let mut state = self.state.lock()?;
        state.reports.entry(patient.id.clone()).or_default();
        if let Some(existing) = state.patients.iter_mut().find(|p| p.id == patient.id) {
            *existing = patient;
        } else {
            state.patients.push(patient);
        }
        Ok(())
    }

    /// Append a raw report record as received, without any normalization
    pub fn insert_report(&self, report: ReportRecord) -> Result<(), RepositoryError> {
        let mut state = self.state.lock()?;
        state.ensure_patient(&report.patient_id)?;
        state
            .reports
            .entry(report.patient_id.clone())
            .or_default()
            .push(report);
        Ok(())
    }

    /// Append a raw medication row as received
    pub fn insert_medication(&self, medication: MedicationRecord) -> Result<(), RepositoryError> {
        let mut state = self.state.lock()?;
        state.ensure_patient(&medication.patient_id)?;
        state.medications.push(medication);
        Ok(())
    }

    /// Append an encounter note as received
    pub fn insert_clinical_entry(&self, entry: ClinicalEntryRecord) -> Result<(), RepositoryError> {
        let mut state = self.state.lock()?;
        state.ensure_patient(&entry.patient_id)?;
        state
            .clinical_entries
            .entry(entry.patient_id.clone())
            .or_default()
            .push(entry);
        Ok(())
    }

    /// Append a guidance message as received
    pub fn insert_guidance(&self, message: GuidanceMessageRecord) -> Result<(), RepositoryError> {
        let mut state = self.state.lock()?;
        state.ensure_patient(&message.patient_id)?;
        state
            .guidance
            .entry(message.patient_id.clone())
            .or_default()
            .push(message);
        Ok(())
    }

    /// List all registered patients
    pub async fn get_patients(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
        let state = self.state.lock()?;
        Ok(state.patients.clone())
    }

    /// Get every report of a patient in arrival order
    pub async fn get_reports(&self, patient_id: &str) -> Result<Vec<ReportRecord>, RepositoryError> {
        self.simulate_latency(Dependency::Reports, patient_id).await?;

        let state = self.state.lock()?;
        state.ensure_available(Dependency::Reports, patient_id)?;
        state.ensure_patient(patient_id)?;
        Ok(state.reports.get(patient_id).cloned().unwrap_or_default())
    }

    /// Store a new report for a patient
    pub async fn store_report(
        &self,
        patient_id: &str,
        request: NewReportRecord,
    ) -> Result<ReportRecord, RepositoryError> {
        let mut state = self.state.lock()?;
        state.ensure_available(Dependency::Reports, patient_id)?;
        state.ensure_patient(patient_id)?;

        let report = ReportRecord {
            id: Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            schema_version: REPORT_SCHEMA_VERSION,
            date: Some(request.date),
            description: request.description,
            mood: Some(request.mood),
            symptoms: request.symptoms,
            vitals: request.vitals,
            occurrence_note: request.occurrence_note,
        };

        state
            .reports
            .entry(patient_id.to_string())
            .or_default()
            .push(report.clone());
        Ok(report)
    }

    /// Get every medication row of a patient in prescription order
    pub async fn get_medications(&self, patient_id: &str) -> Result<Vec<MedicationRecord>, RepositoryError> {
        self.simulate_latency(Dependency::Medications, patient_id).await?;

        let state = self.state.lock()?;
        state.ensure_available(Dependency::Medications, patient_id)?;
        state.ensure_patient(patient_id)?;
        Ok(state
            .medications
            .iter()
            .filter(|m| m.patient_id == patient_id)
            .cloned()
            .collect())
    }

    /// Store a new, active medication for a patient
    pub async fn store_medication(
        &self,
        patient_id: &str,
        request: NewMedicationRecord,
    ) -> Result<MedicationRecord, RepositoryError> {
        let mut state = self.state.lock()?;
        state.ensure_available(Dependency::Medications, patient_id)?;
        state.ensure_patient(patient_id)?;

        let medication = MedicationRecord {
            id: Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            name: request.name,
            dosage: request.dosage,
            frequency: request.frequency,
            active: true,
            start_date: request.start_date,
            end_date: None,
            version: 1,
        };
        state.medications.push(medication.clone());
        Ok(medication)
    }

    /// Get a single medication row by id
    pub async fn get_medication(&self, medication_id: &str) -> Result<MedicationRecord, RepositoryError> {
        let state = self.state.lock()?;
        state
            .medications
            .iter()
            .find(|m| m.id == medication_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("medication {}", medication_id)))
    }

    /// Flip the active flag of a medication if its version still matches.
    ///
    /// Deactivation stamps `effective_date` as the end date, reactivation clears it.
    pub async fn toggle_medication(
        &self,
        medication_id: &str,
        expected_version: u64,
        effective_date: &str,
    ) -> Result<MedicationRecord, RepositoryError> {
        let mut state = self.state.lock()?;
        let medication = state
            .medications
            .iter_mut()
            .find(|m| m.id == medication_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("medication {}", medication_id)))?;

        if medication.version != expected_version {
            return Err(RepositoryError::VersionConflict {
                id: medication_id.to_string(),
                expected: expected_version,
                actual: medication.version,
            });
        }

        medication.active = !medication.active;
        medication.end_date = if medication.active {
            None
        } else {
            Some(effective_date.to_string())
        };
        medication.version += 1;

        debug!(
            "Medication {} toggled to active={} (version {})",
            medication.id, medication.active, medication.version
        );
        Ok(medication.clone())
    }

    /// Get every encounter note of a patient in arrival order
    pub async fn get_clinical_entries(&self, patient_id: &str) -> Result<Vec<ClinicalEntryRecord>, RepositoryError> {
        let state = self.state.lock()?;
        state.ensure_patient(patient_id)?;
        Ok(state.clinical_entries.get(patient_id).cloned().unwrap_or_default())
    }

    /// Store a new encounter note for a patient
    pub async fn store_clinical_entry(
        &self,
        patient_id: &str,
        request: NewClinicalEntryRecord,
    ) -> Result<ClinicalEntryRecord, RepositoryError> {
        let mut state = self.state.lock()?;
        state.ensure_patient(patient_id)?;

        let entry = ClinicalEntryRecord {
            id: Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            clinician_id: request.clinician_id,
            date: request.date,
            description: request.description,
            prescribed_medications: request.prescribed_medications,
            actions: request.actions,
        };
        state
            .clinical_entries
            .entry(patient_id.to_string())
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    /// Get every guidance message sent to a patient in arrival order
    pub async fn get_guidance(&self, patient_id: &str) -> Result<Vec<GuidanceMessageRecord>, RepositoryError> {
        let state = self.state.lock()?;
        state.ensure_patient(patient_id)?;
        Ok(state.guidance.get(patient_id).cloned().unwrap_or_default())
    }

    /// Store a new guidance message for a patient
    pub async fn store_guidance(
        &self,
        patient_id: &str,
        request: NewGuidanceMessageRecord,
    ) -> Result<GuidanceMessageRecord, RepositoryError> {
        let mut state = self.state.lock()?;
        state.ensure_patient(patient_id)?;

        let message = GuidanceMessageRecord {
            id: Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            clinician_id: request.clinician_id,
            date: request.date,
            text: request.text,
        };
        state
            .guidance
            .entry(patient_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn simulate_latency(&self, dependency: Dependency, patient_id: &str) -> Result<(), RepositoryError> {
        let delay = {
            let state = self.state.lock()?;
            state.delays.get(&(dependency, patient_id.to_string())).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "mock"))]
impl InMemoryStorage {
    /// Make every call to `dependency` for `patient_id` fail as unavailable
    pub fn with_outage(self, dependency: Dependency, patient_id: &str) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.outages.insert((dependency, patient_id.to_string()));
        }
        self
    }

    /// Delay every call to `dependency` for `patient_id`
    pub fn with_delay(self, dependency: Dependency, patient_id: &str, delay: Duration) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.delays.insert((dependency, patient_id.to_string()), delay);
        }
        self
    }

    /// Clear an outage injected with `with_outage`
    pub fn restore(&self, dependency: Dependency, patient_id: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.outages.remove(&(dependency, patient_id.to_string()));
        }
    }
}
