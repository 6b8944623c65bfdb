// Testing utilities and scripted collaborators for the domain layer
// This module is only available in tests or when the "mock" feature is enabled

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use prenatal_watch_data::models::{PatientRecord, ReportRecord, SessionContext, REPORT_SCHEMA_VERSION};
use prenatal_watch_data::repository::InMemoryStorage;

use crate::entities::{Mood, Report, Vitals};
use crate::errors::TriageError;
use crate::services::summary::PatientDataFetcher;

/// Raw report record for patient `p-1` with a normal mood
pub fn record(id: &str, date: &str, symptoms: &[&str]) -> ReportRecord {
    ReportRecord {
        id: id.to_string(),
        patient_id: "p-1".to_string(),
        schema_version: REPORT_SCHEMA_VERSION,
        date: Some(date.to_string()),
        description: None,
        mood: Some("normal".to_string()),
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        vitals: None,
        occurrence_note: None,
    }
}

/// Validated report for patient `p-1`; `date` must be `YYYY-MM-DD`
pub fn report(date: &str, symptoms: &[&str]) -> Report {
    Report {
        id: format!("r-{}", date),
        patient_id: "p-1".to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("test date must be YYYY-MM-DD"),
        description: None,
        mood: Mood::Normal,
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        vitals: Vitals::default(),
        occurrence_note: None,
    }
}

/// In-memory storage with the given `(id, display name)` patients registered
pub fn storage_with_patients(patients: &[(&str, &str)]) -> InMemoryStorage {
    let storage = InMemoryStorage::new();
    for (id, name) in patients {
        storage
            .add_patient(PatientRecord {
                id: id.to_string(),
                display_name: name.to_string(),
                gestational_weeks: None,
            })
            .expect("fresh storage lock");
    }
    storage
}

/// Fetcher answering from per-patient scripts.
///
/// Patients without a script have no reports and no medications.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    reports: HashMap<String, Result<Vec<ReportRecord>, TriageError>>,
    medications: HashMap<String, Result<usize, TriageError>>,
    delays: HashMap<String, Duration>,
    default_delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reports(mut self, patient_id: &str, reports: Vec<ReportRecord>) -> Self {
        self.reports.insert(patient_id.to_string(), Ok(reports));
        self
    }

    pub fn with_report_failure(mut self, patient_id: &str, err: TriageError) -> Self {
        self.reports.insert(patient_id.to_string(), Err(err));
        self
    }

    pub fn with_medication_count(mut self, patient_id: &str, count: usize) -> Self {
        self.medications.insert(patient_id.to_string(), Ok(count));
        self
    }

    pub fn with_medication_failure(mut self, patient_id: &str, err: TriageError) -> Self {
        self.medications.insert(patient_id.to_string(), Err(err));
        self
    }

    /// Both sources answer `NotFound` for this patient
    pub fn with_unknown_patient(self, patient_id: &str) -> Self {
        let err = TriageError::NotFound(format!("patient {}", patient_id));
        self.with_report_failure(patient_id, err.clone())
            .with_medication_failure(patient_id, err)
    }

    pub fn with_delay(mut self, patient_id: &str, delay: Duration) -> Self {
        self.delays.insert(patient_id.to_string(), delay);
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    /// Number of fetches started so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches observed running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn answer<T>(&self, patient_id: &str, result: Result<T, TriageError>) -> Result<T, TriageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        // Dropped fetches (cancelled rosters) must still leave the counter
        let _guard = InFlightGuard(&self.in_flight);

        if let Some(delay) = self.delays.get(patient_id).copied().or(self.default_delay) {
            tokio::time::sleep(delay).await;
        }

        result
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PatientDataFetcher for ScriptedFetcher {
    async fn fetch_reports(
        &self,
        _session: &SessionContext,
        patient_id: &str,
    ) -> Result<Vec<ReportRecord>, TriageError> {
        let scripted = self.reports.get(patient_id).cloned().unwrap_or(Ok(Vec::new()));
        self.answer(patient_id, scripted).await
    }

    async fn fetch_active_medication_count(
        &self,
        _session: &SessionContext,
        patient_id: &str,
    ) -> Result<usize, TriageError> {
        let scripted = self.medications.get(patient_id).cloned().unwrap_or(Ok(0));
        self.answer(patient_id, scripted).await
    }
}
