use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use prenatal_watch_data::models::{MedicationRecord, ReportRecord, SessionContext};
use prenatal_watch_data::repository::{
    MedicationRepositoryTrait, PatientDirectoryTrait, RepositoryError, ReportRepositoryTrait,
};

use crate::config::TriageConfig;
use crate::entities::conversions::{
    convert_to_domain_medication, convert_to_domain_patient, convert_to_domain_reports,
};
use crate::entities::{
    DataStatus, PartialReason, PatientDetail, PatientRef, PatientSummary, Report, Roster, SymptomCount,
    Vitals,
};
use crate::errors::{map_repo_error, TriageError};
use crate::services::frequency::symptom_frequencies;
use crate::services::report::order_most_recent_first;
use crate::services::risk::{classify_risk, most_recent_report};
use crate::services::roster::{compute_roster, CancellationSignal};

/// Source of the two inputs a patient summary needs
#[async_trait]
pub trait PatientDataFetcher: Send + Sync {
    /// Every report of the patient, in arrival order
    async fn fetch_reports(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<Vec<ReportRecord>, TriageError>;

    /// Number of medications the patient currently has active
    async fn fetch_active_medication_count(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<usize, TriageError>;
}

/// Outcome of the two fetches for one patient
#[derive(Debug, Clone)]
pub struct FetchedData {
    pub reports: Result<Vec<ReportRecord>, TriageError>,
    pub active_medications: Result<usize, TriageError>,
}

/// Fetch reports and medication count concurrently and wait for both
pub async fn fetch_patient_data<F>(fetcher: &F, session: &SessionContext, patient_id: &str) -> FetchedData
where
    F: PatientDataFetcher + ?Sized,
{
    let (reports, active_medications) = tokio::join!(
        fetcher.fetch_reports(session, patient_id),
        fetcher.fetch_active_medication_count(session, patient_id),
    );
    FetchedData {
        reports,
        active_medications,
    }
}

/// Builds patient summaries from report histories and medication counts
#[derive(Debug, Clone)]
pub struct PatientSummaryBuilder {
    top_k: usize,
}

impl Default for PatientSummaryBuilder {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TOP_SYMPTOMS)
    }
}

impl PatientSummaryBuilder {
    /// Create a builder keeping `top_k` symptoms per summary
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Summarize a patient whose data was fully fetched.
    ///
    /// Fails only with `TriageError::Validation` for structurally invalid reports.
    pub fn compute_summary(
        &self,
        patient: &PatientRef,
        reports: &[ReportRecord],
        active_medication_count: usize,
    ) -> Result<PatientSummary, TriageError> {
        let reports = convert_to_domain_reports(reports)?;
        Ok(self.summarize(
            patient,
            &reports,
            Some(active_medication_count),
            DataStatus::Complete,
        ))
    }

    /// Summarize from fetch outcomes, degrading on unavailable dependencies.
    ///
    /// Unknown patients and invalid reports are returned as errors, every
    /// other fetch failure marks the summary `Partial`.
    pub fn assemble(&self, patient: &PatientRef, data: FetchedData) -> Result<PatientSummary, TriageError> {
        let reports = match data.reports {
            Ok(records) => Some(convert_to_domain_reports(&records)?),
            Err(err @ (TriageError::NotFound(_) | TriageError::Validation(_))) => return Err(err),
            Err(err) => {
                warn!("Reports unavailable for patient {}: {}", patient.patient_id, err);
                None
            }
        };

        let active_medications = match data.active_medications {
            Ok(count) => Some(count),
            Err(err @ (TriageError::NotFound(_) | TriageError::Validation(_))) => return Err(err),
            Err(err) => {
                warn!("Medications unavailable for patient {}: {}", patient.patient_id, err);
                None
            }
        };

        let status = match (reports.is_some(), active_medications.is_some()) {
            (true, true) => DataStatus::Complete,
            (false, true) => DataStatus::Partial(PartialReason::ReportFetchFailed),
            (true, false) => DataStatus::Partial(PartialReason::MedicationFetchFailed),
            (false, false) => DataStatus::Partial(PartialReason::ReportAndMedicationFetchFailed),
        };

        Ok(self.summarize(
            patient,
            reports.as_deref().unwrap_or_default(),
            active_medications,
            status,
        ))
    }

    /// Combine classifier and analyzer output over already validated reports
    pub fn summarize(
        &self,
        patient: &PatientRef,
        reports: &[Report],
        active_medication_count: Option<usize>,
        data_status: DataStatus,
    ) -> PatientSummary {
        let latest = most_recent_report(reports);

        PatientSummary {
            patient_id: patient.patient_id.clone(),
            display_name: patient.display_name.clone(),
            total_reports: reports.len(),
            last_report_date: latest.map(|r| r.date),
            risk_tier: classify_risk(reports),
            top_symptoms: symptom_frequencies(reports, Some(self.top_k)),
            active_medication_count,
            latest_vitals: latest.map(|r| r.vitals.clone()).unwrap_or_else(Vitals::default),
            data_status,
        }
    }
}

/// Run a repository call under an optional timeout; a timeout counts as unavailable
async fn with_timeout<T, Fut>(limit: Option<Duration>, what: &str, call: Fut) -> Result<T, TriageError>
where
    Fut: Future<Output = Result<T, RepositoryError>>,
{
    match limit {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result.map_err(map_repo_error),
            Err(_) => Err(TriageError::Unavailable(format!("{} timed out after {:?}", what, limit))),
        },
        None => call.await.map_err(map_repo_error),
    }
}

/// Fetcher reading from the report and medication repositories
#[derive(Debug, Clone)]
pub struct RepositoryFetcher<R, M> {
    reports: R,
    medications: M,
    timeout: Option<Duration>,
}

impl<R, M> RepositoryFetcher<R, M>
where
    R: ReportRepositoryTrait,
    M: MedicationRepositoryTrait,
{
    pub fn new(reports: R, medications: M, timeout: Option<Duration>) -> Self {
        Self {
            reports,
            medications,
            timeout,
        }
    }

    async fn fetch_medications(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<Vec<MedicationRecord>, TriageError> {
        with_timeout(self.timeout, "medication fetch", self.medications.list(session, patient_id)).await
    }
}

#[async_trait]
impl<R, M> PatientDataFetcher for RepositoryFetcher<R, M>
where
    R: ReportRepositoryTrait,
    M: MedicationRepositoryTrait,
{
    async fn fetch_reports(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<Vec<ReportRecord>, TriageError> {
        with_timeout(self.timeout, "report fetch", self.reports.list_reports(session, patient_id)).await
    }

    async fn fetch_active_medication_count(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<usize, TriageError> {
        with_timeout(
            self.timeout,
            "medication fetch",
            self.medications.count_active(session, patient_id),
        )
        .await
    }
}

/// Trait for summary service operations
#[async_trait]
pub trait SummaryServiceTrait: Send + Sync {
    /// Summary of one patient; unknown patients and invalid reports are errors
    async fn patient_summary(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<PatientSummary, TriageError>;

    /// Summary plus full history and active medications of one patient
    async fn patient_detail(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<PatientDetail, TriageError>;

    /// Ranked symptom counts over a patient's full history
    async fn symptom_ranking(
        &self,
        session: &SessionContext,
        patient_id: &str,
        top_k: Option<usize>,
    ) -> Result<Vec<SymptomCount>, TriageError>;

    /// Sorted roster of every patient visible to the session
    async fn roster(
        &self,
        session: &SessionContext,
        cancel: CancellationSignal,
    ) -> Result<Roster, TriageError>;
}

/// Summary service reading from the data layer repositories
pub struct SummaryService<R, M, D> {
    fetcher: RepositoryFetcher<R, M>,
    directory: D,
    builder: PatientSummaryBuilder,
    config: TriageConfig,
}

impl<R, M, D> SummaryService<R, M, D>
where
    R: ReportRepositoryTrait,
    M: MedicationRepositoryTrait,
    D: PatientDirectoryTrait,
{
    /// Create a new summary service
    pub fn new(reports: R, medications: M, directory: D, config: TriageConfig) -> Self {
        Self {
            fetcher: RepositoryFetcher::new(reports, medications, config.fetch_timeout),
            directory,
            builder: PatientSummaryBuilder::new(config.top_symptoms),
            config,
        }
    }

    async fn find_patient(&self, session: &SessionContext, patient_id: &str) -> Result<PatientRef, TriageError> {
        let patients = self.directory.list_patients(session).await.map_err(map_repo_error)?;
        patients
            .into_iter()
            .find(|p| p.id == patient_id)
            .map(convert_to_domain_patient)
            .ok_or_else(|| TriageError::NotFound(format!("patient {}", patient_id)))
    }
}

#[async_trait]
impl<R, M, D> SummaryServiceTrait for SummaryService<R, M, D>
where
    R: ReportRepositoryTrait,
    M: MedicationRepositoryTrait,
    D: PatientDirectoryTrait,
{
    #[instrument(skip(self, session), fields(user = %session.user_id))]
    async fn patient_summary(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<PatientSummary, TriageError> {
        let patient = self.find_patient(session, patient_id).await?;
        let data = fetch_patient_data(&self.fetcher, session, patient_id).await;
        let summary = self.builder.assemble(&patient, data)?;

        debug!(
            "Summary for {}: tier={} status={:?}",
            patient_id, summary.risk_tier, summary.data_status
        );
        Ok(summary)
    }

    #[instrument(skip(self, session), fields(user = %session.user_id))]
    async fn patient_detail(
        &self,
        session: &SessionContext,
        patient_id: &str,
    ) -> Result<PatientDetail, TriageError> {
        let patient = self.find_patient(session, patient_id).await?;

        let (records, medications) = tokio::join!(
            self.fetcher.fetch_reports(session, patient_id),
            self.fetcher.fetch_medications(session, patient_id),
        );

        let medications = match medications {
            Ok(rows) => Some(
                rows.into_iter()
                    .map(convert_to_domain_medication)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Err(err @ TriageError::NotFound(_)) => return Err(err),
            Err(err) => {
                warn!("Medications unavailable for patient {}: {}", patient_id, err);
                None
            }
        };

        let data = FetchedData {
            reports: records.clone(),
            active_medications: match &medications {
                Some(rows) => Ok(rows.iter().filter(|m| m.is_active()).count()),
                None => Err(TriageError::Unavailable("medication fetch failed".to_string())),
            },
        };
        let summary = self.builder.assemble(&patient, data)?;

        let reports = match records {
            Ok(records) => order_most_recent_first(convert_to_domain_reports(&records)?),
            Err(_) => Vec::new(),
        };
        let active_medications = medications
            .unwrap_or_default()
            .into_iter()
            .filter(|m| m.is_active())
            .collect();

        Ok(PatientDetail {
            summary,
            reports,
            active_medications,
        })
    }

    #[instrument(skip(self, session), fields(user = %session.user_id))]
    async fn symptom_ranking(
        &self,
        session: &SessionContext,
        patient_id: &str,
        top_k: Option<usize>,
    ) -> Result<Vec<SymptomCount>, TriageError> {
        self.find_patient(session, patient_id).await?;
        let records = self.fetcher.fetch_reports(session, patient_id).await?;
        let reports = convert_to_domain_reports(&records)?;
        Ok(symptom_frequencies(
            &reports,
            Some(top_k.unwrap_or(self.config.top_symptoms)),
        ))
    }

    #[instrument(skip(self, session, cancel), fields(user = %session.user_id))]
    async fn roster(
        &self,
        session: &SessionContext,
        cancel: CancellationSignal,
    ) -> Result<Roster, TriageError> {
        let patients: Vec<PatientRef> = self
            .directory
            .list_patients(session)
            .await
            .map_err(map_repo_error)?
            .into_iter()
            .map(convert_to_domain_patient)
            .collect();

        let roster = compute_roster(
            session,
            &patients,
            &self.fetcher,
            &self.builder,
            self.config.roster_concurrency,
            cancel,
        )
        .await;

        info!(
            "Roster built with {} rows (cancelled: {})",
            roster.rows.len(),
            roster.cancelled
        );
        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RiskTier;
    use crate::testing::{record, storage_with_patients};
    use chrono::NaiveDate;
    use mockall::mock;
    use prenatal_watch_data::models::VitalsRecord;
    use prenatal_watch_data::repository::{Dependency, MedicationRepository, PatientDirectory, ReportRepository};

    mock! {
        pub Fetcher {}

        #[async_trait]
        impl PatientDataFetcher for Fetcher {
            async fn fetch_reports(
                &self,
                session: &SessionContext,
                patient_id: &str,
            ) -> Result<Vec<ReportRecord>, TriageError>;

            async fn fetch_active_medication_count(
                &self,
                session: &SessionContext,
                patient_id: &str,
            ) -> Result<usize, TriageError>;
        }
    }

    fn patient() -> PatientRef {
        PatientRef::new("p-1", "Ana")
    }

    fn service(
        storage: prenatal_watch_data::repository::InMemoryStorage,
    ) -> SummaryService<ReportRepository, MedicationRepository, PatientDirectory> {
        SummaryService::new(
            ReportRepository::new(storage.clone()),
            MedicationRepository::new(storage.clone()),
            PatientDirectory::new(storage),
            TriageConfig::default(),
        )
    }

    #[test]
    fn test_compute_summary_complete() {
        let builder = PatientSummaryBuilder::default();
        let mut latest = record("r-2", "2024-01-10", &["fatigue", "edema"]);
        latest.vitals = Some(VitalsRecord {
            blood_pressure: Some("120/80".to_string()),
            heart_rate: None,
        });
        let records = vec![record("r-1", "2024-01-09", &["fatigue"]), latest];

        let summary = builder.compute_summary(&patient(), &records, 2).unwrap();

        assert_eq!(summary.total_reports, 2);
        assert_eq!(summary.last_report_date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(summary.risk_tier, RiskTier::Normal);
        assert_eq!(summary.top_symptoms[0].symptom, "fatigue");
        assert_eq!(summary.top_symptoms[0].count, 2);
        assert_eq!(summary.active_medication_count, Some(2));
        assert_eq!(summary.latest_vitals.blood_pressure.as_deref(), Some("120/80"));
        assert_eq!(summary.latest_vitals.heart_rate, None);
        assert_eq!(summary.data_status, DataStatus::Complete);
    }

    #[test]
    fn test_compute_summary_is_idempotent() {
        let builder = PatientSummaryBuilder::default();
        let records = vec![
            record("r-1", "2024-01-10", &["fatigue", "swelling", "headache", "insomnia"]),
            record("r-2", "2024-01-10", &["nausea"]),
        ];
        let first = builder.compute_summary(&patient(), &records, 1).unwrap();
        let second = builder.compute_summary(&patient(), &records, 1).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compute_summary_without_reports() {
        let summary = PatientSummaryBuilder::default()
            .compute_summary(&patient(), &[], 0)
            .unwrap();
        assert_eq!(summary.total_reports, 0);
        assert_eq!(summary.last_report_date, None);
        assert_eq!(summary.risk_tier, RiskTier::Normal);
        assert!(summary.latest_vitals.is_unknown());
        assert_eq!(summary.active_medication_count, Some(0));
    }

    #[test]
    fn test_compute_summary_rejects_undated_report() {
        let mut undated = record("r-1", "2024-01-10", &["fatigue"]);
        undated.date = None;
        let result = PatientSummaryBuilder::default().compute_summary(&patient(), &[undated], 0);
        assert!(matches!(result, Err(TriageError::Validation(_))));
    }

    #[test]
    fn test_assemble_keeps_reports_when_medications_fail() {
        let data = FetchedData {
            reports: Ok(vec![record("r-1", "2024-01-10", &["bleeding"])]),
            active_medications: Err(TriageError::Unavailable("timeout".to_string())),
        };
        let summary = PatientSummaryBuilder::default().assemble(&patient(), data).unwrap();

        assert_eq!(summary.risk_tier, RiskTier::Critical);
        assert_eq!(summary.active_medication_count, None);
        assert_eq!(
            summary.data_status,
            DataStatus::Partial(PartialReason::MedicationFetchFailed)
        );
    }

    #[test]
    fn test_assemble_both_failed() {
        let data = FetchedData {
            reports: Err(TriageError::Unavailable("down".to_string())),
            active_medications: Err(TriageError::Unavailable("down".to_string())),
        };
        let summary = PatientSummaryBuilder::default().assemble(&patient(), data).unwrap();
        assert_eq!(
            summary.data_status,
            DataStatus::Partial(PartialReason::ReportAndMedicationFetchFailed)
        );
    }

    #[test]
    fn test_assemble_propagates_not_found() {
        let data = FetchedData {
            reports: Err(TriageError::NotFound("patient p-1".to_string())),
            active_medications: Ok(0),
        };
        let result = PatientSummaryBuilder::default().assemble(&patient(), data);
        assert!(matches!(result, Err(TriageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_fetch_patient_data_joins_both_calls() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch_reports()
            .times(1)
            .returning(|_, _| Ok(vec![record("r-1", "2024-01-10", &["fatigue"])]));
        fetcher
            .expect_fetch_active_medication_count()
            .times(1)
            .returning(|_, _| Err(TriageError::Unavailable("down".to_string())));

        let session = SessionContext::clinician("doc-1");
        let data = fetch_patient_data(&fetcher, &session, "p-1").await;

        assert_eq!(data.reports.map(|r| r.len()), Ok(1));
        assert!(data.active_medications.is_err());
    }

    #[tokio::test]
    async fn test_patient_summary_unknown_patient() {
        let storage = storage_with_patients(&[("p-1", "Ana")]);
        let result = service(storage)
            .patient_summary(&SessionContext::clinician("doc-1"), "ghost")
            .await;
        assert!(matches!(result, Err(TriageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_patient_summary_reads_current_medication_state() {
        let storage = storage_with_patients(&[("p-1", "Ana")]);
        let medication = storage
            .store_medication(
                "p-1",
                prenatal_watch_data::models::NewMedicationRecord {
                    name: "Iron".to_string(),
                    dosage: "40mg".to_string(),
                    frequency: "daily".to_string(),
                    start_date: "2024-01-01".to_string(),
                },
            )
            .await
            .unwrap();
        let service = service(storage.clone());
        let session = SessionContext::clinician("doc-1");

        let before = service.patient_summary(&session, "p-1").await.unwrap();
        assert_eq!(before.active_medication_count, Some(1));

        storage
            .toggle_medication(&medication.id, medication.version, "2024-02-01")
            .await
            .unwrap();

        let after = service.patient_summary(&session, "p-1").await.unwrap();
        assert_eq!(after.active_medication_count, Some(0));
    }

    #[tokio::test]
    async fn test_patient_summary_times_out_slow_source() {
        let storage = storage_with_patients(&[("p-1", "Ana")]).with_delay(
            Dependency::Medications,
            "p-1",
            Duration::from_millis(200),
        );
        let config = TriageConfig {
            fetch_timeout: Some(Duration::from_millis(20)),
            ..TriageConfig::default()
        };
        let service = SummaryService::new(
            ReportRepository::new(storage.clone()),
            MedicationRepository::new(storage.clone()),
            PatientDirectory::new(storage),
            config,
        );

        let summary = service
            .patient_summary(&SessionContext::clinician("doc-1"), "p-1")
            .await
            .unwrap();
        assert_eq!(
            summary.data_status,
            DataStatus::Partial(PartialReason::MedicationFetchFailed)
        );
    }

    #[tokio::test]
    async fn test_patient_detail_orders_history() {
        let storage = storage_with_patients(&[("p-1", "Ana")]);
        storage.insert_report(record("r-1", "2024-01-08", &["nausea"])).unwrap();
        storage.insert_report(record("r-2", "2024-01-10", &["fatigue"])).unwrap();
        storage.insert_report(record("r-3", "2024-01-09", &["edema"])).unwrap();

        let detail = service(storage)
            .patient_detail(&SessionContext::clinician("doc-1"), "p-1")
            .await
            .unwrap();

        let ids: Vec<&str> = detail.reports.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r-2", "r-3", "r-1"]);
        assert_eq!(detail.summary.total_reports, 3);
        assert!(detail.active_medications.is_empty());
    }

    #[tokio::test]
    async fn test_symptom_ranking_uses_top_k() {
        let storage = storage_with_patients(&[("p-1", "Ana")]);
        storage.insert_report(record("r-1", "2024-01-09", &["fatigue"])).unwrap();
        storage.insert_report(record("r-2", "2024-01-10", &["fatigue", "edema"])).unwrap();

        let ranking = service(storage)
            .symptom_ranking(&SessionContext::clinician("doc-1"), "p-1", Some(1))
            .await
            .unwrap();
        assert_eq!(
            ranking,
            vec![SymptomCount {
                symptom: "fatigue".to_string(),
                count: 2
            }]
        );
    }

    #[tokio::test]
    async fn test_roster_runs_on_a_spawned_task() {
        let storage = storage_with_patients(&[("p-1", "Ana"), ("p-2", "Bia")]);
        storage.insert_report(record("r-1", "2024-01-10", &["bleeding"])).unwrap();
        let shared = std::sync::Arc::new(service(storage));

        // tokio::spawn only accepts Send futures
        let task = tokio::spawn(async move {
            shared
                .roster(&SessionContext::clinician("doc-1"), CancellationSignal::never())
                .await
        });
        let roster = task.await.unwrap().unwrap();

        assert!(!roster.cancelled);
        let tiers: Vec<(&str, RiskTier)> = roster
            .rows
            .iter()
            .map(|r| (r.patient_id.as_str(), r.risk_tier))
            .collect();
        assert_eq!(tiers, vec![("p-1", RiskTier::Critical), ("p-2", RiskTier::Normal)]);
    }
}
