use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};
use tokio::sync::watch;
use tracing::{instrument, warn};

use prenatal_watch_data::models::SessionContext;

use crate::entities::{roster_order, PartialReason, PatientRef, PatientSummary, Roster};
use crate::errors::TriageError;
use crate::services::summary::{fetch_patient_data, PatientDataFetcher, PatientSummaryBuilder};

/// Handle used by the consumer to abandon a roster computation
#[derive(Debug)]
pub struct CancellationHandle {
    tx: watch::Sender<bool>,
}

impl CancellationHandle {
    pub fn cancel(&self) {
        // No receivers left means nothing to stop
        let _ = self.tx.send(true);
    }
}

/// Signal observed by a roster computation
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    rx: watch::Receiver<bool>,
}

/// Create a connected handle and signal
pub fn cancellation_pair() -> (CancellationHandle, CancellationSignal) {
    let (tx, rx) = watch::channel(false);
    (CancellationHandle { tx }, CancellationSignal { rx })
}

impl CancellationSignal {
    /// A signal that never fires
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the handle cancels; pend forever if it is dropped first
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

fn failed_row_reason(err: &TriageError) -> PartialReason {
    match err {
        TriageError::NotFound(_) => PartialReason::PatientNotFound,
        TriageError::Validation(_) => PartialReason::InvalidReport,
        _ => PartialReason::ReportAndMedicationFetchFailed,
    }
}

/// Summarize every patient and return the sorted roster.
///
/// At most `concurrency` patients are in flight at once. A failure for one
/// patient only degrades that row. Rows are keyed by patient id, so the
/// output never depends on completion order. When `cancel` fires, in-flight
/// work is dropped and every unfinished row is tagged `Cancelled`.
#[instrument(skip_all, fields(patients = patients.len(), concurrency = concurrency))]
pub async fn compute_roster<F>(
    session: &SessionContext,
    patients: &[PatientRef],
    fetcher: &F,
    builder: &PatientSummaryBuilder,
    concurrency: usize,
    mut cancel: CancellationSignal,
) -> Roster
where
    F: PatientDataFetcher + ?Sized,
{
    let mut seen = HashSet::new();
    let patients: Vec<PatientRef> = patients
        .iter()
        .filter(|p| seen.insert(p.patient_id.as_str()))
        .cloned()
        .collect();

    let mut finished: HashMap<String, PatientSummary> = HashMap::with_capacity(patients.len());
    let mut cancelled = cancel.is_cancelled();

    if !cancelled {
        // Owned refs keep the buffered futures free of higher-ranked borrows
        let mut in_flight = stream::iter(patients.clone())
            .map(|patient: PatientRef| async move {
                let data = fetch_patient_data(fetcher, session, &patient.patient_id).await;
                let row = builder.assemble(&patient, data).unwrap_or_else(|err| {
                    warn!("Roster row for patient {} failed: {}", patient.patient_id, err);
                    PatientSummary::unavailable(&patient, failed_row_reason(&err))
                });
                (patient.patient_id, row)
            })
            .buffer_unordered(concurrency.max(1));

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                next = in_flight.next() => match next {
                    Some((patient_id, row)) => {
                        finished.insert(patient_id, row);
                    }
                    None => break,
                },
            }
        }
    }

    if cancelled {
        warn!(
            "Roster cancelled with {} of {} rows finished",
            finished.len(),
            patients.len()
        );
    }

    let mut rows: Vec<PatientSummary> = patients
        .iter()
        .map(|patient| {
            finished
                .remove(&patient.patient_id)
                .unwrap_or_else(|| PatientSummary::unavailable(patient, PartialReason::Cancelled))
        })
        .collect();
    rows.sort_by(roster_order);

    Roster { rows, cancelled }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DataStatus, RiskTier};
    use crate::services::summary::RepositoryFetcher;
    use crate::testing::{record, storage_with_patients, ScriptedFetcher};
    use prenatal_watch_data::repository::{Dependency, MedicationRepository, ReportRepository};
    use std::time::Duration;

    fn session() -> SessionContext {
        SessionContext::clinician("doc-1")
    }

    fn refs(pairs: &[(&str, &str)]) -> Vec<PatientRef> {
        pairs.iter().map(|(id, name)| PatientRef::new(*id, *name)).collect()
    }

    #[tokio::test]
    async fn test_one_unavailable_patient_degrades_one_row() {
        let storage = storage_with_patients(&[("p-1", "Ana"), ("p-2", "Bia"), ("p-3", "Carla")])
            .with_outage(Dependency::Reports, "p-2");
        storage.insert_report(record("r-1", "2024-01-10", &["fatigue"])).unwrap();
        let mut critical = record("r-2", "2024-01-10", &["bleeding"]);
        critical.patient_id = "p-3".to_string();
        storage.insert_report(critical).unwrap();

        let fetcher = RepositoryFetcher::new(
            ReportRepository::new(storage.clone()),
            MedicationRepository::new(storage),
            None,
        );
        let roster = compute_roster(
            &session(),
            &refs(&[("p-1", "Ana"), ("p-2", "Bia"), ("p-3", "Carla")]),
            &fetcher,
            &PatientSummaryBuilder::default(),
            2,
            CancellationSignal::never(),
        )
        .await;

        assert!(!roster.cancelled);
        assert_eq!(roster.rows.len(), 3);

        let complete: Vec<(&str, RiskTier)> = roster
            .rows
            .iter()
            .filter(|r| r.data_status.is_complete())
            .map(|r| (r.patient_id.as_str(), r.risk_tier))
            .collect();
        assert_eq!(complete, vec![("p-3", RiskTier::Critical), ("p-1", RiskTier::Normal)]);

        let partial = roster.rows.iter().find(|r| r.patient_id == "p-2").unwrap();
        assert_eq!(partial.data_status, DataStatus::Partial(PartialReason::ReportFetchFailed));
        assert_eq!(PartialReason::ReportFetchFailed.as_str(), "report-fetch-failed");
        // Medications still arrived for the degraded row
        assert_eq!(partial.active_medication_count, Some(0));
    }

    #[tokio::test]
    async fn test_order_independent_of_completion() {
        // The first patient answers last
        let fetcher = ScriptedFetcher::new()
            .with_reports("p-1", vec![record("r-1", "2024-01-10", &["contractions"])])
            .with_delay("p-1", Duration::from_millis(40))
            .with_reports("p-2", vec![record("r-2", "2024-01-10", &["a", "b", "c", "d"])])
            .with_reports("p-3", vec![]);

        let roster = compute_roster(
            &session(),
            &refs(&[("p-1", "Zoe"), ("p-2", "Yara"), ("p-3", "Ana")]),
            &fetcher,
            &PatientSummaryBuilder::default(),
            3,
            CancellationSignal::never(),
        )
        .await;

        let ids: Vec<&str> = roster.rows.iter().map(|r| r.patient_id.as_str()).collect();
        assert_eq!(ids, vec!["p-1", "p-2", "p-3"]);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let fetcher = ScriptedFetcher::new().with_default_delay(Duration::from_millis(10));
        let patients: Vec<PatientRef> = (0..8)
            .map(|i| PatientRef::new(format!("p-{}", i), format!("Patient {}", i)))
            .collect();

        compute_roster(
            &session(),
            &patients,
            &fetcher,
            &PatientSummaryBuilder::default(),
            3,
            CancellationSignal::never(),
        )
        .await;

        // Each patient issues two concurrent fetches
        assert!(fetcher.max_in_flight() <= 6, "saw {}", fetcher.max_in_flight());
        assert!(fetcher.max_in_flight() >= 2);
    }

    #[tokio::test]
    async fn test_invalid_and_unknown_rows_are_tagged() {
        let mut undated = record("r-1", "2024-01-10", &["fatigue"]);
        undated.date = None;
        let fetcher = ScriptedFetcher::new()
            .with_reports("p-1", vec![undated])
            .with_unknown_patient("p-2");

        let roster = compute_roster(
            &session(),
            &refs(&[("p-1", "Ana"), ("p-2", "Bia"), ("p-3", "Carla")]),
            &fetcher,
            &PatientSummaryBuilder::default(),
            4,
            CancellationSignal::never(),
        )
        .await;

        let status_of = |id: &str| {
            roster
                .rows
                .iter()
                .find(|r| r.patient_id == id)
                .map(|r| r.data_status)
                .unwrap()
        };
        assert_eq!(status_of("p-1"), DataStatus::Partial(PartialReason::InvalidReport));
        assert_eq!(status_of("p-2"), DataStatus::Partial(PartialReason::PatientNotFound));
        assert_eq!(status_of("p-3"), DataStatus::Complete);
    }

    #[tokio::test]
    async fn test_cancellation_tags_unfinished_rows() {
        let fetcher = ScriptedFetcher::new()
            .with_delay("p-2", Duration::from_secs(30))
            .with_delay("p-3", Duration::from_secs(30));
        let (handle, signal) = cancellation_pair();
        let patients = refs(&[("p-1", "Ana"), ("p-2", "Bia"), ("p-3", "Carla")]);
        let builder = PatientSummaryBuilder::default();
        let session = session();

        let roster_future = compute_roster(&session, &patients, &fetcher, &builder, 3, signal);
        let cancel_later = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.cancel();
        };
        let (roster, _) = tokio::join!(roster_future, cancel_later);

        assert!(roster.cancelled);
        assert_eq!(roster.rows.len(), 3);
        for row in &roster.rows {
            let expected = if row.patient_id == "p-1" {
                DataStatus::Complete
            } else {
                DataStatus::Partial(PartialReason::Cancelled)
            };
            assert_eq!(row.data_status, expected, "{}", row.patient_id);
        }
    }

    #[tokio::test]
    async fn test_already_cancelled_signal_does_no_work() {
        let fetcher = ScriptedFetcher::new();
        let (handle, signal) = cancellation_pair();
        handle.cancel();

        let roster = compute_roster(
            &session(),
            &refs(&[("p-1", "Ana")]),
            &fetcher,
            &PatientSummaryBuilder::default(),
            1,
            signal,
        )
        .await;

        assert!(roster.cancelled);
        assert_eq!(fetcher.calls(), 0);
        assert_eq!(
            roster.rows[0].data_status,
            DataStatus::Partial(PartialReason::Cancelled)
        );
    }

    #[tokio::test]
    async fn test_duplicate_patients_are_listed_once() {
        let fetcher = ScriptedFetcher::new();
        let roster = compute_roster(
            &session(),
            &refs(&[("p-1", "Ana"), ("p-1", "Ana")]),
            &fetcher,
            &PatientSummaryBuilder::default(),
            2,
            CancellationSignal::never(),
        )
        .await;
        assert_eq!(roster.rows.len(), 1);
    }
}
