use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::medication::Medication;
use super::report::{Report, Vitals};

/// Traffic-light risk tier of a patient.
///
/// Variants are declared in ascending severity so the derived ordering gives
/// `Critical > Attention > Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Normal,
    Attention,
    Critical,
}

impl RiskTier {
    /// Color of the roster indicator
    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::Normal => "green",
            RiskTier::Attention => "yellow",
            RiskTier::Critical => "red",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Normal => write!(f, "Normal"),
            RiskTier::Attention => write!(f, "Attention"),
            RiskTier::Critical => write!(f, "Critical"),
        }
    }
}

/// How often a symptom appears across a report history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomCount {
    pub symptom: String,
    pub count: usize,
}

/// Why a summary was built from incomplete data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartialReason {
    ReportFetchFailed,
    MedicationFetchFailed,
    ReportAndMedicationFetchFailed,
    PatientNotFound,
    InvalidReport,
    Cancelled,
}

impl PartialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartialReason::ReportFetchFailed => "report-fetch-failed",
            PartialReason::MedicationFetchFailed => "medication-fetch-failed",
            PartialReason::ReportAndMedicationFetchFailed => "report-and-medication-fetch-failed",
            PartialReason::PatientNotFound => "patient-not-found",
            PartialReason::InvalidReport => "invalid-report",
            PartialReason::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PartialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completeness of the data a summary was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataStatus {
    Complete,
    Partial(PartialReason),
}

impl DataStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, DataStatus::Complete)
    }
}

/// Patient identity as listed on a caregiver roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRef {
    pub patient_id: String,
    pub display_name: String,
}

impl PatientRef {
    pub fn new(patient_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Clinical summary of one patient, built fresh for every view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub patient_id: String,
    pub display_name: String,
    pub total_reports: usize,
    /// `None` when the patient has no reports
    pub last_report_date: Option<NaiveDate>,
    pub risk_tier: RiskTier,
    pub top_symptoms: Vec<SymptomCount>,
    /// `None` when the medication source could not be read
    pub active_medication_count: Option<usize>,
    /// Vitals on the most recent report
    pub latest_vitals: Vitals,
    pub data_status: DataStatus,
}

impl PatientSummary {
    /// Row for a patient whose data could not be used at all
    pub fn unavailable(patient: &PatientRef, reason: PartialReason) -> Self {
        Self {
            patient_id: patient.patient_id.clone(),
            display_name: patient.display_name.clone(),
            total_reports: 0,
            last_report_date: None,
            risk_tier: RiskTier::Normal,
            top_symptoms: Vec::new(),
            active_medication_count: None,
            latest_vitals: Vitals::default(),
            data_status: DataStatus::Partial(reason),
        }
    }
}

/// Roster ordering: highest tier first, then display name, then patient id
pub fn roster_order(a: &PatientSummary, b: &PatientSummary) -> Ordering {
    b.risk_tier
        .cmp(&a.risk_tier)
        .then_with(|| a.display_name.cmp(&b.display_name))
        .then_with(|| a.patient_id.cmp(&b.patient_id))
}

/// Caregiver roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    /// Rows sorted with `roster_order`
    pub rows: Vec<PatientSummary>,
    /// Set when computation was abandoned; unfinished rows are tagged `Cancelled`
    pub cancelled: bool,
}

/// Header counters of the clinician dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterOverview {
    pub total_patients: usize,
    pub normal: usize,
    pub needs_attention: usize,
    pub incomplete: usize,
}

impl Roster {
    pub fn overview(&self) -> RosterOverview {
        self.rows.iter().fold(
            RosterOverview {
                total_patients: self.rows.len(),
                ..RosterOverview::default()
            },
            |mut overview, row| {
                match row.risk_tier {
                    RiskTier::Normal => overview.normal += 1,
                    RiskTier::Attention | RiskTier::Critical => overview.needs_attention += 1,
                }
                if !row.data_status.is_complete() {
                    overview.incomplete += 1;
                }
                overview
            },
        )
    }
}

/// Everything the patient detail view shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDetail {
    pub summary: PatientSummary,
    /// Most recent first
    pub reports: Vec<Report>,
    pub active_medications: Vec<Medication>,
}
