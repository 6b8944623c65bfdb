use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Vital signs from the most recent report; absent fields were not reported
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicVitals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
}

/// Symptom with the number of reports mentioning it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicSymptomCount {
    pub symptom: String,
    pub count: usize,
}

/// Clinical summary of one patient
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicPatientSummary {
    pub patient_id: String,

    pub display_name: String,

    pub total_reports: usize,

    /// Date of the most recent report, absent when there are none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_report_date: Option<NaiveDate>,

    /// "normal", "attention" or "critical"
    pub risk_tier: String,

    /// Traffic-light color: "green", "yellow" or "red"
    pub risk_color: String,

    pub top_symptoms: Vec<PublicSymptomCount>,

    /// Absent when the medication source could not be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_medication_count: Option<usize>,

    pub latest_vitals: PublicVitals,

    /// "complete" or "partial"
    pub data_status: String,

    /// Why the data is partial, e.g. "report-fetch-failed"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_reason: Option<String>,
}

/// Dashboard header counters
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicRosterOverview {
    pub total_patients: usize,
    pub normal: usize,
    /// Patients at attention or critical tier
    pub needs_attention: usize,
    /// Rows built from partial data
    pub incomplete: usize,
}

/// Caregiver roster sorted by severity, then name
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicRoster {
    pub cancelled: bool,
    pub overview: PublicRosterOverview,
    pub rows: Vec<PublicPatientSummary>,
}

/// Query parameters for the symptom ranking
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct SymptomRankingQuery {
    /// Maximum number of symptoms returned (default from configuration)
    pub top_k: Option<usize>,
}

/// Symptoms the patient diary form offers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SymptomVocabulary {
    pub symptoms: Vec<String>,
}

/// Everything the patient detail page shows
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicPatientDetail {
    pub summary: PublicPatientSummary,
    /// Most recent first
    pub reports: Vec<crate::entities::report::PublicReport>,
    pub active_medications: Vec<crate::entities::medication::PublicMedication>,
}
