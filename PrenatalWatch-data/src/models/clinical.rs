use serde::{Deserialize, Serialize};

/// Storage model for a clinician-authored encounter note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalEntryRecord {
    pub id: String,

    /// Patient the encounter was about
    pub patient_id: String,

    /// Clinician who wrote the entry
    pub clinician_id: String,

    /// Encounter date as `YYYY-MM-DD`
    pub date: String,

    /// What happened during the encounter
    pub description: String,

    /// Medication names prescribed during the encounter
    #[serde(default)]
    pub prescribed_medications: Vec<String>,

    /// Actions taken by the clinician
    #[serde(default)]
    pub actions: String,
}

/// Input data for storing a new encounter note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClinicalEntryRecord {
    pub clinician_id: String,
    pub date: String,
    pub description: String,
    pub prescribed_medications: Vec<String>,
    pub actions: String,
}
