use serde::{Deserialize, Serialize};

/// Storage model for a prescribed medication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRecord {
    /// Unique identifier for the medication row
    pub id: String,

    /// Patient the medication was prescribed to
    pub patient_id: String,

    /// Medication name
    pub name: String,

    /// Dosage, e.g. "500mg"
    pub dosage: String,

    /// Frequency, e.g. "twice a day"
    pub frequency: String,

    /// Whether the medication is currently in use
    pub active: bool,

    /// Start date as `YYYY-MM-DD`
    pub start_date: String,

    /// End date as `YYYY-MM-DD`, set when the medication is deactivated
    pub end_date: Option<String>,

    /// Concurrency token, incremented on every write
    pub version: u64,
}

/// Input data for storing a new medication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMedicationRecord {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: String,
}
