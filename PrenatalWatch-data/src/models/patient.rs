use serde::{Deserialize, Serialize};

/// Storage model for a patient entry in a caregiver's directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Unique identifier for the patient
    pub id: String,

    /// Name shown on the roster
    pub display_name: String,

    /// Weeks of gestation, when known
    pub gestational_weeks: Option<u8>,
}
