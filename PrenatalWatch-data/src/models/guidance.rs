use serde::{Deserialize, Serialize};

/// Storage model for a clinician to patient guidance message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceMessageRecord {
    pub id: String,
    pub patient_id: String,
    pub clinician_id: String,

    /// Date the message was sent as `YYYY-MM-DD`
    pub date: String,

    pub text: String,
}

/// Input data for storing a new guidance message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGuidanceMessageRecord {
    pub clinician_id: String,
    pub date: String,
    pub text: String,
}
