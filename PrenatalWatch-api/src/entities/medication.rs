use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public representation of a prescribed medication
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicMedication {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub started_on: NaiveDate,
    pub active: bool,

    /// Set once the medication was stopped; legacy rows may lack it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_on: Option<NaiveDate>,

    /// Token to send back when toggling
    pub version: u64,
}

/// Medications of a patient split into current and past
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicMedicationList {
    pub active: Vec<PublicMedication>,
    pub history: Vec<PublicMedication>,
}

/// Request payload for prescribing a medication
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrescribeMedicationBody {
    #[schema(example = "Ferrous sulfate")]
    pub name: String,

    #[schema(example = "40mg")]
    pub dosage: String,

    #[schema(example = "once a day")]
    pub frequency: String,
}

/// Request payload for toggling a medication
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToggleMedicationBody {
    /// Version the caller last saw
    pub expected_version: u64,
}
