use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Whether a medication is in use.
///
/// Rows are never deleted: deactivating one moves it to `Inactive` and keeps
/// the history. Legacy rows may be inactive without a recorded end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum MedicationState {
    Active,
    Inactive { ended_on: Option<NaiveDate> },
}

/// A prescribed medication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub id: String,
    pub patient_id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub started_on: NaiveDate,
    pub state: MedicationState,
    /// Token the next write must present
    pub version: u64,
}

impl Medication {
    pub fn is_active(&self) -> bool {
        matches!(self.state, MedicationState::Active)
    }
}

/// A patient's medications split into current and past
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationList {
    pub active: Vec<Medication>,
    pub history: Vec<Medication>,
}

impl MedicationList {
    pub fn from_medications(medications: Vec<Medication>) -> Self {
        let (active, history) = medications.into_iter().partition(Medication::is_active);
        Self { active, history }
    }
}

/// Request for prescribing a new medication
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PrescribeMedicationRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Dosage must be between 1 and 100 characters"))]
    pub dosage: String,

    #[validate(length(min = 1, max = 100, message = "Frequency must be between 1 and 100 characters"))]
    pub frequency: String,
}
