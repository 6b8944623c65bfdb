use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public representation of an encounter note
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicClinicalEntry {
    pub id: String,
    pub clinician_id: String,
    pub date: NaiveDate,
    pub description: String,
    pub prescribed_medications: Vec<String>,
    pub actions: String,
}

/// Request payload for recording an encounter
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateClinicalEntryBody {
    #[schema(example = "Reported contractions and back pain")]
    pub description: String,

    #[serde(default)]
    pub prescribed_medications: Vec<String>,

    #[serde(default)]
    pub actions: String,
}

/// Public representation of a guidance message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicGuidanceMessage {
    pub id: String,
    pub clinician_id: String,
    pub date: NaiveDate,
    pub text: String,
}

/// Request payload for sending guidance to a patient
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendGuidanceBody {
    #[schema(example = "Drink more water and rest")]
    pub text: String,
}
