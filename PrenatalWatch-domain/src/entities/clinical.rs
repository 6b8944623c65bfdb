use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A clinician-authored encounter note, kept apart from diary reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalEntry {
    pub id: String,
    pub patient_id: String,
    pub clinician_id: String,
    pub date: NaiveDate,
    pub description: String,
    pub prescribed_medications: Vec<String>,
    pub actions: String,
}

/// Request for recording an encounter, dated today by the service
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClinicalEntryRequest {
    #[validate(
        length(max = 2000, message = "Description cannot exceed 2000 characters"),
        custom = "validate_not_blank"
    )]
    pub description: String,

    #[validate(length(max = 32, message = "At most 32 prescriptions per entry"))]
    pub prescribed_medications: Vec<String>,

    #[validate(length(max = 2000, message = "Actions cannot exceed 2000 characters"))]
    pub actions: String,
}

/// Free text sent by a clinician to a patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceMessage {
    pub id: String,
    pub patient_id: String,
    pub clinician_id: String,
    pub date: NaiveDate,
    pub text: String,
}

/// Request for sending a guidance message
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendGuidanceRequest {
    #[validate(
        length(max = 1000, message = "Guidance cannot exceed 1000 characters"),
        custom = "validate_not_blank"
    )]
    pub text: String,
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("cannot be blank".into());
        return Err(err);
    }
    Ok(())
}
