use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public representation of a diary report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicReport {
    pub id: String,

    pub date: NaiveDate,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// One of happy, normal, sad, anxious
    pub mood: String,

    pub symptoms: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurrence_note: Option<String>,
}

/// Request payload for submitting a diary report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateReportBody {
    /// Calendar date as YYYY-MM-DD
    #[schema(example = "2024-01-10")]
    pub date: String,

    #[serde(default)]
    pub description: Option<String>,

    /// One of happy, normal, sad, anxious
    #[schema(example = "normal")]
    pub mood: String,

    #[serde(default)]
    pub symptoms: Vec<String>,

    /// Free text such as "120/80"
    #[serde(default)]
    pub blood_pressure: Option<String>,

    #[serde(default)]
    pub heart_rate: Option<f64>,

    #[serde(default)]
    pub occurrence_note: Option<String>,
}
