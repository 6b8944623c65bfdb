use serde::{Deserialize, Serialize};

/// Current version of the diary report record layout
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Storage model for a diary report.
///
/// Records arrive as generic structured data, so every field the transport
/// may omit is optional here. The domain layer decides what is mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Unique identifier for the report
    pub id: String,

    /// Patient who submitted the report
    pub patient_id: String,

    /// Layout version of this record
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Calendar date of the report as `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,

    /// Free text description
    #[serde(default)]
    pub description: Option<String>,

    /// Mood label (happy, normal, sad, anxious)
    #[serde(default)]
    pub mood: Option<String>,

    /// Symptoms in the order they were submitted
    #[serde(default)]
    pub symptoms: Vec<String>,

    /// Optional vital signs
    #[serde(default)]
    pub vitals: Option<VitalsRecord>,

    /// Optional note about an occurrence
    #[serde(default)]
    pub occurrence_note: Option<String>,
}

/// Storage model for vital signs attached to a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalsRecord {
    /// Blood pressure as entered, e.g. "120/80"
    #[serde(default)]
    pub blood_pressure: Option<String>,

    /// Heart rate in beats per minute
    #[serde(default)]
    pub heart_rate: Option<f64>,
}

/// Input data for storing a new diary report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReportRecord {
    pub date: String,
    pub description: Option<String>,
    pub mood: String,
    pub symptoms: Vec<String>,
    pub vitals: Option<VitalsRecord>,
    pub occurrence_note: Option<String>,
}

fn default_schema_version() -> u32 {
    REPORT_SCHEMA_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_sparse_record() {
        let json = r#"{"id": "r-1", "patient_id": "p-1", "symptoms": ["fatigue"]}"#;
        let record: ReportRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.schema_version, REPORT_SCHEMA_VERSION);
        assert_eq!(record.date, None);
        assert_eq!(record.vitals, None);
        assert_eq!(record.symptoms, vec!["fatigue".to_string()]);
    }

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "id": "r-2",
            "patient_id": "p-1",
            "schema_version": 1,
            "date": "2024-01-10",
            "description": "Tired after work",
            "mood": "anxious",
            "symptoms": ["fatigue", "headache"],
            "vitals": {"blood_pressure": "130/85", "heart_rate": 88},
            "occurrence_note": "Felt dizzy in the afternoon"
        }"#;
        let record: ReportRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.date.as_deref(), Some("2024-01-10"));
        let vitals = record.vitals.unwrap();
        assert_eq!(vitals.blood_pressure.as_deref(), Some("130/85"));
        assert_eq!(vitals.heart_rate, Some(88.0));
    }

    #[test]
    fn test_fractional_heart_rate_is_kept() {
        let json = r#"{
            "id": "r-3",
            "patient_id": "p-1",
            "date": "2024-01-11",
            "mood": "normal",
            "vitals": {"heart_rate": 72.5}
        }"#;
        let record: ReportRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.vitals.and_then(|v| v.heart_rate), Some(72.5));
    }
}
