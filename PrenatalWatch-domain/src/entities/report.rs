use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Symptoms offered by the patient diary form
pub const KNOWN_SYMPTOMS: [&str; 8] = [
    "nausea",
    "fatigue",
    "back pain",
    "swelling",
    "insomnia",
    "headache",
    "edema",
    "contractions",
];

/// Self-reported mood on a diary report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Normal,
    Sad,
    Anxious,
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "normal" => Ok(Mood::Normal),
            "sad" => Ok(Mood::Sad),
            "anxious" => Ok(Mood::Anxious),
            other => Err(format!("unknown mood '{}'", other)),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mood::Happy => "happy",
            Mood::Normal => "normal",
            Mood::Sad => "sad",
            Mood::Anxious => "anxious",
        };
        write!(f, "{}", label)
    }
}

/// Vital signs; `None` means the value was not reported
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<f64>,
}

impl Vitals {
    pub fn is_unknown(&self) -> bool {
        self.blood_pressure.is_none() && self.heart_rate.is_none()
    }
}

/// A validated diary report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub patient_id: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub mood: Mood,
    /// Distinct symptoms in submission order
    pub symptoms: Vec<String>,
    pub vitals: Vitals,
    pub occurrence_note: Option<String>,
}

/// Request for submitting a new diary report
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReportRequest {
    /// Calendar date as `YYYY-MM-DD`
    #[validate(custom = "validate_report_date")]
    pub date: String,

    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,

    /// One of happy, normal, sad, anxious
    #[validate(custom = "validate_mood")]
    pub mood: String,

    #[validate(length(max = 32, message = "At most 32 symptoms per report"))]
    pub symptoms: Vec<String>,

    #[validate(length(max = 16, message = "Blood pressure cannot exceed 16 characters"))]
    pub blood_pressure: Option<String>,

    #[validate(range(min = 20.0, max = 250.0, message = "Heart rate must be between 20 and 250"))]
    pub heart_rate: Option<f64>,

    #[validate(length(max = 2000, message = "Occurrence note cannot exceed 2000 characters"))]
    pub occurrence_note: Option<String>,
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_report_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", raw))
}

fn validate_report_date(date: &str) -> Result<(), validator::ValidationError> {
    parse_report_date(date).map(|_| ()).map_err(|msg| {
        let mut err = validator::ValidationError::new("date");
        err.message = Some(msg.into());
        err
    })
}

fn validate_mood(mood: &str) -> Result<(), validator::ValidationError> {
    Mood::from_str(mood).map(|_| ()).map_err(|msg| {
        let mut err = validator::ValidationError::new("mood");
        err.message = Some(msg.into());
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateReportRequest {
        CreateReportRequest {
            date: "2024-01-10".to_string(),
            description: Some("Slept badly".to_string()),
            mood: "sad".to_string(),
            symptoms: vec!["insomnia".to_string()],
            blood_pressure: Some("120/80".to_string()),
            heart_rate: Some(80.0),
            occurrence_note: None,
        }
    }

    #[test]
    fn test_mood_parsing() {
        assert_eq!("Anxious".parse::<Mood>(), Ok(Mood::Anxious));
        assert!("grumpy".parse::<Mood>().is_err());
        assert_eq!(Mood::Happy.to_string(), "happy");
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_request_with_bad_date_and_mood() {
        let mut invalid = request();
        invalid.date = "10/01/2024".to_string();
        invalid.mood = "grumpy".to_string();

        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("date"));
        assert!(fields.contains_key("mood"));
    }

    #[test]
    fn test_request_with_out_of_range_heart_rate() {
        let mut invalid = request();
        invalid.heart_rate = Some(400.0);
        assert!(invalid.validate().is_err());
    }
}
