use indexmap::IndexSet;
use prenatal_watch_data::models::{
    ClinicalEntryRecord, GuidanceMessageRecord, MedicationRecord, NewClinicalEntryRecord, NewGuidanceMessageRecord,
    NewMedicationRecord, NewReportRecord, PatientRecord, ReportRecord, VitalsRecord, REPORT_SCHEMA_VERSION,
};

use crate::entities::clinical::{ClinicalEntry, CreateClinicalEntryRequest, GuidanceMessage, SendGuidanceRequest};

use crate::entities::medication::{Medication, MedicationState, PrescribeMedicationRequest};
use crate::entities::report::{parse_report_date, CreateReportRequest, Mood, Report, Vitals};
use crate::entities::summary::PatientRef;
use crate::errors::TriageError;

/// Conversion functions between domain entities and data models
/// These follow the pattern convert_to_[target_layer]_[model_name]

/// Convert a stored report record into a validated domain report.
///
/// Fails with `TriageError::Validation` when the record has no usable date
/// or mood, or was written with a newer schema.
pub fn convert_to_domain_report(record: ReportRecord) -> Result<Report, TriageError> {
    if record.schema_version > REPORT_SCHEMA_VERSION {
        return Err(TriageError::Validation(format!(
            "report {} uses unsupported schema version {}",
            record.id, record.schema_version
        )));
    }

    let date = match record.date.as_deref() {
        Some(raw) => parse_report_date(raw)
            .map_err(|msg| TriageError::Validation(format!("report {}: {}", record.id, msg)))?,
        None => {
            return Err(TriageError::Validation(format!("report {} has no date", record.id)));
        }
    };

    let mood = match record.mood.as_deref() {
        Some(raw) => raw
            .parse::<Mood>()
            .map_err(|msg| TriageError::Validation(format!("report {}: {}", record.id, msg)))?,
        None => {
            return Err(TriageError::Validation(format!("report {} has no mood", record.id)));
        }
    };

    // Set semantics, first occurrence keeps its position
    let symptoms: IndexSet<String> = record.symptoms.into_iter().collect();

    Ok(Report {
        id: record.id,
        patient_id: record.patient_id,
        date,
        description: record.description,
        mood,
        symptoms: symptoms.into_iter().collect(),
        vitals: convert_to_domain_vitals(record.vitals),
        occurrence_note: record.occurrence_note,
    })
}

/// Convert a whole history, failing on the first invalid record
pub fn convert_to_domain_reports(records: &[ReportRecord]) -> Result<Vec<Report>, TriageError> {
    records.iter().cloned().map(convert_to_domain_report).collect()
}

fn convert_to_domain_vitals(vitals: Option<VitalsRecord>) -> Vitals {
    match vitals {
        Some(v) => Vitals {
            // Blank form fields mean "not measured"
            blood_pressure: v.blood_pressure.filter(|bp| !bp.trim().is_empty()),
            heart_rate: v.heart_rate,
        },
        None => Vitals::default(),
    }
}

/// Convert a domain create request into a data layer record
pub fn convert_to_data_new_report(request: &CreateReportRequest) -> NewReportRecord {
    let vitals = if request.blood_pressure.is_some() || request.heart_rate.is_some() {
        Some(VitalsRecord {
            blood_pressure: request.blood_pressure.clone(),
            heart_rate: request.heart_rate,
        })
    } else {
        None
    };

    NewReportRecord {
        date: request.date.trim().to_string(),
        description: request.description.clone(),
        mood: request.mood.trim().to_lowercase(),
        symptoms: request.symptoms.iter().map(|s| s.trim().to_string()).collect(),
        vitals,
        occurrence_note: request.occurrence_note.clone(),
    }
}

/// Convert a stored medication row into a domain medication
pub fn convert_to_domain_medication(record: MedicationRecord) -> Result<Medication, TriageError> {
    let started_on = parse_report_date(&record.start_date)
        .map_err(|msg| TriageError::Validation(format!("medication {}: {}", record.id, msg)))?;

    let state = if record.active {
        MedicationState::Active
    } else {
        let ended_on = record
            .end_date
            .as_deref()
            .map(parse_report_date)
            .transpose()
            .map_err(|msg| TriageError::Validation(format!("medication {}: {}", record.id, msg)))?;
        MedicationState::Inactive { ended_on }
    };

    Ok(Medication {
        id: record.id,
        patient_id: record.patient_id,
        name: record.name,
        dosage: record.dosage,
        frequency: record.frequency,
        started_on,
        state,
        version: record.version,
    })
}

/// Convert a prescription request into a data layer record starting on `start_date`
pub fn convert_to_data_new_medication(
    request: &PrescribeMedicationRequest,
    start_date: chrono::NaiveDate,
) -> NewMedicationRecord {
    NewMedicationRecord {
        name: request.name.trim().to_string(),
        dosage: request.dosage.trim().to_string(),
        frequency: request.frequency.trim().to_string(),
        start_date: start_date.format("%Y-%m-%d").to_string(),
    }
}

/// Convert a directory entry into a roster reference
pub fn convert_to_domain_patient(record: PatientRecord) -> PatientRef {
    PatientRef {
        patient_id: record.id,
        display_name: record.display_name,
    }
}

/// Convert a stored encounter note; a malformed date is a validation error
pub fn convert_to_domain_clinical_entry(record: ClinicalEntryRecord) -> Result<ClinicalEntry, TriageError> {
    let date = parse_report_date(&record.date)
        .map_err(|msg| TriageError::Validation(format!("clinical entry {}: {}", record.id, msg)))?;

    Ok(ClinicalEntry {
        id: record.id,
        patient_id: record.patient_id,
        clinician_id: record.clinician_id,
        date,
        description: record.description,
        prescribed_medications: record.prescribed_medications,
        actions: record.actions,
    })
}

/// Convert an encounter request into a data layer record.
///
/// Prescription names are trimmed and empty ones dropped.
pub fn convert_to_data_new_clinical_entry(
    request: &CreateClinicalEntryRequest,
    clinician_id: &str,
    date: chrono::NaiveDate,
) -> NewClinicalEntryRecord {
    NewClinicalEntryRecord {
        clinician_id: clinician_id.to_string(),
        date: date.format("%Y-%m-%d").to_string(),
        description: request.description.trim().to_string(),
        prescribed_medications: request
            .prescribed_medications
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        actions: request.actions.trim().to_string(),
    }
}

/// Convert a stored guidance message; a malformed date is a validation error
pub fn convert_to_domain_guidance(record: GuidanceMessageRecord) -> Result<GuidanceMessage, TriageError> {
    let date = parse_report_date(&record.date)
        .map_err(|msg| TriageError::Validation(format!("guidance {}: {}", record.id, msg)))?;

    Ok(GuidanceMessage {
        id: record.id,
        patient_id: record.patient_id,
        clinician_id: record.clinician_id,
        date,
        text: record.text,
    })
}

pub fn convert_to_data_new_guidance(
    request: &SendGuidanceRequest,
    clinician_id: &str,
    date: chrono::NaiveDate,
) -> NewGuidanceMessageRecord {
    NewGuidanceMessageRecord {
        clinician_id: clinician_id.to_string(),
        date: date.format("%Y-%m-%d").to_string(),
        text: request.text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: Option<&str>, mood: Option<&str>, symptoms: &[&str]) -> ReportRecord {
        ReportRecord {
            id: "r-1".to_string(),
            patient_id: "p-1".to_string(),
            schema_version: REPORT_SCHEMA_VERSION,
            date: date.map(str::to_string),
            description: None,
            mood: mood.map(str::to_string),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            vitals: None,
            occurrence_note: None,
        }
    }

    #[test]
    fn test_convert_valid_report() {
        let report = convert_to_domain_report(record(Some("2024-01-10"), Some("happy"), &["fatigue"])).unwrap();
        assert_eq!(report.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(report.mood, Mood::Happy);
        assert!(report.vitals.is_unknown());
    }

    #[test]
    fn test_missing_date_is_validation_error() {
        let result = convert_to_domain_report(record(None, Some("happy"), &[]));
        assert!(matches!(result, Err(TriageError::Validation(msg)) if msg.contains("no date")));
    }

    #[test]
    fn test_malformed_date_is_validation_error() {
        let result = convert_to_domain_report(record(Some("2024-02-30"), Some("happy"), &[]));
        assert!(matches!(result, Err(TriageError::Validation(_))));
    }

    #[test]
    fn test_unknown_mood_is_validation_error() {
        let result = convert_to_domain_report(record(Some("2024-01-10"), Some("grumpy"), &[]));
        assert!(matches!(result, Err(TriageError::Validation(_))));
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let mut newer = record(Some("2024-01-10"), Some("happy"), &[]);
        newer.schema_version = REPORT_SCHEMA_VERSION + 1;
        assert!(matches!(convert_to_domain_report(newer), Err(TriageError::Validation(_))));
    }

    #[test]
    fn test_duplicate_symptoms_collapse_in_order() {
        let report = convert_to_domain_report(record(
            Some("2024-01-10"),
            Some("normal"),
            &["edema", "fatigue", "edema", "Edema"],
        ))
        .unwrap();
        assert_eq!(report.symptoms, vec!["edema", "fatigue", "Edema"]);
    }

    #[test]
    fn test_blank_vitals_are_unknown() {
        let mut with_vitals = record(Some("2024-01-10"), Some("normal"), &[]);
        with_vitals.vitals = Some(VitalsRecord {
            blood_pressure: Some("  ".to_string()),
            heart_rate: None,
        });
        let report = convert_to_domain_report(with_vitals).unwrap();
        assert!(report.vitals.is_unknown());
    }

    #[test]
    fn test_new_clinical_entry_drops_empty_prescriptions() {
        let request = CreateClinicalEntryRequest {
            description: " Routine check ".to_string(),
            prescribed_medications: vec![" Iron ".to_string(), "".to_string(), "  ".to_string()],
            actions: "None".to_string(),
        };
        let date = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        let record = convert_to_data_new_clinical_entry(&request, "doc-1", date);

        assert_eq!(record.description, "Routine check");
        assert_eq!(record.prescribed_medications, vec!["Iron".to_string()]);
        assert_eq!(record.date, "2024-01-12");
    }

    #[test]
    fn test_guidance_with_bad_date_is_validation_error() {
        let result = convert_to_domain_guidance(GuidanceMessageRecord {
            id: "or-1".to_string(),
            patient_id: "p-1".to_string(),
            clinician_id: "doc-1".to_string(),
            date: "yesterday".to_string(),
            text: "Rest".to_string(),
        });
        assert!(matches!(result, Err(TriageError::Validation(_))));
    }

    #[test]
    fn test_inactive_medication_without_end_date() {
        let medication = convert_to_domain_medication(MedicationRecord {
            id: "med-1".to_string(),
            patient_id: "p-1".to_string(),
            name: "Iron".to_string(),
            dosage: "40mg".to_string(),
            frequency: "daily".to_string(),
            active: false,
            start_date: "2023-10-01".to_string(),
            end_date: None,
            version: 4,
        })
        .unwrap();
        assert_eq!(medication.state, MedicationState::Inactive { ended_on: None });
        assert!(!medication.is_active());
    }
}
