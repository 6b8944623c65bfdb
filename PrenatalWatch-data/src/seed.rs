//! Small demo dataset so the API has something to show on a fresh start

use crate::models::{
    ClinicalEntryRecord, GuidanceMessageRecord, MedicationRecord, PatientRecord, ReportRecord, VitalsRecord,
    REPORT_SCHEMA_VERSION,
};
use crate::repository::{InMemoryStorage, RepositoryError};

fn report(id: &str, patient_id: &str, date: &str, mood: &str, symptoms: &[&str]) -> ReportRecord {
    ReportRecord {
        id: id.to_string(),
        patient_id: patient_id.to_string(),
        schema_version: REPORT_SCHEMA_VERSION,
        date: Some(date.to_string()),
        description: None,
        mood: Some(mood.to_string()),
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        vitals: None,
        occurrence_note: None,
    }
}

/// Build a storage populated with three patients and a short history each
pub fn demo_storage() -> Result<InMemoryStorage, RepositoryError> {
    let storage = InMemoryStorage::new();

    for (id, name, weeks) in [
        ("gestante-1", "Ana Souza", Some(24)),
        ("gestante-2", "Beatriz Lima", Some(31)),
        ("gestante-3", "Carla Mendes", None),
    ] {
        storage.add_patient(PatientRecord {
            id: id.to_string(),
            display_name: name.to_string(),
            gestational_weeks: weeks,
        })?;
    }

    storage.insert_report(report("r-1", "gestante-1", "2024-01-08", "happy", &["nausea"]))?;
    storage.insert_report(ReportRecord {
        vitals: Some(VitalsRecord {
            blood_pressure: Some("118/76".to_string()),
            heart_rate: Some(82.0),
        }),
        ..report("r-2", "gestante-1", "2024-01-10", "normal", &["nausea", "fatigue"])
    })?;

    storage.insert_report(report("r-3", "gestante-2", "2024-01-09", "sad", &["fatigue", "back pain"]))?;
    storage.insert_report(ReportRecord {
        occurrence_note: Some("Woke up with cramps".to_string()),
        ..report("r-4", "gestante-2", "2024-01-11", "anxious", &["Contractions", "back pain"])
    })?;

    storage.insert_report(report(
        "r-5",
        "gestante-3",
        "2024-01-10",
        "normal",
        &["fatigue", "swelling", "headache", "insomnia"],
    ))?;

    storage.insert_medication(MedicationRecord {
        id: "med-1".to_string(),
        patient_id: "gestante-1".to_string(),
        name: "Folic acid".to_string(),
        dosage: "400mcg".to_string(),
        frequency: "once a day".to_string(),
        active: true,
        start_date: "2023-11-01".to_string(),
        end_date: None,
        version: 1,
    })?;
    storage.insert_medication(MedicationRecord {
        id: "med-2".to_string(),
        patient_id: "gestante-2".to_string(),
        name: "Ferrous sulfate".to_string(),
        dosage: "40mg".to_string(),
        frequency: "twice a day".to_string(),
        active: false,
        start_date: "2023-10-15".to_string(),
        end_date: Some("2023-12-20".to_string()),
        version: 2,
    })?;

    storage.insert_clinical_entry(ClinicalEntryRecord {
        id: "pr-1".to_string(),
        patient_id: "gestante-2".to_string(),
        clinician_id: "med-1".to_string(),
        date: "2024-01-11".to_string(),
        description: "Reported contractions and back pain".to_string(),
        prescribed_medications: vec![],
        actions: "Referred for obstetric evaluation".to_string(),
    })?;

    storage.insert_guidance(GuidanceMessageRecord {
        id: "or-1".to_string(),
        patient_id: "gestante-1".to_string(),
        clinician_id: "med-1".to_string(),
        date: "2024-01-10".to_string(),
        text: "Eat small meals through the day to ease the nausea".to_string(),
    })?;

    Ok(storage)
}
