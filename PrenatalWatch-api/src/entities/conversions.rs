use prenatal_watch_domain::entities::{
    ClinicalEntry, CreateClinicalEntryRequest, CreateReportRequest, DataStatus, GuidanceMessage, Medication,
    MedicationList, MedicationState, PatientDetail, PatientSummary, PrescribeMedicationRequest, Report, Roster,
    SendGuidanceRequest, SymptomCount, Vitals,
};

use crate::entities::clinical::{CreateClinicalEntryBody, PublicClinicalEntry, PublicGuidanceMessage, SendGuidanceBody};
use crate::entities::medication::{PrescribeMedicationBody, PublicMedication, PublicMedicationList};
use crate::entities::report::{CreateReportBody, PublicReport};
use crate::entities::summary::{
    PublicPatientDetail, PublicPatientSummary, PublicRoster, PublicRosterOverview, PublicSymptomCount, PublicVitals,
};

/// Conversion functions between domain entities and public entities
/// These follow the pattern convert_to_[target_layer]_[model_name]

pub fn convert_to_public_vitals(vitals: Vitals) -> PublicVitals {
    PublicVitals {
        blood_pressure: vitals.blood_pressure,
        heart_rate: vitals.heart_rate,
    }
}

pub fn convert_to_public_symptom_count(count: SymptomCount) -> PublicSymptomCount {
    PublicSymptomCount {
        symptom: count.symptom,
        count: count.count,
    }
}

pub fn convert_to_public_summary(summary: PatientSummary) -> PublicPatientSummary {
    let (data_status, partial_reason) = match summary.data_status {
        DataStatus::Complete => ("complete", None),
        DataStatus::Partial(reason) => ("partial", Some(reason.as_str().to_string())),
    };

    PublicPatientSummary {
        patient_id: summary.patient_id,
        display_name: summary.display_name,
        total_reports: summary.total_reports,
        last_report_date: summary.last_report_date,
        risk_tier: summary.risk_tier.to_string().to_lowercase(),
        risk_color: summary.risk_tier.color().to_string(),
        top_symptoms: summary
            .top_symptoms
            .into_iter()
            .map(convert_to_public_symptom_count)
            .collect(),
        active_medication_count: summary.active_medication_count,
        latest_vitals: convert_to_public_vitals(summary.latest_vitals),
        data_status: data_status.to_string(),
        partial_reason,
    }
}

pub fn convert_to_public_roster(roster: Roster) -> PublicRoster {
    let overview = roster.overview();
    PublicRoster {
        cancelled: roster.cancelled,
        overview: PublicRosterOverview {
            total_patients: overview.total_patients,
            normal: overview.normal,
            needs_attention: overview.needs_attention,
            incomplete: overview.incomplete,
        },
        rows: roster.rows.into_iter().map(convert_to_public_summary).collect(),
    }
}

pub fn convert_to_public_report(report: Report) -> PublicReport {
    PublicReport {
        id: report.id,
        date: report.date,
        description: report.description,
        mood: report.mood.to_string(),
        symptoms: report.symptoms,
        blood_pressure: report.vitals.blood_pressure,
        heart_rate: report.vitals.heart_rate,
        occurrence_note: report.occurrence_note,
    }
}

pub fn convert_to_domain_create_report(body: CreateReportBody) -> CreateReportRequest {
    CreateReportRequest {
        date: body.date,
        description: body.description,
        mood: body.mood,
        symptoms: body.symptoms,
        blood_pressure: body.blood_pressure,
        heart_rate: body.heart_rate,
        occurrence_note: body.occurrence_note,
    }
}

pub fn convert_to_public_medication(medication: Medication) -> PublicMedication {
    let (active, ended_on) = match medication.state {
        MedicationState::Active => (true, None),
        MedicationState::Inactive { ended_on } => (false, ended_on),
    };

    PublicMedication {
        id: medication.id,
        name: medication.name,
        dosage: medication.dosage,
        frequency: medication.frequency,
        started_on: medication.started_on,
        active,
        ended_on,
        version: medication.version,
    }
}

pub fn convert_to_public_medication_list(list: MedicationList) -> PublicMedicationList {
    PublicMedicationList {
        active: list.active.into_iter().map(convert_to_public_medication).collect(),
        history: list.history.into_iter().map(convert_to_public_medication).collect(),
    }
}

pub fn convert_to_domain_prescription(body: PrescribeMedicationBody) -> PrescribeMedicationRequest {
    PrescribeMedicationRequest {
        name: body.name,
        dosage: body.dosage,
        frequency: body.frequency,
    }
}

pub fn convert_to_public_detail(detail: PatientDetail) -> PublicPatientDetail {
    PublicPatientDetail {
        summary: convert_to_public_summary(detail.summary),
        reports: detail.reports.into_iter().map(convert_to_public_report).collect(),
        active_medications: detail
            .active_medications
            .into_iter()
            .map(convert_to_public_medication)
            .collect(),
    }
}

pub fn convert_to_public_clinical_entry(entry: ClinicalEntry) -> PublicClinicalEntry {
    PublicClinicalEntry {
        id: entry.id,
        clinician_id: entry.clinician_id,
        date: entry.date,
        description: entry.description,
        prescribed_medications: entry.prescribed_medications,
        actions: entry.actions,
    }
}

pub fn convert_to_domain_clinical_entry(body: CreateClinicalEntryBody) -> CreateClinicalEntryRequest {
    CreateClinicalEntryRequest {
        description: body.description,
        prescribed_medications: body.prescribed_medications,
        actions: body.actions,
    }
}

pub fn convert_to_public_guidance(message: GuidanceMessage) -> PublicGuidanceMessage {
    PublicGuidanceMessage {
        id: message.id,
        clinician_id: message.clinician_id,
        date: message.date,
        text: message.text,
    }
}

pub fn convert_to_domain_guidance(body: SendGuidanceBody) -> SendGuidanceRequest {
    SendGuidanceRequest { text: body.text }
}
