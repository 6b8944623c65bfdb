use prenatal_watch_data::models::ReportRecord;

use crate::entities::conversions::convert_to_domain_reports;
use crate::entities::{Report, RiskTier};
use crate::errors::TriageError;

/// Symptoms that make a report critical, matched case-insensitively
pub const SEVERE_SYMPTOMS: [&str; 3] = ["contractions", "bleeding", "high blood pressure"];

/// A report with more symptoms than this needs attention
pub const ATTENTION_SYMPTOM_THRESHOLD: usize = 3;

/// Pick the most recent report by date.
///
/// When several reports share the latest date, the one supplied last wins.
pub fn most_recent_report(reports: &[Report]) -> Option<&Report> {
    // max_by_key returns the last of equal maxima
    reports.iter().max_by_key(|report| report.date)
}

/// Whether a symptom is in the severe vocabulary (whole-string match, any case)
pub fn is_severe_symptom(symptom: &str) -> bool {
    let lowered = symptom.to_lowercase();
    SEVERE_SYMPTOMS.iter().any(|severe| lowered == *severe)
}

/// Classify a patient's risk from the most recent report of the history.
///
/// An empty history is `Normal`.
pub fn classify_risk(reports: &[Report]) -> RiskTier {
    let Some(latest) = most_recent_report(reports) else {
        return RiskTier::Normal;
    };

    if latest.symptoms.iter().any(|s| is_severe_symptom(s)) {
        RiskTier::Critical
    } else if latest.symptoms.len() > ATTENTION_SYMPTOM_THRESHOLD {
        RiskTier::Attention
    } else {
        RiskTier::Normal
    }
}

/// Classify raw report records, rejecting structurally invalid ones
pub fn classify_records(records: &[ReportRecord]) -> Result<RiskTier, TriageError> {
    let reports = convert_to_domain_reports(records)?;
    Ok(classify_risk(&reports))
}
