pub mod clinical;
pub mod health;
pub mod medications;
pub mod patients;
pub mod reports;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use clinical::{create_clinical_record, list_clinical_records, list_guidance, send_guidance};
pub use health::health_check;
pub use medications::{list_medications, prescribe_medication, toggle_medication};
pub use patients::{get_patient_detail, get_patient_summary, get_roster, get_symptom_ranking, get_symptom_vocabulary};
pub use reports::{create_report, list_reports};
