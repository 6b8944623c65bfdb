// Domain entities and value objects
pub mod clinical;
pub mod conversions;
pub mod medication;
pub mod report;
pub mod summary;

// Re-export common types for easier imports
pub use clinical::{ClinicalEntry, CreateClinicalEntryRequest, GuidanceMessage, SendGuidanceRequest};
pub use medication::{Medication, MedicationList, MedicationState, PrescribeMedicationRequest};
pub use report::{CreateReportRequest, Mood, Report, Vitals, KNOWN_SYMPTOMS};
pub use summary::{
    roster_order, DataStatus, PartialReason, PatientDetail, PatientRef, PatientSummary, RiskTier, Roster,
    RosterOverview, SymptomCount,
};
