// Repository module structure
mod clinical;
pub mod errors;
mod guidance;
mod in_memory;
mod medication;
mod patient;
mod report;

// Re-export commonly used types
pub use clinical::{ClinicalRecordRepository, ClinicalRecordRepositoryTrait};
pub use errors::RepositoryError;
pub use guidance::{GuidanceRepository, GuidanceRepositoryTrait};
pub use in_memory::{Dependency, InMemoryStorage};
pub use medication::{MedicationRepository, MedicationRepositoryTrait};
pub use patient::{PatientDirectory, PatientDirectoryTrait};
pub use report::{ReportRepository, ReportRepositoryTrait};
