use prenatal_watch_data::repository::RepositoryError;
use thiserror::Error;

/// Errors raised by the triage engine and the services around it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriageError {
    /// Structurally invalid input, e.g. a report without a date
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown patient or record
    #[error("Not found: {0}")]
    NotFound(String),

    /// The session's role may not perform the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A dependency could not be reached
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// A write lost an optimistic concurrency check
    #[error("Version conflict: {0}")]
    VersionConflict(String),
}

/// Map repository errors to domain errors
pub fn map_repo_error(err: RepositoryError) -> TriageError {
    match err {
        RepositoryError::NotFound(msg) => TriageError::NotFound(msg),
        RepositoryError::Validation(msg) => TriageError::Validation(msg),
        RepositoryError::Unavailable(msg) | RepositoryError::Lock(msg) => TriageError::Unavailable(msg),
        conflict @ RepositoryError::VersionConflict { .. } => TriageError::VersionConflict(conflict.to_string()),
    }
}

impl From<RepositoryError> for TriageError {
    fn from(err: RepositoryError) -> Self {
        map_repo_error(err)
    }
}
