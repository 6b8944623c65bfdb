use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of the user a request is made on behalf of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    /// Pregnant end-user submitting diary reports
    Patient,
    /// Caregiver viewing the roster and patient detail
    Clinician,
}

impl fmt::Display for SessionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionRole::Patient => write!(f, "patient"),
            SessionRole::Clinician => write!(f, "clinician"),
        }
    }
}

/// Caller identity passed explicitly into every repository call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_id: String,
    pub role: SessionRole,
}

impl SessionContext {
    pub fn clinician(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: SessionRole::Clinician,
        }
    }

    pub fn patient(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: SessionRole::Patient,
        }
    }
}
