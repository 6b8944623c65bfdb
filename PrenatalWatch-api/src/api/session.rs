use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use thiserror::Error;

use prenatal_watch_domain::{SessionContext, SessionRole};

use crate::entities::ErrorResponse;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Reasons a request carries no usable session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Missing {0} header")]
    Missing(&'static str),

    #[error("Header {0} is not valid text")]
    NotText(&'static str),

    #[error("Unknown role '{0}', expected patient or clinician")]
    UnknownRole(String),
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, SessionError> {
    let value = headers.get(name).ok_or(SessionError::Missing(name))?;
    let value = value.to_str().map_err(|_| SessionError::NotText(name))?.trim();
    if value.is_empty() {
        return Err(SessionError::Missing(name));
    }
    Ok(value)
}

/// Build the caller identity from the `X-User-Id` and `X-User-Role` headers
pub fn session_from_headers(headers: &HeaderMap) -> Result<SessionContext, SessionError> {
    let user_id = header(headers, USER_ID_HEADER)?;
    let role = match header(headers, USER_ROLE_HEADER)?.to_lowercase().as_str() {
        "patient" => SessionRole::Patient,
        "clinician" => SessionRole::Clinician,
        other => return Err(SessionError::UnknownRole(other.to_string())),
    };

    Ok(SessionContext {
        user_id: user_id.to_string(),
        role,
    })
}

/// Extractor handing the caller identity to handlers
#[derive(Debug, Clone)]
pub struct Session(pub SessionContext);

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_from_headers(&parts.headers)
            .map(Session)
            .map_err(|err| ErrorResponse::bad_request(&err.to_string()))
    }
}
