//! Error taxonomy shared by every console action.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is local to the action that triggered it. Nothing here is
//! retried automatically; callers surface the message and let the user repeat
//! the action.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::folders::FolderError;

/// Minimum password length accepted by the registration wizard.
pub const MIN_PASSWORD_LEN: usize = 6;
/// Minimum length of a tenant identifier typed during registration.
pub const MIN_TENANT_ID_LEN: usize = 3;
/// Minimum length of a tenant display name.
pub const MIN_TENANT_NAME_LEN: usize = 3;
/// Maximum length of a tenant display name.
pub const MAX_TENANT_NAME_LEN: usize = 64;

/// Client-side validation failure. Blocks submission before any network call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A name was empty after trimming.
    #[error("name must not be empty")]
    EmptyName,
    /// One or more required form fields were blank.
    #[error("all fields are required")]
    MissingFields,
    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
    /// Password shorter than [`MIN_PASSWORD_LEN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    /// Tenant id or region missing on the company step.
    #[error("tenant id and region are required")]
    MissingScope,
    /// Tenant id shorter than [`MIN_TENANT_ID_LEN`].
    #[error("tenant id must be at least {min} characters")]
    TenantIdTooShort { min: usize },
    /// Tenant display name outside the accepted length range.
    #[error("tenant name must be between {min} and {max} characters")]
    TenantNameLength { min: usize, max: usize },
    /// Region is not one of the known regions.
    #[error("unknown region: {0}")]
    UnknownRegion(String),
}

/// Failure of a console action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FleetError {
    /// Transport failed, or a non-2xx response had no parseable body.
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered but reported `{ ok: false, error }`.
    #[error("{0}")]
    Api(String),
    /// The backend rejected the cached scope (HTTP 401/403).
    #[error("session is no longer authorized")]
    Unauthorized,
    /// Client-side validation rejected the input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The local folder mirror rejected the operation.
    #[error(transparent)]
    Folder(#[from] FolderError),
    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl FleetError {
    /// Build the error for a non-2xx response.
    ///
    /// 401/403 map to [`FleetError::Unauthorized`]; a body carrying an `error`
    /// string becomes [`FleetError::Api`]; anything else is a network error.
    #[must_use]
    pub fn from_status(status: u16, body: Option<&serde_json::Value>) -> Self {
        if status == 401 || status == 403 {
            return Self::Unauthorized;
        }
        match body.and_then(error_message) {
            Some(message) => Self::Api(message.to_owned()),
            None => Self::Network(format!("request failed with status {status}")),
        }
    }

    /// Whether the caller should drop the cached scope and go to login.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Turn a response status and optional JSON body into the body or an error.
///
/// # Errors
///
/// Non-2xx statuses per [`FleetError::from_status`]; a 2xx response without
/// a JSON body is [`FleetError::Decode`].
pub fn classify_response(status: u16, body: Option<serde_json::Value>) -> Result<serde_json::Value, FleetError> {
    if (200..300).contains(&status) {
        return body.ok_or_else(|| FleetError::Decode("response is not JSON".to_owned()));
    }
    Err(FleetError::from_status(status, body.as_ref()))
}

/// Extract the backend's `error` (or `message`) string from a JSON body.
#[must_use]
pub fn error_message(body: &serde_json::Value) -> Option<&str> {
    body.get("error")
        .and_then(serde_json::Value::as_str)
        .or_else(|| body.get("message").and_then(serde_json::Value::as_str))
        .filter(|message| !message.trim().is_empty())
}

impl From<serde_json::Error> for FleetError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}
