//! # Errors and user-facing notifications
//!
//! [`ApiError`] is returned by every function of this crate. Callers that only need to
//! show something to the user turn it into an [`ErrorReport`] with
//! [`ApiError::report`]: HTTP failures map by status code onto a fixed set of
//! [`Notification`]s, and a `503` additionally asks for a redirect to the maintenance
//! page. Domain errors (`AccountAlreadyExists`, `NotValidatedByAdmin`) are distinct
//! variants so that login and registration screens can match on them.

use store::{DiffError, TokenError};

use crate::auth::RegistrationStep;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request could not be sent: {0}")]
    Transport(String),

    #[error("server answered {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("an account already exists for this identity")]
    AccountAlreadyExists,

    #[error("account not validated by an administrator yet")]
    NotValidatedByAdmin,

    #[error("no registration in progress")]
    NoPendingRegistration,

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error("token storage failed: {0}")]
    Tokens(#[from] TokenError),

    #[error("registration stopped after {completed:?}: {source}")]
    RegistrationIncomplete {
        completed: Vec<RegistrationStep>,
        #[source]
        source: Box<ApiError>,
    },

    #[error("{} of {attempted} requests failed", .failures.len())]
    SyncFailed {
        attempted: usize,
        failures: Vec<SyncFailure>,
    },
}

/// One failed request of a synchronisation batch.
#[derive(Debug)]
pub struct SyncFailure {
    pub item: String,
    pub error: ApiError,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::RegistrationIncomplete { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn notification(&self) -> Notification {
        match self {
            ApiError::NotAuthenticated => Notification::Unauthorized,
            ApiError::RegistrationIncomplete { source, .. } => source.notification(),
            _ => self
                .status()
                .map_or(Notification::Default, Notification::from_status),
        }
    }

    /// What to show the user. `show_backend_errors` surfaces the backend body.
    pub fn report(&self, show_backend_errors: bool) -> ErrorReport {
        let notification = self.notification();
        let detail = match self {
            ApiError::Status { detail, .. } if show_backend_errors => detail.clone(),
            ApiError::RegistrationIncomplete { source, .. } => {
                return source.report(show_backend_errors);
            }
            _ => None,
        };
        ErrorReport {
            key: notification.key(),
            detail,
            redirect: notification.redirect(),
        }
    }
}

/// Fixed notifications keyed by HTTP status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notification {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    PayloadTooLarge,
    UnsupportedMediaType,
    ServiceUnavailable,
    Default,
}

impl Notification {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Notification::BadRequest,
            401 => Notification::Unauthorized,
            403 => Notification::Forbidden,
            404 => Notification::NotFound,
            405 => Notification::MethodNotAllowed,
            413 => Notification::PayloadTooLarge,
            415 => Notification::UnsupportedMediaType,
            503 => Notification::ServiceUnavailable,
            _ => Notification::Default,
        }
    }

    /// Translation key of the message.
    pub fn key(&self) -> &'static str {
        match self {
            Notification::BadRequest => "notifications.error-400",
            Notification::Unauthorized => "notifications.error-401",
            Notification::Forbidden => "notifications.error-403",
            Notification::NotFound => "notifications.error-404",
            Notification::MethodNotAllowed => "notifications.error-405",
            Notification::PayloadTooLarge => "notifications.error-413",
            Notification::UnsupportedMediaType => "notifications.error-415",
            Notification::ServiceUnavailable => "notifications.error-503",
            Notification::Default => "notifications.error-500",
        }
    }

    pub fn redirect(&self) -> Option<Redirect> {
        match self {
            Notification::ServiceUnavailable => Some(Redirect::Maintenance),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redirect {
    Maintenance,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorReport {
    pub key: &'static str,
    pub detail: Option<String>,
    pub redirect: Option<Redirect>,
}

/// Pull a readable message out of an error body: `detail`, the first field error, or
/// the raw text.
pub(crate) fn backend_detail(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => {
            if let Some(detail) = map.get("detail").and_then(|d| d.as_str()) {
                return Some(detail.to_string());
            }
            map.iter().find_map(|(field, value)| {
                let message = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Array(items) => items.first()?.as_str()?.to_string(),
                    _ => return None,
                };
                Some(format!("{field}: {message}"))
            })
        }
        Ok(serde_json::Value::String(s)) => Some(s),
        _ => Some(String::from_utf8_lossy(body).trim().to_string()).filter(|s| !s.is_empty()),
    }
}
