//! HTTP error responses for the web adapter.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::error::SaathiError;

/// Error payload returned as `{"error": "..."}` with a taxonomy-mapped
/// status. Every failure returns control to the client with session state
/// unchanged; nothing here is fatal.
#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<SaathiError> for WebError {
    fn from(err: SaathiError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub fn status_from_error(err: &SaathiError) -> StatusCode {
    match err {
        SaathiError::UnknownSymbol { .. }
        | SaathiError::NoSuchHolding { .. }
        | SaathiError::ModuleNotFound { .. } => StatusCode::NOT_FOUND,
        SaathiError::InvalidShareCount
        | SaathiError::InsufficientFunds { .. }
        | SaathiError::InsufficientShares { .. }
        | SaathiError::IncompleteQuestionnaire { .. }
        | SaathiError::QuestionnaireComplete => StatusCode::UNPROCESSABLE_ENTITY,
        SaathiError::GenerationFailed { .. } | SaathiError::SynthesisFailed { .. } => {
            StatusCode::BAD_GATEWAY
        }
        SaathiError::ConfigParse { .. }
        | SaathiError::ConfigMissing { .. }
        | SaathiError::ConfigInvalid { .. }
        | SaathiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
