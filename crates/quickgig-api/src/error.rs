use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} cannot be blank")]
    BlankField(&'static str),
    #[error("No fields to update")]
    NothingToUpdate,
    #[error("Email is already registered")]
    DuplicateEmail,
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Missing or invalid token")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_)
            | Self::MissingField(_)
            | Self::BlankField(_)
            | Self::NothingToUpdate
            | Self::DuplicateEmail
            | Self::InvalidRole(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Every failure renders as `{"error": "..."}`. Server-side details are
/// logged, never sent to the client.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Database(err) => {
                tracing::error!(error = ?err, "Database error.");
                "An internal database error occurred".to_string()
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "Internal error.");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

// Extractor rejections are client errors; axum's text becomes the message.

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Presence check for a required body field.
pub fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ApiError> {
    value.ok_or(ApiError::MissingField(field))
}

/// Like [`required`], but blank strings count as missing.
pub fn required_text(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(ApiError::MissingField(field)),
    }
}

/// Trimmed value of an optional text field. Blank strings are dropped so
/// the column keeps its default or current value.
pub fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// For update bodies: absent stays absent, but a NOT NULL text column may
/// not be set to a blank string.
pub fn optional_text(value: Option<String>, field: &'static str) -> Result<Option<String>, ApiError> {
    match value {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Err(ApiError::BlankField(field)),
        Some(s) => Ok(Some(s.trim().to_string())),
    }
}
