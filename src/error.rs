//! Error type shared by the engine and HTTP layer

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SageError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Query too long: {len} chars (max {max})")]
    QueryTooLong { len: usize, max: usize },

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Catalog has no products")]
    EmptyCatalog,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<JsonRejection> for SageError {
    fn from(rejection: JsonRejection) -> Self {
        SageError::InvalidBody(rejection.body_text())
    }
}

impl SageError {
    pub fn status(&self) -> StatusCode {
        match self {
            SageError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            SageError::InvalidBody(_)
            | SageError::QueryTooLong { .. }
            | SageError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            SageError::EmptyCatalog | SageError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for SageError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            SageError::MethodNotAllowed => ErrorResponse {
                error: self.to_string(),
                details: None,
            },
            other => ErrorResponse {
                error: status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
                details: Some(other.to_string()),
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, SageError>;
