//! HTTP-facing errors for the todo API.
//!
//! Every failure is rendered as `{"error": "<message>"}` with a fixed
//! message. Store error detail is logged where it occurs and never reaches
//! the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Malformed id, unparsable body or missing required field.
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Todo not found")]
    NotFound,

    /// The store failed; the message is the operation-level summary.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
