//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. The message is shown to staff
/// as-is.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("configuration error: {0}")]
  Configuration(String),

  #[error("{0}")]
  Internal(#[source] shrift_core::Error),
}

impl From<shrift_core::Error> for ApiError {
  fn from(e: shrift_core::Error) -> Self {
    match e {
      shrift_core::Error::InvalidDate(_) => Self::BadRequest(e.to_string()),
      e if e.is_configuration() => Self::Configuration(e.to_string()),
      e => Self::Internal(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Configuration(_) | ApiError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let message = match self {
      ApiError::BadRequest(m) | ApiError::Configuration(m) => m,
      ApiError::Internal(e) => e.to_string(),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
