//! API error type and axum `IntoResponse` implementation.
//!
//! Domain errors map to HTTP statuses through [`vigil_core::ErrorKind`], so
//! the status table lives in one place. Missing or unverifiable credentials
//! are a separate variant: they answer 401 with a `WWW-Authenticate`
//! challenge, while a role failure on valid credentials answers 403.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use vigil_core::ErrorKind;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("missing or invalid credentials")]
  BadCredentials,

  #[error(transparent)]
  Domain(#[from] vigil_core::Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::BadCredentials => {
        let body = Json(json!({
          "error": {
            "kind":    "unauthorized",
            "message": "missing or invalid credentials",
          }
        }));
        let mut res = (StatusCode::UNAUTHORIZED, body).into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"vigil\""),
        );
        res
      }
      ApiError::Domain(e) => {
        let status = match e.kind() {
          ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
          ErrorKind::NotFound => StatusCode::NOT_FOUND,
          ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
          ErrorKind::Conflict | ErrorKind::CapacityInsufficient => {
            StatusCode::CONFLICT
          }
          ErrorKind::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
          ErrorKind::InternalStoreError => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
          "error": { "kind": e.kind(), "message": e.to_string() }
        }));
        (status, body).into_response()
      }
    }
  }
}
