//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Failures render as `{"status": <code>, "message": <text>}`. Store errors
//! are logged and replaced with a fixed message.

use axum::{
  Json,
  extract::{
    multipart::{MultipartError, MultipartRejection},
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use vidhub_core::Error as CoreError;

const INTERNAL: &str = "internal server error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] CoreError),

  /// The request could not be decoded (bad JSON, malformed path id, bad
  /// query string).
  #[error("bad request: {0}")]
  BadRequest(String),

  /// Writing an uploaded part to the staging directory failed.
  #[error("staging upload: {0}")]
  Staging(#[source] std::io::Error),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Staging(_) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::Core(e) => match e {
        CoreError::Validation(_) | CoreError::SelfTarget => StatusCode::BAD_REQUEST,
        CoreError::Unauthenticated => StatusCode::UNAUTHORIZED,
        CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Conflict(_) => StatusCode::CONFLICT,
        CoreError::Upstream(_) | CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }

  fn message(&self) -> String {
    match self {
      ApiError::BadRequest(m) => m.clone(),
      ApiError::Core(CoreError::Unauthenticated) => "Unauthorized request".to_owned(),
      ApiError::Core(CoreError::Store(_)) | ApiError::Staging(_) => INTERNAL.to_owned(),
      ApiError::Core(e) => e.to_string(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match &self {
      ApiError::Core(CoreError::Store(source)) => tracing::error!(error = %source, "store failure"),
      ApiError::Staging(source) => tracing::error!(error = %source, "upload staging failure"),
      _ => {}
    }
    let status = self.status();
    let body = json!({ "status": status.as_u16(), "message": self.message() });
    (status, Json(body)).into_response()
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    tracing::debug!(error = %rejection, "rejected request body");
    ApiError::BadRequest("Invalid request body".to_owned())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    tracing::debug!(error = %rejection, "rejected path parameter");
    ApiError::BadRequest("Invalid id".to_owned())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    tracing::debug!(error = %rejection, "rejected query string");
    ApiError::BadRequest("Invalid query parameters".to_owned())
  }
}

impl From<MultipartRejection> for ApiError {
  fn from(rejection: MultipartRejection) -> Self {
    tracing::debug!(error = %rejection, "rejected non-multipart body");
    ApiError::BadRequest("Expected a multipart/form-data body".to_owned())
  }
}

impl From<MultipartError> for ApiError {
  fn from(error: MultipartError) -> Self {
    tracing::debug!(error = %error, "malformed multipart body");
    ApiError::BadRequest("Invalid multipart body".to_owned())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn store_errors_are_redacted() {
    let err = ApiError::from(CoreError::store(std::io::Error::other("disk on fire")));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.message(), INTERNAL);
  }

  #[test]
  fn taxonomy_maps_to_status_codes() {
    let cases = [
      (CoreError::validation("x"), StatusCode::BAD_REQUEST),
      (CoreError::SelfTarget, StatusCode::BAD_REQUEST),
      (CoreError::Unauthenticated, StatusCode::UNAUTHORIZED),
      (CoreError::Forbidden("x".into()), StatusCode::FORBIDDEN),
      (CoreError::not_found("x"), StatusCode::NOT_FOUND),
      (CoreError::conflict("x"), StatusCode::CONFLICT),
      (CoreError::Upstream("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).status(), status);
    }
  }
}
