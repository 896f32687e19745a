//! HTTP error type: the single place failures become status codes.

use super::render::JSON_UTF8;
use crate::{models::response::ack::ErrorBody, service::ServiceError};
use axum::{
  Json,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

pub const ACCESS_DENIED: &str = "Access denied: Admin rights required";
pub const ENDPOINT_NOT_FOUND: &str = "Endpoint not found";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0}")]
  BadRequest(String),

  /// No principal; carries the login URL to redirect to.
  #[error("authentication required")]
  Unauthenticated(String),

  #[error("Access denied: Admin rights required")]
  Forbidden,

  #[error("{0}")]
  NotFound(String),

  #[error("method not allowed")]
  MethodNotAllowed,

  #[error("{0}")]
  Internal(String),
}

impl From<ServiceError> for AppError {
  fn from(err: ServiceError) -> Self {
    match err {
      ServiceError::Validation(msg) => AppError::BadRequest(msg),
      other => {
        let msg = other.to_string();
        AppError::Internal(if msg.is_empty() {
          INTERNAL_ERROR.to_string()
        } else {
          msg
        })
      }
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = match &self {
      AppError::Unauthenticated(login_url) => {
        return (StatusCode::FOUND, [(header::LOCATION, login_url.clone())]).into_response();
      }
      AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::Forbidden => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
      AppError::Internal(msg) => {
        error!(error = %msg, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (
      status,
      [(header::CONTENT_TYPE, JSON_UTF8)],
      Json(ErrorBody::new(self.to_string())),
    )
      .into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::StoreError;

  #[test]
  fn validation_maps_to_bad_request() {
    let err = AppError::from(ServiceError::Validation("nope".into()));
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "nope"));
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn store_failures_become_500_with_message() {
    let err = AppError::from(ServiceError::Store(StoreError::Duplicate("x".into())));
    assert!(matches!(err, AppError::Internal(ref m) if m.contains('x')));
    assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn unauthenticated_redirects_to_login() {
    let res = AppError::Unauthenticated("/login".into()).into_response();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()[header::LOCATION], "/login");
  }

  #[test]
  fn error_bodies_are_utf8_json() {
    let res = AppError::Forbidden.into_response();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.headers()[header::CONTENT_TYPE], JSON_UTF8);
    assert_eq!(AppError::Forbidden.to_string(), ACCESS_DENIED);
  }
}
