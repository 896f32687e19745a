//! Error types for the service layer.

use crate::store::StoreError;
use thiserror::Error;

pub const NO_RECIPIENTS_MESSAGE: &str = "At least one recipient field (to, cc, bcc) must be provided";

#[derive(Debug, Error)]
pub enum ServiceError {
  /// Bad input from the caller.
  #[error("{0}")]
  Validation(String),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error("failed to encode mail items: {0}")]
  Serialization(#[from] serde_json::Error),
}
