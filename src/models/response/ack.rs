//! JSON bodies returned by the write endpoints.

use serde::Serialize;

/// `{"success":true,"result":<bool>,"message":"..."}`
#[derive(Debug, Serialize)]
pub struct Ack {
  pub success: bool,
  pub result: bool,
  pub message: String,
}

impl Ack {
  pub fn new(result: bool, message: impl Into<String>) -> Self {
    Ack {
      success: true,
      result,
      message: message.into(),
    }
  }
}

/// `{"success":true,"message":"...","id":"..."}`
#[derive(Debug, Serialize)]
pub struct CreatedAck {
  pub success: bool,
  pub message: String,
  pub id: String,
}

impl CreatedAck {
  pub fn new(id: impl Into<String>) -> Self {
    CreatedAck {
      success: true,
      message: "Email added successfully".to_string(),
      id: id.into(),
    }
  }
}

/// `{"success":false,"error":"..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
  pub success: bool,
  pub error: String,
}

impl ErrorBody {
  pub fn new(error: impl Into<String>) -> Self {
    ErrorBody {
      success: false,
      error: error.into(),
    }
  }
}

/// Issue form result: `{"status":"created","key":..}` or
/// `{"status":"error","message":..}`.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum IssueOutcome {
  Created { key: String },
  Error { message: String },
}
