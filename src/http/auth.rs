//! Authorization gate in front of the write endpoints.

use super::error::AppError;
use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName, header::InvalidHeaderName};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
  pub key: String,
  pub admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
  Allowed(Principal),
  Unauthenticated,
  Forbidden,
}

/// Identity oracle. Implementations only answer who the caller is; the
/// admin decision is derived from that by default.
#[async_trait]
pub trait AuthorizationGate: Send + Sync {
  async fn principal(&self, headers: &HeaderMap) -> Option<Principal>;

  async fn authorize(&self, headers: &HeaderMap) -> Access {
    match self.principal(headers).await {
      None => Access::Unauthenticated,
      Some(p) if p.admin => Access::Allowed(p),
      Some(_) => Access::Forbidden,
    }
  }
}

/// Trusts a header set by an authenticating reverse proxy.
pub struct TrustedHeaderGate {
  header: HeaderName,
  admins: HashSet<String>,
}

impl TrustedHeaderGate {
  pub fn new(header: &str, admins: Vec<String>) -> Result<Self, InvalidHeaderName> {
    Ok(Self {
      header: HeaderName::from_bytes(header.trim().as_bytes())?,
      admins: admins.into_iter().collect(),
    })
  }
}

#[async_trait]
impl AuthorizationGate for TrustedHeaderGate {
  async fn principal(&self, headers: &HeaderMap) -> Option<Principal> {
    let key = headers.get(&self.header)?.to_str().ok()?.trim();
    if key.is_empty() {
      return None;
    }
    Some(Principal {
      key: key.to_string(),
      admin: self.admins.contains(key),
    })
  }
}

/// Admin or bust: redirect when anonymous, 403 when not an admin.
pub async fn require_admin(
  gate: &dyn AuthorizationGate,
  headers: &HeaderMap,
  login_url: &str,
) -> Result<Principal, AppError> {
  match gate.authorize(headers).await {
    Access::Allowed(p) => Ok(p),
    Access::Unauthenticated => {
      debug!("anonymous write request, redirecting to login");
      Err(AppError::Unauthenticated(login_url.to_string()))
    }
    Access::Forbidden => Err(AppError::Forbidden),
  }
}

/// Any authenticated principal.
pub async fn require_user(
  gate: &dyn AuthorizationGate,
  headers: &HeaderMap,
  login_url: &str,
) -> Result<Principal, AppError> {
  gate
    .principal(headers)
    .await
    .ok_or_else(|| AppError::Unauthenticated(login_url.to_string()))
}
