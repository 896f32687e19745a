//! Sample data initialization and the policy that decides when it runs.

use super::{ServiceError, mail_items::MailItemService};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// When sample data is created automatically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
  /// Check-then-seed on every index-family GET, no guard. Two concurrent
  /// first requests can both seed.
  Lazy,
  /// Same trigger as `Lazy`, serialized behind one async mutex.
  #[default]
  LazyGuarded,
  /// Seed once at startup when the store is empty.
  Startup,
  Disabled,
}

pub struct TestDataInitializer {
  service: MailItemService,
  policy: SeedPolicy,
  gate: Mutex<()>,
}

impl TestDataInitializer {
  pub fn new(service: MailItemService, policy: SeedPolicy) -> Self {
    Self {
      service,
      policy,
      gate: Mutex::new(()),
    }
  }

  pub fn policy(&self) -> SeedPolicy {
    self.policy
  }

  /// Seed when the store is empty. Returns whether anything was created.
  pub async fn initialize_if_empty(&self) -> Result<bool, ServiceError> {
    if self.is_empty().await? {
      info!("no mail items found, creating initial test data");
      return self.service.seed_test_data().await;
    }
    debug!("mail items already exist, skipping test data initialization");
    Ok(false)
  }

  /// Seed regardless of what is already stored.
  pub async fn force_create(&self) -> Result<bool, ServiceError> {
    info!("force creating test data");
    self.service.seed_test_data().await
  }

  pub async fn is_empty(&self) -> Result<bool, ServiceError> {
    Ok(self.count().await? == 0)
  }

  pub async fn count(&self) -> Result<u64, ServiceError> {
    self.service.count().await
  }

  /// Hook for GET requests to the index-family routes.
  pub async fn on_index_request(&self) -> Result<bool, ServiceError> {
    match self.policy {
      SeedPolicy::Lazy => self.initialize_if_empty().await,
      SeedPolicy::LazyGuarded => {
        let _guard = self.gate.lock().await;
        self.initialize_if_empty().await
      }
      SeedPolicy::Startup | SeedPolicy::Disabled => Ok(false),
    }
  }

  /// Hook run once before the server starts accepting requests.
  pub async fn on_startup(&self) -> Result<bool, ServiceError> {
    match self.policy {
      SeedPolicy::Startup => self.initialize_if_empty().await,
      _ => Ok(false),
    }
  }
}
