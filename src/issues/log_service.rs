//! Durable log of issue creation attempts.

use crate::{
  models::issue::{
    log_entry::IssueCreationLogEntry,
    stored_issue_log::{IssueLogFilter, StoredIssueLog},
  },
  service::ServiceError,
  store::{RecordStore, StoreOp},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct IssueLogService {
  store: Arc<dyn RecordStore<StoredIssueLog>>,
}

impl IssueLogService {
  pub fn new(store: Arc<dyn RecordStore<StoredIssueLog>>) -> Self {
    Self { store }
  }

  /// Written inside a store transaction.
  pub async fn log_attempt(&self, entry: &IssueCreationLogEntry) -> Result<(), ServiceError> {
    self
      .store
      .transact(vec![StoreOp::Create(StoredIssueLog::from(entry))])
      .await?;
    Ok(())
  }

  pub async fn all_logs(&self) -> Result<Vec<IssueCreationLogEntry>, ServiceError> {
    Ok(into_entries(self.store.find_all().await?))
  }

  pub async fn logs_by_author(&self, author: &str) -> Result<Vec<IssueCreationLogEntry>, ServiceError> {
    self.find(IssueLogFilter::Author(author.to_string())).await
  }

  pub async fn logs_after(&self, after: DateTime<Utc>) -> Result<Vec<IssueCreationLogEntry>, ServiceError> {
    self.find(IssueLogFilter::CreatedAfter(after)).await
  }

  pub async fn logs_by_outcome(&self, created: bool) -> Result<Vec<IssueCreationLogEntry>, ServiceError> {
    self.find(IssueLogFilter::Outcome(created)).await
  }

  async fn find(&self, filter: IssueLogFilter) -> Result<Vec<IssueCreationLogEntry>, ServiceError> {
    Ok(into_entries(self.store.find_where(filter).await?))
  }
}

fn into_entries(rows: Vec<StoredIssueLog>) -> Vec<IssueCreationLogEntry> {
  rows.into_iter().map(IssueCreationLogEntry::from).collect()
}
