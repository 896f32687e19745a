//! Database row for an issue creation attempt.

use crate::store::Record;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct StoredIssueLog {
  pub id: String,
  pub project_key: String,
  pub summary: String,
  pub issue_key: Option<String>,
  pub author_key: String,
  pub created_at: DateTime<Utc>,
  pub issue_is_created: bool,
  pub error_message: Option<String>,
}

#[derive(Debug, Clone)]
pub enum IssueLogFilter {
  Author(String),
  CreatedAfter(DateTime<Utc>),
  Outcome(bool),
}

impl Record for StoredIssueLog {
  type Filter = IssueLogFilter;

  fn record_id(&self) -> &str {
    &self.id
  }

  fn matches(&self, filter: &IssueLogFilter) -> bool {
    match filter {
      IssueLogFilter::Author(author) => &self.author_key == author,
      IssueLogFilter::CreatedAfter(ts) => self.created_at > *ts,
      IssueLogFilter::Outcome(created) => self.issue_is_created == *created,
    }
  }
}
