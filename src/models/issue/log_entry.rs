//! Issue creation attempt, as recorded by the issue form.

use super::stored_issue_log::StoredIssueLog;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCreationLogEntry {
  pub project_key: String,
  pub summary: String,
  pub issue_key: Option<String>,
  pub author_key: String,
  pub attempted_at: DateTime<Utc>,
  pub created: bool,
  pub error_message: Option<String>,
}

impl IssueCreationLogEntry {
  /// Build the entry for one attempt; a missing `issue_key` means failure.
  pub fn attempt(project_key: &str, summary: &str, author_key: &str, issue_key: Option<String>) -> Self {
    let created = issue_key.is_some();
    let error_message = (!created).then(|| {
      format!("Issue creation failed for project: {project_key}, summary: {summary}")
    });
    IssueCreationLogEntry {
      project_key: project_key.to_string(),
      summary: summary.to_string(),
      issue_key,
      author_key: author_key.to_string(),
      attempted_at: Utc::now(),
      created,
      error_message,
    }
  }
}

impl From<StoredIssueLog> for IssueCreationLogEntry {
  fn from(row: StoredIssueLog) -> Self {
    IssueCreationLogEntry {
      project_key: row.project_key,
      summary: row.summary,
      issue_key: row.issue_key,
      author_key: row.author_key,
      attempted_at: row.created_at,
      created: row.issue_is_created,
      error_message: row.error_message,
    }
  }
}

impl From<&IssueCreationLogEntry> for StoredIssueLog {
  fn from(entry: &IssueCreationLogEntry) -> Self {
    StoredIssueLog {
      id: Uuid::new_v4().to_string(),
      project_key: entry.project_key.clone(),
      summary: entry.summary.clone(),
      issue_key: entry.issue_key.clone(),
      author_key: entry.author_key.clone(),
      created_at: entry.attempted_at,
      issue_is_created: entry.created,
      error_message: entry.error_message.clone(),
    }
  }
}
