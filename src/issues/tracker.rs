//! Issue tracker contract and an in-process implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
  pub key: String,
  pub name: String,
  /// Principals allowed to create issues. Empty means everyone.
  #[serde(default)]
  pub creators: Vec<String>,
}

impl Project {
  pub fn new(key: impl Into<String>, name: impl Into<String>, creators: Vec<String>) -> Self {
    Project {
      key: key.into(),
      name: name.into(),
      creators,
    }
  }

  pub fn permits(&self, user: &str) -> bool {
    self.creators.is_empty() || self.creators.iter().any(|c| c == user)
  }
}

/// Host ticketing system as seen by the issue form.
#[async_trait]
pub trait IssueTracker: Send + Sync {
  async fn projects(&self) -> Vec<Project>;

  /// Returns the new issue key, or `None` when the tracker refused.
  async fn create_issue(
    &self,
    project_key: &str,
    summary: &str,
    description: &str,
    acting_user: &str,
  ) -> Option<String>;
}

/// Tracker over a fixed project catalog. Keys are `<PROJECT>-<n>`, counted
/// per project for the life of the process.
pub struct LocalIssueTracker {
  projects: Vec<Project>,
  counters: Mutex<HashMap<String, u64>>,
}

impl LocalIssueTracker {
  pub fn new(projects: Vec<Project>) -> Self {
    Self {
      projects,
      counters: Mutex::new(HashMap::new()),
    }
  }
}

#[async_trait]
impl IssueTracker for LocalIssueTracker {
  async fn projects(&self) -> Vec<Project> {
    self.projects.clone()
  }

  async fn create_issue(
    &self,
    project_key: &str,
    summary: &str,
    _description: &str,
    acting_user: &str,
  ) -> Option<String> {
    let Some(project) = self.projects.iter().find(|p| p.key == project_key) else {
      debug!(project_key, "unknown project");
      return None;
    };
    if summary.trim().is_empty() {
      debug!(project_key, "validation failed: empty summary");
      return None;
    }
    if !project.permits(acting_user) {
      debug!(project_key, acting_user, "user may not create issues here");
      return None;
    }
    let mut counters = self.counters.lock().await;
    let n = counters.entry(project.key.clone()).or_insert(0);
    *n += 1;
    Some(format!("{}-{}", project.key, n))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn keys_count_per_project() {
    let tracker = LocalIssueTracker::new(vec![
      Project::new("OPS", "Operations", vec![]),
      Project::new("DEV", "Development", vec![]),
    ]);
    assert_eq!(tracker.create_issue("OPS", "a", "", "u").await.as_deref(), Some("OPS-1"));
    assert_eq!(tracker.create_issue("DEV", "b", "", "u").await.as_deref(), Some("DEV-1"));
    assert_eq!(tracker.create_issue("OPS", "c", "", "u").await.as_deref(), Some("OPS-2"));
  }

  #[tokio::test]
  async fn refuses_unknown_project_blank_summary_and_outsiders() {
    let tracker = LocalIssueTracker::new(vec![Project::new("SEC", "Security", vec!["alice".into()])]);
    assert!(tracker.create_issue("NOPE", "a", "", "alice").await.is_none());
    assert!(tracker.create_issue("SEC", "  ", "", "alice").await.is_none());
    assert!(tracker.create_issue("SEC", "a", "", "bob").await.is_none());
    assert_eq!(tracker.create_issue("SEC", "a", "", "alice").await.as_deref(), Some("SEC-1"));
  }
}
