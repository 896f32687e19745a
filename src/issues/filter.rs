//! Composable project filters applied before the issue form is rendered.

use super::tracker::Project;
use std::sync::Arc;

pub trait ProjectFilter: Send + Sync {
  fn filter_create_issue(&self, input: Vec<Project>, user: &str) -> Vec<Project>;
}

/// Keeps projects the user may create issues in.
pub struct CreatePermissionFilter;

impl ProjectFilter for CreatePermissionFilter {
  fn filter_create_issue(&self, input: Vec<Project>, user: &str) -> Vec<Project> {
    input.into_iter().filter(|p| p.permits(user)).collect()
  }
}

/// Ordered filter chain; each filter sees the previous one's output.
pub struct ProjectListManager {
  filters: Vec<Arc<dyn ProjectFilter>>,
}

impl ProjectListManager {
  pub fn new(filters: Vec<Arc<dyn ProjectFilter>>) -> Self {
    Self { filters }
  }

  pub fn filtered(&self, user: &str, initial: Vec<Project>) -> Vec<Project> {
    self
      .filters
      .iter()
      .fold(initial, |acc, f| f.filter_create_issue(acc, user))
  }
}
