//! Issue form backend: project filtering, issue creation and the attempt log.

pub mod filter;
pub mod log_service;
pub mod tracker;

use crate::{
  models::{issue::log_entry::IssueCreationLogEntry, response::ack::IssueOutcome},
  service::ServiceError,
};
use filter::ProjectListManager;
use log_service::IssueLogService;
use serde::Deserialize;
use std::sync::Arc;
use tracker::{IssueTracker, Project};
use tracing::{debug, info};

/// Form fields posted by the issue page. Missing fields read as empty so
/// the tracker refuses them and the attempt still gets logged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IssueForm {
  pub project_key: String,
  pub summary: String,
  pub description: String,
}

#[derive(Clone)]
pub struct IssueCreationService {
  tracker: Arc<dyn IssueTracker>,
  projects: Arc<ProjectListManager>,
  log: IssueLogService,
}

impl IssueCreationService {
  pub fn new(
    tracker: Arc<dyn IssueTracker>,
    projects: Arc<ProjectListManager>,
    log: IssueLogService,
  ) -> Self {
    Self {
      tracker,
      projects,
      log,
    }
  }

  pub fn log(&self) -> &IssueLogService {
    &self.log
  }

  /// Projects `user` may pick in the form.
  pub async fn available_projects(&self, user: &str) -> Vec<Project> {
    let all = self.tracker.projects().await;
    self.projects.filtered(user, all)
  }

  /// Create the issue and log the attempt, successful or not.
  pub async fn create_from_form(
    &self,
    form: &IssueForm,
    author: &str,
  ) -> Result<IssueOutcome, ServiceError> {
    let key = self
      .tracker
      .create_issue(&form.project_key, &form.summary, &form.description, author)
      .await;
    let entry = IssueCreationLogEntry::attempt(&form.project_key, &form.summary, author, key.clone());
    self.log.log_attempt(&entry).await?;

    Ok(match key {
      Some(key) => {
        info!(%key, author, "issue created");
        IssueOutcome::Created { key }
      }
      None => {
        debug!(project = %form.project_key, summary = %form.summary, "issue creation failed");
        IssueOutcome::Error {
          message: "Issue not created".to_string(),
        }
      }
    })
  }
}
