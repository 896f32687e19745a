//! Issue form endpoints.

use super::{
  auth::{require_admin, require_user},
  error::AppError,
  render,
};
use crate::{app::AppState, issues::IssueForm};
use axum::{
  Form,
  extract::{State, rejection::FormRejection},
  http::{HeaderMap, StatusCode},
  response::Response,
};
use tracing::debug;

pub async fn issue_form(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
  let user = require_user(state.gate.as_ref(), &headers, &state.login_url).await?;
  let projects = state.issues.available_projects(&user.key).await;
  state.renderer.issue_form(&projects).await
}

pub async fn create_issue(
  State(state): State<AppState>,
  headers: HeaderMap,
  form: Result<Form<IssueForm>, FormRejection>,
) -> Result<Response, AppError> {
  let user = require_user(state.gate.as_ref(), &headers, &state.login_url).await?;
  // An unreadable body is still an attempt; the tracker refuses the empty form.
  let form = form.map(|Form(f)| f).unwrap_or_else(|rejection| {
    debug!(error = %rejection, "unreadable issue form");
    IssueForm::default()
  });
  let outcome = state.issues.create_from_form(&form, &user.key).await?;
  Ok(render::json(StatusCode::OK, outcome))
}

pub async fn list_logs(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
  require_admin(state.gate.as_ref(), &headers, &state.login_url).await?;
  let logs = state.issues.log().all_logs().await?;
  Ok(render::json(StatusCode::OK, logs))
}
