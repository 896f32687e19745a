//! HTTP router and handlers.

use crate::app::AppState;
use axum::{Router, routing::get};

pub mod auth;
pub mod error;
pub mod issues;
pub mod mail_items;
pub mod render;
pub mod routes;

/// Issue form on fixed routes; everything else goes through the
/// suffix-matched mail item dispatcher.
pub fn build_router(state: AppState) -> Router {
  Router::new()
    .route(
      "/create-simple-issue",
      get(issues::issue_form).post(issues::create_issue),
    )
    .route("/create-simple-issue/logs", get(issues::list_logs))
    .fallback(mail_items::dispatch)
    .with_state(state)
}
