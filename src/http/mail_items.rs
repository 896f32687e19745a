//! Mail item viewer: one fallback handler dispatching on the route table.

use super::{
  auth::require_admin,
  error::{AppError, ENDPOINT_NOT_FOUND},
  render::{self, PageContext},
  routes::{Route, resolve},
};
use crate::{
  app::AppState,
  models::{
    mail::create_mail_item::CreateMailItem,
    response::ack::{Ack, CreatedAck},
  },
};
use axum::{
  body::Bytes,
  extract::State,
  http::{HeaderMap, Method, StatusCode, Uri},
  response::Response,
};
use tracing::{debug, info};

pub const DELETED: &str = "All mail items deleted successfully";
pub const NOTHING_TO_DELETE: &str = "No mail items to delete";
pub const TEST_DATA_CREATED: &str = "Test data created successfully";
pub const TEST_DATA_FAILED: &str = "Failed to create test data";
pub const BODY_REQUIRED: &str = "Request body is required";

pub async fn dispatch(
  State(state): State<AppState>,
  method: Method,
  uri: Uri,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Response, AppError> {
  let path = uri.path();
  // Every POST is gated before the route is looked at.
  if method == Method::POST {
    require_admin(state.gate.as_ref(), &headers, &state.login_url).await?;
  }

  let route = resolve(&method, path);
  debug!(%method, path, ?route, "dispatch");
  if method == Method::GET && route.is_index_family() && state.seeder.on_index_request().await? {
    info!("store was empty, seeded test data");
  }

  match route {
    Route::Redirect => Ok(render::redirect(&format!("{path}/"))),
    Route::Index => Ok(state.renderer.main_page().await),
    Route::Data => Ok(render::json_text(state.mail.serialize_all_to_json().await?)),
    Route::Table => {
      let ctx = PageContext::from_request(&headers, path);
      state.renderer.table_page(&ctx).await
    }
    Route::Css(name) => state.renderer.css(&name).await,
    Route::DeleteAll => {
      let result = state.mail.delete_all().await?;
      let message = if result { DELETED } else { NOTHING_TO_DELETE };
      Ok(render::json(StatusCode::OK, Ack::new(result, message)))
    }
    Route::CreateTestData => {
      let result = state.seeder.force_create().await?;
      let message = if result { TEST_DATA_CREATED } else { TEST_DATA_FAILED };
      Ok(render::json(StatusCode::OK, Ack::new(result, message)))
    }
    Route::AddEmail => {
      let req = parse_create_request(&body)?;
      let item = state.mail.create_from_request(req).await?;
      Ok(render::json(StatusCode::CREATED, CreatedAck::new(item.id())))
    }
    Route::AddEmailRaw => {
      if body.is_empty() {
        return Err(AppError::BadRequest(BODY_REQUIRED.to_string()));
      }
      let item = state.mail.create_from_eml(&body).await?;
      Ok(render::json(StatusCode::CREATED, CreatedAck::new(item.id())))
    }
    Route::UnknownPost | Route::NotFound => Err(AppError::NotFound(ENDPOINT_NOT_FOUND.to_string())),
    Route::MethodNotAllowed => Err(AppError::MethodNotAllowed),
  }
}

fn parse_create_request(body: &[u8]) -> Result<CreateMailItem, AppError> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Err(AppError::BadRequest(BODY_REQUIRED.to_string()));
  }
  serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid JSON format: {e}")))
}
