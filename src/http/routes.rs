//! Suffix-matched route table for the mail item viewer.

use axum::http::Method;

const MAIL_ITEMS: &str = "/mail-items";
const CSS_SEGMENT: &str = "/css/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  /// `/mail-items` without the trailing slash.
  Redirect,
  Index,
  Data,
  Table,
  /// Stylesheet file name under `css/`.
  Css(String),
  DeleteAll,
  CreateTestData,
  AddEmail,
  AddEmailRaw,
  UnknownPost,
  NotFound,
  MethodNotAllowed,
}

impl Route {
  /// Routes whose GET may trigger lazy seeding.
  pub fn is_index_family(&self) -> bool {
    matches!(self, Route::Index | Route::Data | Route::Table)
  }
}

/// Match `path` against the table. GET suffixes are tried in a fixed order:
/// index, data, table, stylesheet.
pub fn resolve(method: &Method, path: &str) -> Route {
  if method == Method::GET {
    resolve_get(path)
  } else if method == Method::POST {
    resolve_post(path)
  } else {
    Route::MethodNotAllowed
  }
}

fn resolve_get(path: &str) -> Route {
  if path.ends_with(MAIL_ITEMS) {
    Route::Redirect
  } else if path.ends_with("/mail-items/") {
    Route::Index
  } else if path.ends_with("/mail-items/data") {
    Route::Data
  } else if path.ends_with("/mail-items/table") {
    Route::Table
  } else if let Some(name) = stylesheet_name(path) {
    Route::Css(name.to_string())
  } else {
    Route::NotFound
  }
}

fn resolve_post(path: &str) -> Route {
  if path.ends_with("/delete-all") {
    Route::DeleteAll
  } else if path.ends_with("/create-test-data") {
    Route::CreateTestData
  } else if path.ends_with("/add-email/raw") {
    Route::AddEmailRaw
  } else if path.ends_with("/add-email") {
    Route::AddEmail
  } else {
    Route::UnknownPost
  }
}

/// Single path segment ending in `.css`, nothing that could walk out of
/// the stylesheet folder.
fn stylesheet_name(path: &str) -> Option<&str> {
  let (_, name) = path.rsplit_once(CSS_SEGMENT)?;
  let stem = name.strip_suffix(".css")?;
  let valid = !stem.is_empty()
    && !name.contains('/')
    && !name.contains('\\')
    && !name.contains("..");
  valid.then_some(name)
}

/// Request prefix in front of the `/mail-items` family, e.g. `/app` for
/// `/app/mail-items/table`.
pub fn context_path(path: &str) -> &str {
  path.rfind(MAIL_ITEMS).map_or("", |at| &path[..at])
}
