//! Response rendering: JSON feed, HTML pages from templates, stylesheets.

use super::{error::AppError, routes::context_path};
use crate::{issues::tracker::Project, util::html_escape};
use axum::{
  Json,
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde::Serialize;
use std::{
  io::ErrorKind,
  path::PathBuf,
};
use tracing::{debug, warn};

pub const HTML_UTF8: &str = "text/html; charset=UTF-8";
pub const JSON_UTF8: &str = "application/json; charset=UTF-8";
pub const CSS_UTF8: &str = "text/css; charset=UTF-8";

pub const MAIN_TEMPLATE: &str = "templates/mail-main.html";
pub const TABLE_TEMPLATE: &str = "templates/mail-table.html";
pub const ISSUE_FORM_TEMPLATE: &str = "templates/form-create-simple-issue.html";
pub const TABLE_STYLESHEET: &str = "css/mail-table.css";
pub const PROJECT_OPTIONS_MARKER: &str = "<!--PROJECT_OPTIONS-->";

pub const TEMPLATE_NOT_FOUND: &str = "Template not found";
pub const CSS_NOT_FOUND: &str = "CSS file not found";

/// Read-only view of the assets folder.
#[derive(Debug, Clone)]
pub struct Resources {
  root: PathBuf,
}

impl Resources {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// `Ok(None)` when the file does not exist.
  pub async fn load(&self, relative: &str) -> std::io::Result<Option<String>> {
    match tokio::fs::read_to_string(self.root.join(relative)).await {
      Ok(text) => Ok(Some(text)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e),
    }
  }
}

/// Values substituted into the table template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
  pub context_path: String,
  pub base_url: String,
}

impl PageContext {
  pub fn from_request(headers: &HeaderMap, path: &str) -> Self {
    let context_path = context_path(path).to_string();
    let header_value = |name: &str| {
      headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    };
    let scheme = header_value("x-forwarded-proto").unwrap_or("http");
    let host = header_value(header::HOST.as_str()).unwrap_or("localhost");
    PageContext {
      base_url: format!("{scheme}://{host}{context_path}"),
      context_path,
    }
  }
}

/// Literal placeholder substitution; no other template logic.
pub fn substitute_table(template: &str, ctx: &PageContext) -> String {
  let stylesheet = format!(
    r#"<link rel="stylesheet" type="text/css" href="{}/{TABLE_STYLESHEET}">"#,
    ctx.context_path
  );
  template
    .replace("$requireResources", &stylesheet)
    .replace("$contextPath", &ctx.context_path)
    .replace("$baseUrl", &ctx.base_url)
}

/// Built-in index page, used when the main template is unavailable.
pub fn navigation_page() -> String {
  [
    "<!DOCTYPE html>",
    "<html>",
    "<head><meta charset=\"UTF-8\"><title>Mail Items</title></head>",
    "<body>",
    "<h1>Mail Items</h1>",
    "<ul>",
    "<li><a href='data'>JSON data</a></li>",
    "<li><a href='table'>Table view</a></li>",
    "</ul>",
    "</body>",
    "</html>",
  ]
  .join("\n")
}

/// `<option>` tags for the issue form.
pub fn project_options(projects: &[Project]) -> String {
  projects
    .iter()
    .map(|p| {
      format!(
        r#"<option value="{key}">{} ({key})</option>"#,
        html_escape(&p.name),
        key = html_escape(&p.key),
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn html(body: String) -> Response {
  ([(header::CONTENT_TYPE, HTML_UTF8)], body).into_response()
}

/// Already encoded JSON text.
pub fn json_text(body: String) -> Response {
  ([(header::CONTENT_TYPE, JSON_UTF8)], body).into_response()
}

pub fn json<T: Serialize>(status: StatusCode, body: T) -> Response {
  (status, [(header::CONTENT_TYPE, JSON_UTF8)], Json(body)).into_response()
}

pub fn redirect(location: &str) -> Response {
  (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

#[derive(Debug, Clone)]
pub struct PageRenderer {
  resources: Resources,
}

impl PageRenderer {
  pub fn new(resources: Resources) -> Self {
    Self { resources }
  }

  /// Index page. Falls back to [`navigation_page`] silently.
  pub async fn main_page(&self) -> Response {
    match self.resources.load(MAIN_TEMPLATE).await {
      Ok(Some(page)) => html(page),
      Ok(None) => {
        debug!("main template missing, using built-in page");
        html(navigation_page())
      }
      Err(e) => {
        warn!(error = %e, "main template unreadable, using built-in page");
        html(navigation_page())
      }
    }
  }

  pub async fn table_page(&self, ctx: &PageContext) -> Result<Response, AppError> {
    let template = self.required(TABLE_TEMPLATE, TEMPLATE_NOT_FOUND).await?;
    Ok(html(substitute_table(&template, ctx)))
  }

  pub async fn css(&self, name: &str) -> Result<Response, AppError> {
    let sheet = self.required(&format!("css/{name}"), CSS_NOT_FOUND).await?;
    Ok(([(header::CONTENT_TYPE, CSS_UTF8)], sheet).into_response())
  }

  pub async fn issue_form(&self, projects: &[Project]) -> Result<Response, AppError> {
    let template = self.required(ISSUE_FORM_TEMPLATE, TEMPLATE_NOT_FOUND).await?;
    Ok(html(template.replace(PROJECT_OPTIONS_MARKER, &project_options(projects))))
  }

  async fn required(&self, relative: &str, missing: &str) -> Result<String, AppError> {
    match self.resources.load(relative).await {
      Ok(Some(text)) => Ok(text),
      Ok(None) => {
        warn!(resource = relative, "resource not found");
        Err(AppError::NotFound(missing.to_string()))
      }
      Err(e) => Err(AppError::Internal(format!("failed to read {relative}: {e}"))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn temp_assets() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mailview-assets-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(dir.join("templates")).unwrap();
    std::fs::create_dir_all(dir.join("css")).unwrap();
    dir
  }

  #[test]
  fn context_from_forwarded_headers() {
    let mut headers = HeaderMap::new();
    headers.insert(header::HOST, HeaderValue::from_static("mail.example.test"));
    headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
    let ctx = PageContext::from_request(&headers, "/app/mail-items/table");
    assert_eq!(ctx.context_path, "/app");
    assert_eq!(ctx.base_url, "https://mail.example.test/app");

    let bare = PageContext::from_request(&HeaderMap::new(), "/mail-items/table");
    assert_eq!(bare.base_url, "http://localhost");
  }

  #[test]
  fn table_placeholders_are_replaced_literally() {
    let ctx = PageContext {
      context_path: "/app".into(),
      base_url: "http://h/app".into(),
    };
    let out = substitute_table(
      "$requireResources|$contextPath/mail-items/data|$baseUrl|#if($x)",
      &ctx,
    );
    assert_eq!(
      out,
      r#"<link rel="stylesheet" type="text/css" href="/app/css/mail-table.css">|/app/mail-items/data|http://h/app|#if($x)"#
    );
  }

  #[test]
  fn navigation_links_data_and_table() {
    let page = navigation_page();
    assert!(page.contains("href='data'"));
    assert!(page.contains("href='table'"));
  }

  #[test]
  fn project_options_are_escaped() {
    let out = project_options(&[Project::new("A&B", "<Ops>", vec![])]);
    assert_eq!(out, r#"<option value="A&amp;B">&lt;Ops&gt; (A&amp;B)</option>"#);
  }

  #[tokio::test]
  async fn missing_main_template_falls_back() {
    let renderer = PageRenderer::new(Resources::new(temp_assets()));
    let res = renderer.main_page().await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], HTML_UTF8);
  }

  #[tokio::test]
  async fn missing_table_and_css_are_404() {
    let renderer = PageRenderer::new(Resources::new(temp_assets()));
    let ctx = PageContext::from_request(&HeaderMap::new(), "/mail-items/table");
    assert!(matches!(
      renderer.table_page(&ctx).await,
      Err(AppError::NotFound(ref m)) if m == TEMPLATE_NOT_FOUND
    ));
    assert!(matches!(
      renderer.css("nope.css").await,
      Err(AppError::NotFound(ref m)) if m == CSS_NOT_FOUND
    ));
  }

  #[tokio::test]
  async fn css_is_served_verbatim() {
    let root = temp_assets();
    std::fs::write(root.join("css/site.css"), "body { color: red; }").unwrap();
    let renderer = PageRenderer::new(Resources::new(&root));
    let res = renderer.css("site.css").await.unwrap();
    assert_eq!(res.headers()[header::CONTENT_TYPE], CSS_UTF8);
    let _ = std::fs::remove_dir_all(root);
  }
}
