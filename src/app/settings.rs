//! Runtime configuration: optional TOML file plus `MAILVIEW_*` overrides.

use crate::{issues::tracker::Project, service::SeedPolicy};
use config::{Config, ConfigError, Environment, File, FileFormat, Source};
use serde::Deserialize;

pub const CONFIG_ENV: &str = "MAILVIEW_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "mailview.toml";
/// `database_url` value that selects the in-process store.
pub const MEMORY_DATABASE: &str = "memory:";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub listen_address: String,
  pub database_url: String,
  pub assets_dir: String,
  pub login_url: String,
  pub identity_header: String,
  pub admins: Vec<String>,
  pub seed_policy: SeedPolicy,
  pub projects: Vec<Project>,
}

impl Default for Settings {
  fn default() -> Self {
    Settings {
      listen_address: "127.0.0.1:8080".to_string(),
      database_url: "sqlite://mailview.db".to_string(),
      assets_dir: "assets".to_string(),
      login_url: "/login".to_string(),
      identity_header: "x-remote-user".to_string(),
      admins: Vec::new(),
      seed_policy: SeedPolicy::default(),
      projects: Vec::new(),
    }
  }
}

impl Settings {
  /// Read the file named by `MAILVIEW_CONFIG` (default `mailview.toml`,
  /// optional), then the environment.
  pub fn load() -> Result<Self, ConfigError> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    Self::from_sources(File::new(&path, FileFormat::Toml).required(false))
  }

  fn from_sources<S>(file: S) -> Result<Self, ConfigError>
  where
    S: Source + Send + Sync + 'static,
  {
    Config::builder()
      .add_source(file)
      .add_source(
        Environment::with_prefix("MAILVIEW")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("admins"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn uses_memory_store(&self) -> bool {
    self.database_url == MEMORY_DATABASE
  }
}
