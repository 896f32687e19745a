//! Application setup and runtime.

pub mod settings;

use crate::{
  db, http,
  http::{
    auth::{AuthorizationGate, TrustedHeaderGate},
    render::{PageRenderer, Resources},
  },
  issues::{
    IssueCreationService,
    filter::{CreatePermissionFilter, ProjectListManager},
    log_service::IssueLogService,
    tracker::{IssueTracker, LocalIssueTracker},
  },
  models::{issue::stored_issue_log::StoredIssueLog, mail::stored_mail_item::StoredMailItem},
  service::{MailItemService, TestDataInitializer},
  store::{MemoryStore, RecordStore, SqliteStore},
};
pub use settings::Settings;
use std::{net::SocketAddr, sync::Arc};
use tracing::info;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
  pub mail: MailItemService,
  pub seeder: Arc<TestDataInitializer>,
  pub gate: Arc<dyn AuthorizationGate>,
  pub renderer: PageRenderer,
  pub issues: IssueCreationService,
  pub login_url: String,
}

impl AppState {
  /// Wire services over already constructed collaborators.
  pub fn new(
    mail_store: Arc<dyn RecordStore<StoredMailItem>>,
    log_store: Arc<dyn RecordStore<StoredIssueLog>>,
    gate: Arc<dyn AuthorizationGate>,
    tracker: Arc<dyn IssueTracker>,
    settings: &Settings,
  ) -> Self {
    let mail = MailItemService::new(mail_store);
    let seeder = Arc::new(TestDataInitializer::new(mail.clone(), settings.seed_policy));
    let filters = ProjectListManager::new(vec![Arc::new(CreatePermissionFilter)]);
    let issues = IssueCreationService::new(tracker, Arc::new(filters), IssueLogService::new(log_store));
    AppState {
      mail,
      seeder,
      gate,
      renderer: PageRenderer::new(Resources::new(&settings.assets_dir)),
      issues,
      login_url: settings.login_url.clone(),
    }
  }

  /// Build stores, gate and tracker from configuration.
  pub async fn from_settings(settings: &Settings) -> Result<Self, BoxError> {
    let gate = Arc::new(TrustedHeaderGate::new(
      &settings.identity_header,
      settings.admins.clone(),
    )?);
    let tracker = Arc::new(LocalIssueTracker::new(settings.projects.clone()));

    let state = if settings.uses_memory_store() {
      info!("using in-process store, data is lost on exit");
      AppState::new(
        Arc::new(MemoryStore::<StoredMailItem>::new()),
        Arc::new(MemoryStore::<StoredIssueLog>::new()),
        gate,
        tracker,
        settings,
      )
    } else {
      let pool = db::connect(&settings.database_url, 5).await?;
      let store = Arc::new(SqliteStore::new(pool));
      AppState::new(store.clone(), store, gate, tracker, settings)
    };
    Ok(state)
  }
}

/// Load settings, seed if configured, serve HTTP.
pub async fn run() -> Result<(), BoxError> {
  crate::util::init_tracing();

  let settings = Settings::load()?;
  let state = AppState::from_settings(&settings).await?;
  if state.seeder.on_startup().await? {
    info!("seeded test data at startup");
  }

  let app = http::build_router(state);
  let addr: SocketAddr = settings.listen_address.parse()?;

  info!("mail items viewer:  http://{}/mail-items/", addr);
  info!("JSON feed:          http://{}/mail-items/data", addr);
  info!("issue form:         http://{}/create-simple-issue", addr);
  info!(policy = ?settings.seed_policy, assets = %settings.assets_dir, "ready");

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;
  Ok(())
}
