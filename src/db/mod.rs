//! Database helpers: schema setup, path handling and pool creation.

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::Path;

/// Create tables if absent. There is no migration step beyond this.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS mail_items (
            id TEXT PRIMARY KEY,
            from_addr TEXT NOT NULL DEFAULT '',
            to_recipients TEXT NOT NULL DEFAULT '',
            cc_recipients TEXT NOT NULL DEFAULT '',
            bcc_recipients TEXT NOT NULL DEFAULT '',
            subject TEXT NOT NULL DEFAULT '',
            body TEXT NOT NULL DEFAULT '',
            attachments_name TEXT NULL,
            raw_headers TEXT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS issue_creation_log (
            id TEXT PRIMARY KEY,
            project_key TEXT NOT NULL,
            summary TEXT NOT NULL,
            issue_key TEXT NULL,
            author_key TEXT NOT NULL,
            created_at TEXT NOT NULL,
            issue_is_created INTEGER NOT NULL,
            error_message TEXT NULL
        )"#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Ensure SQLite file and parent folder exist for a given sqlx URL.
pub fn ensure_sqlite_path(db_url: &str) -> String {
    if !db_url.starts_with("sqlite:") || db_url.contains(":memory:") {
        return db_url.to_string();
    }
    let path_part = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path_only = path_part.split_once('?').map_or(path_part, |(p, _)| p);
    if !path_only.is_empty() {
        let p = Path::new(path_only);
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        let _ = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(p);
    }
    db_url.to_string()
}

/// Open a pool for `db_url` and make sure the schema exists.
pub async fn connect(db_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let db_url = ensure_sqlite_path(db_url);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&db_url)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
