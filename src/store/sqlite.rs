//! SQLite-backed record store.

use super::{RecordStore, StoreError, StoreOp};
use crate::models::{
  issue::stored_issue_log::{IssueLogFilter, StoredIssueLog},
  mail::stored_mail_item::{MailItemFilter, StoredMailItem},
};
use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};

const MAIL_COLUMNS: &str = "id, from_addr, to_recipients, cc_recipients, bcc_recipients, subject, body, attachments_name, raw_headers";
const LOG_COLUMNS: &str =
  "id, project_key, summary, issue_key, author_key, created_at, issue_is_created, error_message";

/// One pool serves every record type; each type maps to its own table.
#[derive(Clone)]
pub struct SqliteStore {
  pool: SqlitePool,
}

impl SqliteStore {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &SqlitePool {
    &self.pool
  }
}

async fn insert_mail(conn: &mut SqliteConnection, m: &StoredMailItem) -> Result<(), sqlx::Error> {
  sqlx::query(
    "INSERT INTO mail_items (id, from_addr, to_recipients, cc_recipients, bcc_recipients, subject, body, attachments_name, raw_headers) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
  )
  .bind(&m.id)
  .bind(&m.from_addr)
  .bind(&m.to_recipients)
  .bind(&m.cc_recipients)
  .bind(&m.bcc_recipients)
  .bind(&m.subject)
  .bind(&m.body)
  .bind(&m.attachments_name)
  .bind(&m.raw_headers)
  .execute(&mut *conn)
  .await?;
  Ok(())
}

async fn delete_mail(conn: &mut SqliteConnection, rows: &[StoredMailItem]) -> Result<u64, sqlx::Error> {
  let mut affected = 0;
  for m in rows {
    affected += sqlx::query("DELETE FROM mail_items WHERE id = ?")
      .bind(&m.id)
      .execute(&mut *conn)
      .await?
      .rows_affected();
  }
  Ok(affected)
}

async fn insert_log(conn: &mut SqliteConnection, l: &StoredIssueLog) -> Result<(), sqlx::Error> {
  sqlx::query(
    "INSERT INTO issue_creation_log (id, project_key, summary, issue_key, author_key, created_at, issue_is_created, error_message) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
  )
  .bind(&l.id)
  .bind(&l.project_key)
  .bind(&l.summary)
  .bind(&l.issue_key)
  .bind(&l.author_key)
  .bind(l.created_at)
  .bind(l.issue_is_created)
  .bind(&l.error_message)
  .execute(&mut *conn)
  .await?;
  Ok(())
}

async fn delete_logs(conn: &mut SqliteConnection, rows: &[StoredIssueLog]) -> Result<u64, sqlx::Error> {
  let mut affected = 0;
  for l in rows {
    affected += sqlx::query("DELETE FROM issue_creation_log WHERE id = ?")
      .bind(&l.id)
      .execute(&mut *conn)
      .await?
      .rows_affected();
  }
  Ok(affected)
}

#[async_trait]
impl RecordStore<StoredMailItem> for SqliteStore {
  async fn create(&self, record: StoredMailItem) -> Result<StoredMailItem, StoreError> {
    let mut conn = self.pool.acquire().await?;
    insert_mail(&mut conn, &record).await?;
    Ok(record)
  }

  async fn find_all(&self) -> Result<Vec<StoredMailItem>, StoreError> {
    let sql = format!("SELECT {MAIL_COLUMNS} FROM mail_items ORDER BY rowid");
    Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
  }

  async fn find_where(&self, filter: MailItemFilter) -> Result<Vec<StoredMailItem>, StoreError> {
    let (column, value) = match filter {
      MailItemFilter::Id(id) => ("id", id),
      MailItemFilter::Sender(from) => ("from_addr", from),
    };
    let sql = format!("SELECT {MAIL_COLUMNS} FROM mail_items WHERE {column} = ? ORDER BY rowid");
    Ok(sqlx::query_as(&sql).bind(value).fetch_all(&self.pool).await?)
  }

  async fn delete_set(&self, records: &[StoredMailItem]) -> Result<u64, StoreError> {
    let mut tx = self.pool.begin().await?;
    let affected = delete_mail(&mut tx, records).await?;
    tx.commit().await?;
    Ok(affected)
  }

  async fn count(&self) -> Result<u64, StoreError> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mail_items")
      .fetch_one(&self.pool)
      .await?;
    Ok(n as u64)
  }

  async fn transact(&self, ops: Vec<StoreOp<StoredMailItem>>) -> Result<u64, StoreError> {
    let mut tx = self.pool.begin().await?;
    let mut affected = 0;
    for op in ops {
      match op {
        StoreOp::Create(record) => {
          insert_mail(&mut tx, &record).await?;
          affected += 1;
        }
        StoreOp::DeleteSet(records) => affected += delete_mail(&mut tx, &records).await?,
      }
    }
    tx.commit().await?;
    Ok(affected)
  }
}

#[async_trait]
impl RecordStore<StoredIssueLog> for SqliteStore {
  async fn create(&self, record: StoredIssueLog) -> Result<StoredIssueLog, StoreError> {
    let mut conn = self.pool.acquire().await?;
    insert_log(&mut conn, &record).await?;
    Ok(record)
  }

  async fn find_all(&self) -> Result<Vec<StoredIssueLog>, StoreError> {
    let sql = format!("SELECT {LOG_COLUMNS} FROM issue_creation_log ORDER BY rowid");
    Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
  }

  async fn find_where(&self, filter: IssueLogFilter) -> Result<Vec<StoredIssueLog>, StoreError> {
    let base = format!("SELECT {LOG_COLUMNS} FROM issue_creation_log");
    let query: Result<Vec<StoredIssueLog>, sqlx::Error> = match filter {
      IssueLogFilter::Author(author) => {
        sqlx::query_as(&format!("{base} WHERE author_key = ? ORDER BY rowid"))
          .bind(author)
          .fetch_all(&self.pool)
          .await
      }
      IssueLogFilter::CreatedAfter(ts) => {
        sqlx::query_as(&format!("{base} WHERE created_at > ? ORDER BY rowid"))
          .bind(ts)
          .fetch_all(&self.pool)
          .await
      }
      IssueLogFilter::Outcome(created) => {
        sqlx::query_as(&format!("{base} WHERE issue_is_created = ? ORDER BY rowid"))
          .bind(created)
          .fetch_all(&self.pool)
          .await
      }
    };
    Ok(query?)
  }

  async fn delete_set(&self, records: &[StoredIssueLog]) -> Result<u64, StoreError> {
    let mut tx = self.pool.begin().await?;
    let affected = delete_logs(&mut tx, records).await?;
    tx.commit().await?;
    Ok(affected)
  }

  async fn transact(&self, ops: Vec<StoreOp<StoredIssueLog>>) -> Result<u64, StoreError> {
    let mut tx = self.pool.begin().await?;
    let mut affected = 0;
    for op in ops {
      match op {
        StoreOp::Create(record) => {
          insert_log(&mut tx, &record).await?;
          affected += 1;
        }
        StoreOp::DeleteSet(records) => affected += delete_logs(&mut tx, &records).await?,
      }
    }
    tx.commit().await?;
    Ok(affected)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{db, models::mail::mail_item::MailItem};
  use chrono::{Duration, Utc};
  use sqlx::sqlite::SqlitePoolOptions;

  async fn store() -> SqliteStore {
    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .connect("sqlite::memory:")
      .await
      .expect("connect memory sqlite");
    db::run_migrations(&pool).await.expect("migrate");
    SqliteStore::new(pool)
  }

  fn mail(from: &str) -> StoredMailItem {
    StoredMailItem::from(
      &MailItem::new(vec!["to@example.test".into()], vec![], vec![]).from_addr(from),
    )
  }

  fn log(author: &str, created: bool, age_minutes: i64) -> StoredIssueLog {
    StoredIssueLog {
      id: uuid::Uuid::new_v4().to_string(),
      project_key: "OPS".into(),
      summary: "s".into(),
      issue_key: created.then(|| "OPS-1".to_string()),
      author_key: author.into(),
      created_at: Utc::now() - Duration::minutes(age_minutes),
      issue_is_created: created,
      error_message: None,
    }
  }

  #[tokio::test]
  async fn mail_rows_come_back_in_insertion_order() {
    let store = store().await;
    let a = store.create(mail("a@example.test")).await.unwrap();
    let b = store.create(mail("b@example.test")).await.unwrap();

    let all: Vec<StoredMailItem> = store.find_all().await.unwrap();
    assert_eq!(all, vec![a.clone(), b]);
    let by_sender: Vec<StoredMailItem> = store
      .find_where(MailItemFilter::Sender("a@example.test".into()))
      .await
      .unwrap();
    assert_eq!(by_sender, vec![a]);
    assert_eq!(RecordStore::<StoredMailItem>::count(&store).await.unwrap(), 2);
  }

  #[tokio::test]
  async fn delete_set_empties_table() {
    let store = store().await;
    store.create(mail("a@example.test")).await.unwrap();
    store.create(mail("b@example.test")).await.unwrap();

    let all: Vec<StoredMailItem> = store.find_all().await.unwrap();
    assert_eq!(store.delete_set(&all).await.unwrap(), 2);
    assert_eq!(RecordStore::<StoredMailItem>::count(&store).await.unwrap(), 0);
  }

  #[tokio::test]
  async fn transaction_rolls_back_on_duplicate() {
    let store = store().await;
    let existing = store.create(mail("a@example.test")).await.unwrap();

    let result = store
      .transact(vec![
        StoreOp::Create(mail("b@example.test")),
        StoreOp::Create(existing),
      ])
      .await;
    assert!(result.is_err());
    assert_eq!(RecordStore::<StoredMailItem>::count(&store).await.unwrap(), 1);
  }

  #[tokio::test]
  async fn issue_logs_filter_by_author_outcome_and_time() {
    let store = store().await;
    store
      .transact(vec![
        StoreOp::Create(log("alice", true, 60)),
        StoreOp::Create(log("bob", false, 1)),
      ])
      .await
      .unwrap();

    let alice: Vec<StoredIssueLog> = store
      .find_where(IssueLogFilter::Author("alice".into()))
      .await
      .unwrap();
    assert_eq!(alice.len(), 1);
    let failed: Vec<StoredIssueLog> = store.find_where(IssueLogFilter::Outcome(false)).await.unwrap();
    assert_eq!(failed[0].author_key, "bob");
    let recent: Vec<StoredIssueLog> = store
      .find_where(IssueLogFilter::CreatedAfter(Utc::now() - Duration::minutes(10)))
      .await
      .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].author_key, "bob");
  }
}
