//! Record store boundary.
//!
//! The service layer only ever talks to [`RecordStore`]; concrete backends
//! live in [`sqlite`] (sqlx) and [`memory`] (in-process).

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A persisted shape that a [`RecordStore`] can hold.
pub trait Record: Clone + Send + Sync + 'static {
  /// Typed predicate accepted by [`RecordStore::find_where`].
  type Filter: Send + Sync;

  fn record_id(&self) -> &str;

  fn matches(&self, filter: &Self::Filter) -> bool;
}

/// One step of a [`RecordStore::transact`] batch.
#[derive(Debug, Clone)]
pub enum StoreOp<R> {
  Create(R),
  DeleteSet(Vec<R>),
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),
  #[error("duplicate record id: {0}")]
  Duplicate(String),
}

/// Create/find/delete access to one record type.
///
/// Atomicity is whatever the backend gives: single calls are atomic,
/// `transact` applies the whole batch or nothing.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
  async fn create(&self, record: R) -> Result<R, StoreError>;

  /// Every record, in insertion order.
  async fn find_all(&self) -> Result<Vec<R>, StoreError>;

  async fn find_where(&self, filter: R::Filter) -> Result<Vec<R>, StoreError>;

  /// Delete the given records by id and return how many rows went away.
  async fn delete_set(&self, records: &[R]) -> Result<u64, StoreError>;

  async fn count(&self) -> Result<u64, StoreError> {
    Ok(self.find_all().await?.len() as u64)
  }

  /// Apply `ops` in order inside one transaction. Returns rows affected.
  async fn transact(&self, ops: Vec<StoreOp<R>>) -> Result<u64, StoreError>;
}
