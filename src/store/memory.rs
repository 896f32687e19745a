//! In-process record store.

use super::{Record, RecordStore, StoreError, StoreOp};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::Mutex;

/// Vector-backed store. Used for `memory:` database URLs and in tests.
pub struct MemoryStore<R> {
  rows: Mutex<Vec<R>>,
}

impl<R> Default for MemoryStore<R> {
  fn default() -> Self {
    Self {
      rows: Mutex::new(Vec::new()),
    }
  }
}

impl<R> MemoryStore<R> {
  pub fn new() -> Self {
    Self::default()
  }
}

fn insert<R: Record>(rows: &mut Vec<R>, record: R) -> Result<(), StoreError> {
  if rows.iter().any(|r| r.record_id() == record.record_id()) {
    return Err(StoreError::Duplicate(record.record_id().to_string()));
  }
  rows.push(record);
  Ok(())
}

fn remove<R: Record>(rows: &mut Vec<R>, records: &[R]) -> u64 {
  let ids: HashSet<&str> = records.iter().map(R::record_id).collect();
  let before = rows.len();
  rows.retain(|r| !ids.contains(r.record_id()));
  (before - rows.len()) as u64
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryStore<R> {
  async fn create(&self, record: R) -> Result<R, StoreError> {
    let mut rows = self.rows.lock().await;
    insert(&mut rows, record.clone())?;
    Ok(record)
  }

  async fn find_all(&self) -> Result<Vec<R>, StoreError> {
    Ok(self.rows.lock().await.clone())
  }

  async fn find_where(&self, filter: R::Filter) -> Result<Vec<R>, StoreError> {
    let rows = self.rows.lock().await;
    Ok(rows.iter().filter(|r| r.matches(&filter)).cloned().collect())
  }

  async fn delete_set(&self, records: &[R]) -> Result<u64, StoreError> {
    let mut rows = self.rows.lock().await;
    Ok(remove(&mut rows, records))
  }

  async fn count(&self) -> Result<u64, StoreError> {
    Ok(self.rows.lock().await.len() as u64)
  }

  async fn transact(&self, ops: Vec<StoreOp<R>>) -> Result<u64, StoreError> {
    let mut rows = self.rows.lock().await;
    // work on a copy so a failing op leaves the store untouched
    let mut scratch = rows.clone();
    let mut affected = 0;
    for op in ops {
      match op {
        StoreOp::Create(record) => {
          insert(&mut scratch, record)?;
          affected += 1;
        }
        StoreOp::DeleteSet(records) => affected += remove(&mut scratch, &records),
      }
    }
    *rows = scratch;
    Ok(affected)
  }
}
