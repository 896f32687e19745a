//! Database row for a mail item.

use crate::store::Record;
use sqlx::FromRow;

/// Flat row shape: recipient lists are comma-joined text columns.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct StoredMailItem {
  pub id: String,
  pub from_addr: String,
  pub to_recipients: String,
  pub cc_recipients: String,
  pub bcc_recipients: String,
  pub subject: String,
  pub body: String,
  pub attachments_name: Option<String>,
  pub raw_headers: Option<String>,
}

#[derive(Debug, Clone)]
pub enum MailItemFilter {
  Id(String),
  Sender(String),
}

impl Record for StoredMailItem {
  type Filter = MailItemFilter;

  fn record_id(&self) -> &str {
    &self.id
  }

  fn matches(&self, filter: &MailItemFilter) -> bool {
    match filter {
      MailItemFilter::Id(id) => &self.id == id,
      MailItemFilter::Sender(from) => &self.from_addr == from,
    }
  }
}
