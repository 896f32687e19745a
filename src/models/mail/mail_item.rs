//! Domain representation of a mail item.

use uuid::Uuid;

/// A stored mail item. The id is assigned once, in [`MailItem::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailItem {
  id: String,
  pub from: String,
  pub to: Vec<String>,
  pub cc: Vec<String>,
  pub bcc: Vec<String>,
  pub subject: String,
  pub body: String,
  pub attachments_name: Option<String>,
  pub raw_headers: Option<String>,
}

impl MailItem {
  pub fn new(to: Vec<String>, cc: Vec<String>, bcc: Vec<String>) -> Self {
    Self::with_id(Uuid::new_v4().to_string(), to, cc, bcc)
  }

  /// Rebuild an item that already has an id (store reads).
  pub(super) fn with_id(id: String, to: Vec<String>, cc: Vec<String>, bcc: Vec<String>) -> Self {
    MailItem {
      id,
      from: String::new(),
      to,
      cc,
      bcc,
      subject: String::new(),
      body: String::new(),
      attachments_name: None,
      raw_headers: None,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn from_addr(mut self, from: impl Into<String>) -> Self {
    self.from = from.into();
    self
  }

  pub fn subject(mut self, subject: impl Into<String>) -> Self {
    self.subject = subject.into();
    self
  }

  pub fn body(mut self, body: impl Into<String>) -> Self {
    self.body = body.into();
    self
  }

  pub fn attachments_name(mut self, names: Option<String>) -> Self {
    self.attachments_name = names;
    self
  }

  pub fn raw_headers(mut self, headers: Option<String>) -> Self {
    self.raw_headers = headers;
    self
  }

  /// Same item with blank entries removed from to/cc/bcc.
  pub fn without_blank_recipients(mut self) -> Self {
    for list in [&mut self.to, &mut self.cc, &mut self.bcc] {
      list.retain(|addr| !addr.trim().is_empty());
    }
    self
  }

  /// True when any of to/cc/bcc holds a non-blank address.
  pub fn has_recipients(&self) -> bool {
    [&self.to, &self.cc, &self.bcc]
      .iter()
      .any(|list| list.iter().any(|addr| !addr.trim().is_empty()))
  }
}
