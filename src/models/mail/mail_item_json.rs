//! API representation of a mail item.

use super::mail_item::MailItem;
use serde::Serialize;

/// Every key is always present; a missing attachment list renders as `""`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailItemJson<'a> {
  pub id: &'a str,
  pub from: &'a str,
  pub to: &'a [String],
  pub cc: &'a [String],
  pub bcc: &'a [String],
  pub subject: &'a str,
  pub body: &'a str,
  pub attachments_name: &'a str,
}

impl<'a> From<&'a MailItem> for MailItemJson<'a> {
  fn from(item: &'a MailItem) -> Self {
    MailItemJson {
      id: item.id(),
      from: &item.from,
      to: &item.to,
      cc: &item.cc,
      bcc: &item.bcc,
      subject: &item.subject,
      body: &item.body,
      attachments_name: item.attachments_name.as_deref().unwrap_or_default(),
    }
  }
}
