//! Conversion between [`StoredMailItem`] rows and [`MailItem`] values.
//!
//! Lists are joined with [`LIST_DELIMITER`]. An address that itself contains
//! the delimiter does not survive a round trip; the store has scalar text
//! columns only. Blank addresses are dropped on the way in, so `[""]` reads
//! back as `[]`.

use super::{mail_item::MailItem, stored_mail_item::StoredMailItem};

pub const LIST_DELIMITER: char = ',';

/// Joins the non-blank addresses.
pub fn join_list(list: &[String]) -> String {
  list
    .iter()
    .filter(|addr| !addr.trim().is_empty())
    .map(String::as_str)
    .collect::<Vec<_>>()
    .join(&LIST_DELIMITER.to_string())
}

/// Empty text yields an empty list, never `[""]`.
pub fn split_list(joined: &str) -> Vec<String> {
  if joined.is_empty() {
    return Vec::new();
  }
  joined.split(LIST_DELIMITER).map(str::to_string).collect()
}

pub fn to_domain(stored: StoredMailItem) -> MailItem {
  MailItem::with_id(
    stored.id,
    split_list(&stored.to_recipients),
    split_list(&stored.cc_recipients),
    split_list(&stored.bcc_recipients),
  )
  .from_addr(stored.from_addr)
  .subject(stored.subject)
  .body(stored.body)
  .attachments_name(stored.attachments_name)
  .raw_headers(stored.raw_headers)
}

pub fn to_stored(item: &MailItem) -> StoredMailItem {
  StoredMailItem {
    id: item.id().to_string(),
    from_addr: item.from.clone(),
    to_recipients: join_list(&item.to),
    cc_recipients: join_list(&item.cc),
    bcc_recipients: join_list(&item.bcc),
    subject: item.subject.clone(),
    body: item.body.clone(),
    attachments_name: item.attachments_name.clone(),
    raw_headers: item.raw_headers.clone(),
  }
}

impl From<StoredMailItem> for MailItem {
  fn from(stored: StoredMailItem) -> Self {
    to_domain(stored)
  }
}

impl From<&MailItem> for StoredMailItem {
  fn from(item: &MailItem) -> Self {
    to_stored(item)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> MailItem {
    MailItem::new(
      vec!["a@example.test".into(), "b@example.test".into()],
      vec![],
      vec!["c@example.test".into()],
    )
    .from_addr("sender@example.test")
    .subject("Quarterly report")
    .body("line one\nline two")
    .attachments_name(Some("report.pdf".into()))
  }

  #[test]
  fn round_trip_preserves_every_field() {
    let item = sample();
    let back = to_domain(to_stored(&item));
    assert_eq!(back, item);
  }

  #[test]
  fn empty_lists_store_as_empty_text() {
    let stored = to_stored(&sample());
    assert_eq!(stored.cc_recipients, "");
    assert_eq!(stored.to_recipients, "a@example.test,b@example.test");
    assert!(to_domain(stored).cc.is_empty());
  }

  #[test]
  fn delimiter_inside_an_address_splits_it() {
    let item = MailItem::new(vec!["\"Doe, Jane\" <jane@example.test>".into()], vec![], vec![]);
    let back = to_domain(to_stored(&item));
    assert_eq!(back.to.len(), 2);
    assert_ne!(back.to, item.to);
    assert_eq!(back.id(), item.id());
  }

  #[test]
  fn blank_addresses_are_not_stored() {
    let item = MailItem::new(vec![String::new()], vec![" ".into(), "x@example.test".into()], vec![]);
    let stored = to_stored(&item);
    assert_eq!(stored.to_recipients, "");
    assert_eq!(stored.cc_recipients, "x@example.test");
    let back = to_domain(stored);
    assert_eq!(back, item.without_blank_recipients());
  }

  #[test]
  fn split_keeps_empty_middle_elements() {
    assert_eq!(split_list("a,,b"), vec!["a", "", "b"]);
    assert!(split_list("").is_empty());
  }
}
