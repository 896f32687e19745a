//! Mail item operations: create, list, serialize, delete-all, seed.

use super::error::{NO_RECIPIENTS_MESSAGE, ServiceError};
use crate::{
  models::mail::{
    create_mail_item::{CreateMailItem, Recipients},
    mail_item::MailItem, mail_item_json::MailItemJson,
    stored_mail_item::StoredMailItem,
  },
  store::{RecordStore, StoreOp},
  util::{collect_attachment_names, extract_text_body, header_addresses, raw_header_block},
};
use mailparse::{MailHeaderMap, parse_mail};
use std::sync::Arc;
use tracing::{debug, info};

/// Number of records one seed run adds.
pub const SEED_BATCH: u64 = 5;

#[derive(Clone)]
pub struct MailItemService {
  store: Arc<dyn RecordStore<StoredMailItem>>,
}

impl MailItemService {
  pub fn new(store: Arc<dyn RecordStore<StoredMailItem>>) -> Self {
    Self { store }
  }

  /// Persist `item` and hand it back as stored: same id, blank recipient
  /// entries dropped. Rejects items whose to/cc/bcc are all empty.
  pub async fn create(&self, item: MailItem) -> Result<MailItem, ServiceError> {
    let item = item.without_blank_recipients();
    if !item.has_recipients() {
      return Err(ServiceError::Validation(NO_RECIPIENTS_MESSAGE.to_string()));
    }
    self.store.create(StoredMailItem::from(&item)).await?;
    debug!(id = item.id(), "stored mail item");
    Ok(item)
  }

  pub async fn create_from_request(&self, req: CreateMailItem) -> Result<MailItem, ServiceError> {
    let item = MailItem::new(recipients(req.to), recipients(req.cc), recipients(req.bcc))
      .from_addr(req.from.unwrap_or_default())
      .subject(req.subject.unwrap_or_default())
      .body(req.body.unwrap_or_default())
      .attachments_name(req.attachments_name);
    self.create(item).await
  }

  /// Build an item from a raw RFC 5322 message.
  pub async fn create_from_eml(&self, raw: &[u8]) -> Result<MailItem, ServiceError> {
    let parsed =
      parse_mail(raw).map_err(|e| ServiceError::Validation(format!("Invalid EML: {e}")))?;

    let from = header_addresses(&parsed, "From")
      .into_iter()
      .next()
      .or_else(|| parsed.headers.get_first_value("From"))
      .unwrap_or_default();
    let mut attachments = Vec::new();
    collect_attachment_names(&parsed, &mut attachments);

    let item = MailItem::new(
      header_addresses(&parsed, "To"),
      header_addresses(&parsed, "Cc"),
      header_addresses(&parsed, "Bcc"),
    )
    .from_addr(from)
    .subject(parsed.headers.get_first_value("Subject").unwrap_or_default())
    .body(extract_text_body(&parsed).unwrap_or_default())
    .attachments_name((!attachments.is_empty()).then(|| attachments.join(", ")))
    .raw_headers(Some(raw_header_block(raw)));
    self.create(item).await
  }

  /// Every item in store order.
  pub async fn list_all(&self) -> Result<Vec<MailItem>, ServiceError> {
    let rows = self.store.find_all().await?;
    Ok(rows.into_iter().map(MailItem::from).collect())
  }

  pub async fn count(&self) -> Result<u64, ServiceError> {
    Ok(self.store.count().await?)
  }

  pub async fn serialize_all_to_json(&self) -> Result<String, ServiceError> {
    let items = self.list_all().await?;
    let out: Vec<MailItemJson<'_>> = items.iter().map(MailItemJson::from).collect();
    Ok(serde_json::to_string(&out)?)
  }

  /// Delete everything. `false` means the store was already empty.
  pub async fn delete_all(&self) -> Result<bool, ServiceError> {
    let rows = self.store.find_all().await?;
    if rows.is_empty() {
      return Ok(false);
    }
    let removed = self.store.delete_set(&rows).await?;
    info!(removed, "deleted all mail items");
    Ok(true)
  }

  /// Add [`SEED_BATCH`] synthetic items numbered after the current count.
  pub async fn seed_test_data(&self) -> Result<bool, ServiceError> {
    let start = self.store.count().await? + 1;
    let ops = (start..start + SEED_BATCH)
      .map(|i| StoreOp::Create(StoredMailItem::from(&test_item(i))))
      .collect();
    self.store.transact(ops).await?;
    info!(first = start, last = start + SEED_BATCH - 1, "created test mail items");
    Ok(true)
  }
}

fn recipients(list: Option<Recipients>) -> Vec<String> {
  list.map(Recipients::into_vec).unwrap_or_default()
}

fn test_item(i: u64) -> MailItem {
  MailItem::new(vec![format!("recipient{i}@example.com")], vec![], vec![])
    .from_addr(format!("sender{i}@example.com"))
    .subject(format!("Test mail #{i}"))
    .body(format!(
      "This is test mail number {i}. Body text for checking functionality."
    ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::MemoryStore;

  fn service() -> MailItemService {
    MailItemService::new(Arc::new(MemoryStore::<StoredMailItem>::new()))
  }

  fn item(to: &str) -> MailItem {
    MailItem::new(vec![to.to_string()], vec![], vec![])
  }

  #[tokio::test]
  async fn create_rejects_items_without_recipients() {
    let svc = service();
    let err = svc
      .create(MailItem::new(vec![], vec![], vec![]))
      .await
      .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref m) if m == NO_RECIPIENTS_MESSAGE));
    assert_eq!(svc.count().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn create_returns_item_with_its_id() {
    let svc = service();
    let original = item("a@example.test").subject("hi");
    let created = svc.create(original.clone()).await.unwrap();
    assert_eq!(created, original);
    assert_eq!(svc.list_all().await.unwrap(), vec![original]);
  }

  #[tokio::test]
  async fn blank_recipients_are_dropped_before_storing() {
    let svc = service();
    let created = svc
      .create(MailItem::new(vec![String::new()], vec!["x@example.test".into()], vec![]))
      .await
      .unwrap();
    assert!(created.to.is_empty());
    assert_eq!(svc.list_all().await.unwrap(), vec![created]);
  }

  #[tokio::test]
  async fn delete_all_is_idempotent() {
    let svc = service();
    assert!(!svc.delete_all().await.unwrap());

    svc.create(item("a@example.test")).await.unwrap();
    svc.create(item("b@example.test")).await.unwrap();
    assert!(svc.delete_all().await.unwrap());
    assert!(svc.list_all().await.unwrap().is_empty());
    assert!(!svc.delete_all().await.unwrap());
  }

  #[tokio::test]
  async fn seed_numbering_continues_from_count() {
    let svc = service();
    svc.create(item("a@example.test")).await.unwrap();
    svc.create(item("b@example.test")).await.unwrap();

    assert!(svc.seed_test_data().await.unwrap());
    assert!(svc.seed_test_data().await.unwrap());

    let items = svc.list_all().await.unwrap();
    assert_eq!(items.len(), 12);
    let subjects: Vec<&str> = items[2..].iter().map(|m| m.subject.as_str()).collect();
    let expected: Vec<String> = (3..=12).map(|i| format!("Test mail #{i}")).collect();
    assert_eq!(subjects, expected);
    assert_eq!(items[2].from, "sender3@example.com");
    assert_eq!(items[2].to, vec!["recipient3@example.com"]);
  }

  #[tokio::test]
  async fn json_has_every_key_in_store_order() {
    let svc = service();
    let a = svc
      .create(item("a@example.test").from_addr("x@example.test"))
      .await
      .unwrap();
    let b = svc
      .create(
        MailItem::new(vec![], vec!["c@example.test".into()], vec![])
          .attachments_name(Some("f.pdf".into())),
      )
      .await
      .unwrap();

    let json: serde_json::Value =
      serde_json::from_str(&svc.serialize_all_to_json().await.unwrap()).unwrap();
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["id"], a.id());
    assert_eq!(arr[1]["id"], b.id());
    for key in ["id", "from", "to", "cc", "bcc", "subject", "body", "attachmentsName"] {
      assert!(arr[0].get(key).is_some(), "missing {key}");
    }
    assert_eq!(arr[0]["attachmentsName"], "");
    assert_eq!(arr[0]["cc"], serde_json::json!([]));
    assert_eq!(arr[1]["attachmentsName"], "f.pdf");
    assert!(arr[0].get("rawHeaders").is_none());
  }

  #[tokio::test]
  async fn request_with_only_bcc_is_accepted() {
    let svc = service();
    let req: CreateMailItem =
      serde_json::from_str(r#"{"bcc":"hidden@example.test","subject":"s"}"#).unwrap();
    let created = svc.create_from_request(req).await.unwrap();
    assert_eq!(created.bcc, vec!["hidden@example.test"]);
    assert_eq!(created.subject, "s");
  }

  #[tokio::test]
  async fn request_without_recipients_is_rejected() {
    let svc = service();
    let req: CreateMailItem = serde_json::from_str(r#"{"to":"","subject":"s"}"#).unwrap();
    assert!(matches!(
      svc.create_from_request(req).await,
      Err(ServiceError::Validation(_))
    ));
  }

  #[tokio::test]
  async fn eml_fills_headers_body_and_attachments() {
    let svc = service();
    let eml = concat!(
      "From: Dev <dev@example.test>\r\n",
      "To: you@example.test\r\n",
      "Subject: Hello Raw\r\n",
      "MIME-Version: 1.0\r\n",
      "Content-Type: multipart/mixed; boundary=BOUND\r\n",
      "\r\n",
      "--BOUND\r\n",
      "Content-Type: text/plain\r\n\r\n",
      "Hi text\r\n",
      "--BOUND\r\n",
      "Content-Type: application/pdf\r\n",
      "Content-Disposition: attachment; filename=\"report.pdf\"\r\n\r\n",
      "JVBERi0=\r\n",
      "--BOUND--\r\n",
    );
    let item = svc.create_from_eml(eml.as_bytes()).await.unwrap();
    assert_eq!(item.from, "dev@example.test");
    assert_eq!(item.to, vec!["you@example.test"]);
    assert_eq!(item.subject, "Hello Raw");
    assert_eq!(item.body.trim(), "Hi text");
    assert_eq!(item.attachments_name.as_deref(), Some("report.pdf"));
    assert!(item.raw_headers.unwrap().contains("Subject: Hello Raw"));
  }
}
