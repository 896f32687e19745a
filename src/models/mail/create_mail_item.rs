//! JSON body accepted by the add-email endpoint.

use serde::Deserialize;

/// Recipients arrive either as `"a@x, b@x"` or as `["a@x", "b@x"]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
  Joined(String),
  List(Vec<String>),
}

impl Recipients {
  pub fn into_vec(self) -> Vec<String> {
    let raw = match self {
      Recipients::Joined(s) => s.split(',').map(str::to_string).collect(),
      Recipients::List(v) => v,
    };
    raw
      .into_iter()
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty())
      .collect()
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMailItem {
  pub from: Option<String>,
  pub to: Option<Recipients>,
  pub cc: Option<Recipients>,
  pub bcc: Option<Recipients>,
  pub subject: Option<String>,
  pub body: Option<String>,
  pub attachments_name: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_joined_and_list_recipients() {
    let req: CreateMailItem = serde_json::from_str(
      r#"{"to":"a@example.test, b@example.test","cc":["c@example.test"],"attachmentsName":"x.txt"}"#,
    )
    .unwrap();
    assert_eq!(
      req.to.unwrap().into_vec(),
      vec!["a@example.test", "b@example.test"]
    );
    assert_eq!(req.cc.unwrap().into_vec(), vec!["c@example.test"]);
    assert!(req.bcc.is_none());
    assert_eq!(req.attachments_name.as_deref(), Some("x.txt"));
  }

  #[test]
  fn blank_joined_string_is_no_recipient() {
    assert!(Recipients::Joined(" , ".into()).into_vec().is_empty());
  }
}
