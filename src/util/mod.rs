//! Utility functions: tracing, HTML escape, mail parsing.

use mailparse::{MailAddr, MailHeaderMap, ParsedMail, addrparse_header};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize pretty CLI logging.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  fmt()
    .with_env_filter(filter)
    .with_target(false)
    .pretty()
    .init();
}

/// HTML escaping for text and attribute values.
pub fn html_escape(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
    .replace('\'', "&#39;")
}

/// Addresses from one header. Falls back to a comma split when the header
/// is not valid RFC 5322 address syntax.
pub fn header_addresses(parsed: &ParsedMail<'_>, name: &str) -> Vec<String> {
  let Some(header) = parsed.headers.get_first_header(name) else {
    return Vec::new();
  };
  match addrparse_header(header) {
    Ok(list) => list
      .iter()
      .flat_map(|addr| match addr {
        MailAddr::Single(single) => vec![single.addr.clone()],
        MailAddr::Group(group) => group.addrs.iter().map(|s| s.addr.clone()).collect(),
      })
      .collect(),
    Err(_) => header
      .get_value()
      .split(',')
      .map(|p| p.trim().to_string())
      .filter(|s| !s.is_empty())
      .collect(),
  }
}

/// First text body of a MIME tree, preferring text/plain over text/html.
pub fn extract_text_body(parsed: &ParsedMail<'_>) -> Option<String> {
  let (text, html) = extract_bodies(parsed);
  text.or(html)
}

fn extract_bodies(parsed: &ParsedMail<'_>) -> (Option<String>, Option<String>) {
  if parsed.subparts.is_empty() {
    if is_attachment(parsed) {
      return (None, None);
    }
    let data = parsed.get_body().unwrap_or_default();
    match parsed.ctype.mimetype.as_str() {
      "text/html" => (None, Some(data)),
      _ => (Some(data), None),
    }
  } else {
    let mut text = None;
    let mut html = None;
    for part in &parsed.subparts {
      let (t, h) = extract_bodies(part);
      if text.is_none() && t.is_some() {
        text = t;
      }
      if html.is_none() && h.is_some() {
        html = h;
      }
    }
    (text, html)
  }
}

fn attachment_filename(parsed: &ParsedMail<'_>) -> Option<String> {
  let disposition = parsed.get_content_disposition();
  disposition
    .params
    .get("filename")
    .cloned()
    .or_else(|| parsed.ctype.params.get("name").cloned())
    .filter(|name| !name.is_empty())
}

fn is_attachment(parsed: &ParsedMail<'_>) -> bool {
  let disp = parsed
    .headers
    .get_first_value("Content-Disposition")
    .unwrap_or_default()
    .to_ascii_lowercase();
  let ctype = parsed.ctype.mimetype.as_str();
  let is_text = ctype == "text/plain" || ctype == "text/html";
  disp.contains("attachment") || attachment_filename(parsed).is_some() || !is_text
}

/// Traverse MIME parts and collect attachment file names.
pub fn collect_attachment_names(parsed: &ParsedMail<'_>, out: &mut Vec<String>) {
  if parsed.subparts.is_empty() {
    if is_attachment(parsed) {
      out.push(attachment_filename(parsed).unwrap_or_else(|| "(unnamed)".to_string()));
    }
  } else {
    for part in &parsed.subparts {
      collect_attachment_names(part, out);
    }
  }
}

/// Raw header block of an RFC 5322 message, without the blank separator line.
pub fn raw_header_block(raw: &[u8]) -> String {
  let text = String::from_utf8_lossy(raw);
  let end = text
    .find("\r\n\r\n")
    .or_else(|| text.find("\n\n"))
    .unwrap_or(text.len());
  text[..end].to_string()
}
