#[tokio::main]
async fn main() {
  // Minimal CLI: support --version/-V
  let mut args = std::env::args().skip(1);
  if let Some(arg) = args.next() {
    if arg == "--version" || arg == "-V" {
      println!("mailview {}", env!("CARGO_PKG_VERSION"));
      return;
    }
    if arg == "--help" || arg == "-h" {
      eprintln!("Usage: mailview [--version]");
      eprintln!("Config file: $MAILVIEW_CONFIG (default mailview.toml); overrides via MAILVIEW_* env vars");
      return;
    }
  }

  if let Err(e) = mailview::app::run().await {
    eprintln!("error: {e}");
    std::process::exit(1);
  }
}
