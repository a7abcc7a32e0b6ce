//! shrift server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store and serves the attendance API over HTTP.
//!
//! # Building a roster from the command line
//!
//! ```
//! cargo run -p shrift-server --bin shrift -- --build-roster 2024-06-15
//! ```
//!
//! Without a date, the coming Saturday is used.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use shrift_core::desk::Desk;
use shrift_server::{JsonCalendarDir, ServerConfig, ServerMailer, expand_tilde};
use shrift_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Confession attendance server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Build the roster for DATE (or the coming Saturday), print it and exit.
  #[arg(long, value_name = "DATE", num_args = 0..=1, default_missing_value = "")]
  build_roster: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg =
    ServerConfig::load(&cli.config).context("failed to load ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let calendar = JsonCalendarDir::new(expand_tilde(&server_cfg.calendar_dir));
  let mailer = ServerMailer::new(server_cfg.mail_webhook_url.as_deref())
    .context("failed to set up mail delivery")?;

  let desk = Arc::new(
    Desk::new(Arc::new(store), Arc::new(calendar), Arc::new(mailer))
      .with_default_timezone(server_cfg.default_timezone.clone()),
  );

  // Helper mode: build one roster and exit.
  if let Some(date) = cli.build_roster {
    let date = Some(date.as_str()).filter(|d| !d.trim().is_empty());
    let built = desk.build_roster(date).await.context("failed to build roster")?;
    println!("{}", serde_json::to_string_pretty(&built)?);
    return Ok(());
  }

  let app = shrift_server::router(desk);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
