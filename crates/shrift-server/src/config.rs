//! Server configuration, deserialised from `config.toml` and `SHRIFT_*`
//! environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use shrift_core::settings::DEFAULT_TIMEZONE;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Directory holding one `<calendar id>.json` file per calendar.
  pub calendar_dir:     PathBuf,
  /// Used when the Settings table has no `TIMEZONE`.
  #[serde(default = "default_timezone")]
  pub default_timezone: String,
  /// When set, notifications are POSTed here as JSON; otherwise logged.
  #[serde(default)]
  pub mail_webhook_url: Option<String>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_timezone() -> String { DEFAULT_TIMEZONE.to_owned() }

impl ServerConfig {
  /// Layer `path` (optional) under `SHRIFT_`-prefixed environment variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SHRIFT"))
      .build()?
      .try_deserialize()
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn minimal_config_gets_defaults() {
    let cfg = parse(
      r#"
      store_path   = "shrift.sqlite"
      calendar_dir = "calendars"
      "#,
    );
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.default_timezone, "America/New_York");
    assert!(cfg.mail_webhook_url.is_none());
  }

  #[test]
  fn full_config_overrides_defaults() {
    let cfg = parse(
      r#"
      host             = "0.0.0.0"
      port             = 9000
      store_path       = "/var/lib/shrift/shrift.sqlite"
      calendar_dir     = "/var/lib/shrift/calendars"
      default_timezone = "Europe/London"
      mail_webhook_url = "https://mail.example.org/send"
      "#,
    );
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.mail_webhook_url.as_deref(), Some("https://mail.example.org/send"));
  }

  #[test]
  fn expand_tilde_leaves_absolute_paths() {
    assert_eq!(expand_tilde(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
  }
}
