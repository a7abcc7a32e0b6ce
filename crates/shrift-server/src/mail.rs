//! Mail delivery for the server: a JSON webhook, or the log when no
//! webhook is configured.

use std::time::Duration;

use reqwest::Client;
use shrift_core::mail::{Mailer, Message};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
  #[error("mail webhook request failed: {0}")]
  Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub enum ServerMailer {
  /// Write each message to the log at `INFO`.
  Log,
  /// POST `{"to","subject","body"}` to `url`.
  Webhook { client: Client, url: String },
}

impl ServerMailer {
  pub fn new(webhook_url: Option<&str>) -> Result<Self, MailError> {
    match webhook_url.map(str::trim).filter(|u| !u.is_empty()) {
      None => Ok(Self::Log),
      Some(url) => {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self::Webhook { client, url: url.to_owned() })
      }
    }
  }
}

impl Mailer for ServerMailer {
  type Error = MailError;

  async fn send(&self, message: Message) -> Result<(), MailError> {
    match self {
      Self::Log => {
        tracing::info!(to = %message.to, subject = %message.subject, "mail not sent (no webhook)\n{}", message.body);
        Ok(())
      }
      Self::Webhook { client, url } => {
        client
          .post(url)
          .json(&message)
          .send()
          .await?
          .error_for_status()?;
        tracing::debug!(to = %message.to, "mail handed to webhook");
        Ok(())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_webhook_means_log() {
    assert!(matches!(ServerMailer::new(None).unwrap(), ServerMailer::Log));
    assert!(matches!(ServerMailer::new(Some("  ")).unwrap(), ServerMailer::Log));
    assert!(matches!(
      ServerMailer::new(Some("https://mail.example.org/send")).unwrap(),
      ServerMailer::Webhook { .. }
    ));
  }

  #[tokio::test]
  async fn log_mailer_always_succeeds() {
    let message = Message {
      to:      "robel@parish.org".into(),
      subject: "Confession Attendance – Present – 2024-06-15".into(),
      body:    "Present (0):".into(),
    };
    ServerMailer::Log.send(message).await.unwrap();
  }
}
