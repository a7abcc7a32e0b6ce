//! Outgoing notification mail.

use std::{
  future::Future,
  sync::{Mutex, PoisonError},
};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
  pub to:      String,
  pub subject: String,
  pub body:    String,
}

pub trait Mailer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn send(
    &self,
    message: Message,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Recording mailer ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("mail to {0} rejected")]
pub struct Rejected(pub String);

/// Keeps every accepted message in memory. Recipients added with
/// [`RecordingMailer::rejecting`] fail instead.
#[derive(Debug, Default)]
pub struct RecordingMailer {
  sent:      Mutex<Vec<Message>>,
  rejecting: Vec<String>,
}

impl RecordingMailer {
  pub fn new() -> Self { Self::default() }

  pub fn rejecting(mut self, recipient: impl Into<String>) -> Self {
    self.rejecting.push(recipient.into());
    self
  }

  pub fn sent(&self) -> Vec<Message> {
    self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }
}

impl Mailer for RecordingMailer {
  type Error = Rejected;

  async fn send(&self, message: Message) -> Result<(), Rejected> {
    if self.rejecting.contains(&message.to) {
      return Err(Rejected(message.to));
    }
    self
      .sent
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push(message);
    Ok(())
  }
}
