//! Error types for `shrift-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A caller-supplied date was not a `YYYY-MM-DD` calendar date.
  #[error("invalid date {0:?}: expected YYYY-MM-DD")]
  InvalidDate(String),

  #[error("calendar not found: {0}. Check CALENDAR_ID in Settings.")]
  CalendarNotFound(String),

  #[error("unknown time zone {0:?}. Check TIMEZONE in Settings.")]
  InvalidTimezone(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("calendar error: {0}")]
  Calendar(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Whether the failure stems from the Settings table rather than from the
  /// request or a collaborator.
  pub fn is_configuration(&self) -> bool {
    matches!(self, Self::CalendarNotFound(_) | Self::InvalidTimezone(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
