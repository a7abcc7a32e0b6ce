//! A calendar source backed by a directory of JSON exports.
//!
//! Each calendar is a file `<id>.json` holding an array of
//! [`Event`](shrift_core::calendar::Event)s; the default calendar is
//! `default.json`. A missing file means the calendar does not exist.

use std::{
  io,
  path::{Path, PathBuf},
};

use shrift_core::{
  calendar::{CalendarSource, Event},
  date::DayWindow,
};
use thiserror::Error;

pub const DEFAULT_CALENDAR: &str = "default";

#[derive(Debug, Error)]
pub enum CalendarError {
  #[error("failed to read {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("malformed calendar file {}: {source}", path.display())]
  Json {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

#[derive(Debug, Clone)]
pub struct JsonCalendarDir {
  dir: PathBuf,
}

impl JsonCalendarDir {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  /// File for `id`, or `None` if the id would escape the directory.
  fn path_for(&self, id: &str) -> Option<PathBuf> {
    let id = id.trim();
    let unsafe_id =
      id.is_empty() || id.starts_with('.') || id.contains(['/', '\\']);
    (!unsafe_id).then(|| self.dir.join(format!("{id}.json")))
  }

  pub fn dir(&self) -> &Path { &self.dir }
}

impl CalendarSource for JsonCalendarDir {
  type Error = CalendarError;

  async fn events<'a>(
    &'a self,
    calendar_id: Option<&'a str>,
    window: DayWindow,
  ) -> Result<Option<Vec<Event>>, CalendarError> {
    let Some(path) = self.path_for(calendar_id.unwrap_or(DEFAULT_CALENDAR)) else {
      return Ok(None);
    };

    let bytes = match tokio::fs::read(&path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(source) => return Err(CalendarError::Io { path, source }),
    };

    let events: Vec<Event> = serde_json::from_slice(&bytes)
      .map_err(|source| CalendarError::Json { path: path.clone(), source })?;

    tracing::debug!(path = %path.display(), total = events.len(), "calendar loaded");
    Ok(Some(
      events
        .into_iter()
        .filter(|ev| window.overlaps(ev.start, ev.end))
        .collect(),
    ))
  }
}
