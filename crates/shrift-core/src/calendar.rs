//! The calendar feed the roster is built from.

use std::{collections::HashMap, convert::Infallible, future::Future};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::DayWindow;

/// An invitee on a calendar event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
  #[serde(default)]
  pub name:  String,
  #[serde(default)]
  pub email: String,
}

impl Guest {
  pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
    Self { name: name.into(), email: email.into() }
  }
}

/// A calendar event with its fully expanded guest list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub title:  String,
  pub start:  DateTime<Utc>,
  pub end:    DateTime<Utc>,
  #[serde(default)]
  pub guests: Vec<Guest>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read access to one or more named calendars.
pub trait CalendarSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Events overlapping `window` on the calendar `calendar_id`, or on the
  /// default calendar when `None`.
  ///
  /// Returns `Ok(None)` if no such calendar exists.
  fn events<'a>(
    &'a self,
    calendar_id: Option<&'a str>,
    window: DayWindow,
  ) -> impl Future<Output = Result<Option<Vec<Event>>, Self::Error>> + Send + 'a;
}

// ─── In-memory source ────────────────────────────────────────────────────────

/// A fixed set of calendars held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCalendar {
  default: Option<Vec<Event>>,
  named:   HashMap<String, Vec<Event>>,
}

impl StaticCalendar {
  /// A source whose default calendar holds `events`.
  pub fn with_default(events: Vec<Event>) -> Self {
    Self { default: Some(events), named: HashMap::new() }
  }

  pub fn with_calendar(mut self, id: impl Into<String>, events: Vec<Event>) -> Self {
    self.named.insert(id.into(), events);
    self
  }
}

impl CalendarSource for StaticCalendar {
  type Error = Infallible;

  async fn events<'a>(
    &'a self,
    calendar_id: Option<&'a str>,
    window: DayWindow,
  ) -> Result<Option<Vec<Event>>, Infallible> {
    let events = match calendar_id {
      Some(id) => self.named.get(id),
      None => self.default.as_ref(),
    };
    Ok(events.map(|events| {
      events
        .iter()
        .filter(|ev| window.overlaps(ev.start, ev.end))
        .cloned()
        .collect()
    }))
  }
}
