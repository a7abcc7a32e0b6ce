//! Rows shared by the roster, attendance and draft tables.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::identity::Identity;

// ─── Person ──────────────────────────────────────────────────────────────────

/// Someone expected at an event. Either field may be empty, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub name:  String,
  pub email: String,
}

impl Person {
  pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
    Self { name: name.into(), email: email.into() }
  }

  pub fn identity(&self) -> Option<Identity> {
    Identity::of(&self.name, &self.email)
  }
}

/// One roster row: a person expected on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
  pub date:  NaiveDate,
  pub name:  String,
  pub email: String,
}

impl RosterEntry {
  pub fn into_person(self) -> Person {
    Person { name: self.name, email: self.email }
  }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// An attendance mark. Anything other than the two recognised spellings is
/// kept verbatim in [`Status::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
  /// Blank or whitespace-only.
  #[default]
  Unmarked,
  Present,
  Absent,
  Other(String),
}

impl Status {
  /// Exact parse: only `"Present"` and `"Absent"` spelled that way are
  /// recognised.
  pub fn parse(raw: &str) -> Self {
    if raw.trim().is_empty() {
      return Self::Unmarked;
    }
    match raw {
      "Present" => Self::Present,
      "Absent" => Self::Absent,
      other => Self::Other(other.to_owned()),
    }
  }

  /// Case-insensitive parse over the trimmed value, used when restoring
  /// drafts into the form.
  pub fn normalized(raw: &str) -> Self {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      Self::Unmarked
    } else if trimmed.eq_ignore_ascii_case("present") {
      Self::Present
    } else if trimmed.eq_ignore_ascii_case("absent") {
      Self::Absent
    } else {
      Self::Other(trimmed.to_owned())
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::Unmarked => "",
      Self::Present => "Present",
      Self::Absent => "Absent",
      Self::Other(raw) => raw,
    }
  }

  pub fn is_marked(&self) -> bool { !matches!(self, Self::Unmarked) }
}

impl From<String> for Status {
  fn from(raw: String) -> Self { Self::parse(&raw) }
}

impl From<Status> for String {
  fn from(status: Status) -> Self {
    match status {
      Status::Other(raw) => raw,
      other => other.as_str().to_owned(),
    }
  }
}

// ─── Marks and records ───────────────────────────────────────────────────────

/// One person as marked on the attendance form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
  #[serde(default)]
  pub name:           String,
  #[serde(default)]
  pub email:          String,
  #[serde(default)]
  pub baptismal_name: String,
  #[serde(default)]
  pub status:         Status,
}

/// A stored attendance row. Final rows and draft rows share this shape; they
/// live in different tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
  pub date:           NaiveDate,
  pub name:           String,
  pub email:          String,
  pub baptismal_name: String,
  pub status:         Status,
  /// Wall-clock time in the configured zone when the row was written.
  pub recorded_at:    NaiveDateTime,
}

impl AttendanceRecord {
  pub fn from_mark(date: NaiveDate, mark: &Mark, recorded_at: NaiveDateTime) -> Self {
    Self {
      date,
      name: mark.name.clone(),
      email: mark.email.clone(),
      baptismal_name: mark.baptismal_name.clone(),
      status: mark.status.clone(),
      recorded_at,
    }
  }
}
