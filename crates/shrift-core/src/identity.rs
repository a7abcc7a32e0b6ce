//! Identity resolution across roster, attendance and draft rows.
//!
//! A person is identified by their lowercased, trimmed email when they have
//! one, otherwise by their lowercased, trimmed name. Attendance rows written
//! without an email can still be matched to a roster email through a
//! [`RosterLookup`].

use std::{collections::HashMap, fmt};

use serde::Serialize;

use crate::record::Person;

/// A normalised identity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
  /// Email if present, else name. `None` when both are blank.
  pub fn of(name: &str, email: &str) -> Option<Self> {
    non_blank(email)
      .or_else(|| non_blank(name))
      .map(|key| Self(key.to_lowercase()))
  }

  /// Resolution order for attendance rows: the row's own email, then the
  /// roster email recorded for the row's name, then the name itself.
  pub fn resolve(name: &str, email: &str, lookup: &RosterLookup) -> Option<Self> {
    if let Some(email) = non_blank(email) {
      return Some(Self(email.to_lowercase()));
    }
    if let Some(roster_email) = lookup.email_for(name) {
      return Some(Self(roster_email.to_owned()));
    }
    non_blank(name).map(|name| Self(name.to_lowercase()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Identity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

fn non_blank(s: &str) -> Option<&str> {
  let trimmed = s.trim();
  (!trimmed.is_empty()).then_some(trimmed)
}

// ─── Roster lookup ───────────────────────────────────────────────────────────

/// Lowercased name → lowercased email, built from one date's roster. Only
/// people with both a name and an email contribute.
#[derive(Debug, Clone, Default)]
pub struct RosterLookup {
  by_name: HashMap<String, String>,
}

impl RosterLookup {
  pub fn from_people<'a>(people: impl IntoIterator<Item = &'a Person>) -> Self {
    let by_name = people
      .into_iter()
      .filter_map(|p| {
        let name = non_blank(&p.name)?;
        let email = non_blank(&p.email)?;
        Some((name.to_lowercase(), email.to_lowercase()))
      })
      .collect();
    Self { by_name }
  }

  pub fn email_for(&self, name: &str) -> Option<&str> {
    let key = non_blank(name)?.to_lowercase();
    self.by_name.get(&key).map(String::as_str)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_wins_over_name() {
    let id = Identity::of("Jane Doe", "  Jane@X.com ").unwrap();
    assert_eq!(id.as_str(), "jane@x.com");
  }

  #[test]
  fn name_used_when_email_blank() {
    let id = Identity::of(" Jane Doe ", "   ").unwrap();
    assert_eq!(id.as_str(), "jane doe");
    assert!(Identity::of("", " ").is_none());
  }

  #[test]
  fn resolve_falls_back_to_roster_email_for_name() {
    let roster = [Person::new("Jane Doe", "Jane@X.com")];
    let lookup = RosterLookup::from_people(&roster);

    let id = Identity::resolve("JANE DOE", "", &lookup).unwrap();
    assert_eq!(id.as_str(), "jane@x.com");

    let own = Identity::resolve("Jane Doe", "other@x.com", &lookup).unwrap();
    assert_eq!(own.as_str(), "other@x.com");

    let stranger = Identity::resolve("John Roe", "", &lookup).unwrap();
    assert_eq!(stranger.as_str(), "john roe");
  }

  #[test]
  fn lookup_skips_people_without_email() {
    let roster = [Person::new("Walk In", "")];
    let lookup = RosterLookup::from_people(&roster);
    assert!(lookup.email_for("walk in").is_none());
  }
}
