//! Per-person attendance history for a roster.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  identity::{Identity, RosterLookup},
  record::{AttendanceRecord, Person, Status},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
  pub date:   NaiveDate,
  pub status: Status,
  pub name:   String,
}

/// Keyed by each roster person's identity; newest entry first.
pub type History = BTreeMap<Identity, Vec<HistoryEntry>>;

/// Join `people` against `attendance` (in insertion order).
///
/// Rows are walked newest-to-oldest by position, so "newest" means most
/// recently appended rather than latest timestamp. Each identity keeps at
/// most `depth` entries. Every roster person gets a key, empty when they
/// have no history.
pub fn reconcile(people: &[Person], attendance: &[AttendanceRecord], depth: usize) -> History {
  let lookup = RosterLookup::from_people(people);
  let mut by_identity: HashMap<Identity, Vec<HistoryEntry>> = HashMap::new();

  for row in attendance.iter().rev() {
    let Some(identity) = Identity::resolve(&row.name, &row.email, &lookup) else {
      continue;
    };
    let entries = by_identity.entry(identity).or_default();
    if entries.len() < depth {
      entries.push(HistoryEntry {
        date:   row.date,
        status: row.status.clone(),
        name:   row.name.clone(),
      });
    }
  }

  people
    .iter()
    .filter_map(Person::identity)
    .map(|identity| {
      let entries = by_identity.get(&identity).cloned().unwrap_or_default();
      (identity, entries)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDateTime;

  use super::*;

  fn row(day: u32, name: &str, email: &str, status: &str) -> AttendanceRecord {
    let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
    AttendanceRecord {
      date,
      name: name.to_owned(),
      email: email.to_owned(),
      baptismal_name: String::new(),
      status: Status::parse(status),
      recorded_at: NaiveDateTime::default(),
    }
  }

  fn key(s: &str) -> Identity { Identity::of("", s).unwrap() }

  #[test]
  fn history_is_newest_first_and_capped() {
    let people = [Person::new("Jane", "jane@x.com")];
    let rows: Vec<_> = (1..=5).map(|d| row(d, "Jane", "jane@x.com", "Present")).collect();

    let history = reconcile(&people, &rows, 3);
    let dates: Vec<u32> = history[&key("jane@x.com")]
      .iter()
      .map(|e| chrono::Datelike::day(&e.date))
      .collect();
    assert_eq!(dates, [5, 4, 3]);
  }

  #[test]
  fn depth_bound_holds_for_every_person() {
    let people = [Person::new("A", "a@x.com"), Person::new("B", "")];
    let mut rows = Vec::new();
    for d in 1..=9 {
      rows.push(row(d, "A", "a@x.com", "Present"));
      rows.push(row(d, "B", "", "Absent"));
    }
    for depth in 1..=4 {
      let history = reconcile(&people, &rows, depth);
      assert!(history.values().all(|h| h.len() == depth));
    }
  }

  #[test]
  fn rows_without_email_match_roster_email_by_name() {
    let people = [Person::new("Jane Doe", "jane@x.com")];
    let rows = [
      row(1, "jane doe", "", "Absent"),
      row(8, "Jane Doe", "JANE@x.com", "Present"),
    ];
    let history = reconcile(&people, &rows, 3);
    let statuses: Vec<_> = history[&key("jane@x.com")]
      .iter()
      .map(|e| e.status.as_str())
      .collect();
    assert_eq!(statuses, ["Present", "Absent"]);
  }

  #[test]
  fn roster_people_without_history_get_empty_lists() {
    let people = [Person::new("New Person", "new@x.com"), Person::new("Walk In", "")];
    let rows = [row(1, "Someone Else", "else@x.com", "Present")];
    let history = reconcile(&people, &rows, 3);

    assert_eq!(history.len(), 2);
    assert!(history[&key("new@x.com")].is_empty());
    assert!(history[&Identity::of("Walk In", "").unwrap()].is_empty());
  }

  #[test]
  fn rows_without_any_identity_are_ignored() {
    let people = [Person::new("A", "a@x.com")];
    let rows = [row(1, " ", "", "Present"), row(2, "A", "a@x.com", "Absent")];
    let history = reconcile(&people, &rows, 3);
    assert_eq!(history[&key("a@x.com")].len(), 1);
  }
}
