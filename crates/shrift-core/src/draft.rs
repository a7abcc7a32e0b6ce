//! Restoring saved draft rows into form selections.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::{
  identity::Identity,
  record::{AttendanceRecord, Status},
};

/// What the form pre-selects for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSelection {
  pub status:         Status,
  pub baptismal_name: String,
}

pub type DraftSelections = BTreeMap<Identity, DraftSelection>;

/// Turn one date's draft rows into selections keyed by identity.
///
/// Blank statuses are skipped so unmarked people are never pre-selected;
/// `present`/`absent` in any casing come back canonical. A later row for the
/// same identity wins.
pub fn selections(rows: &[AttendanceRecord]) -> DraftSelections {
  let mut out = DraftSelections::new();
  for row in rows {
    let Some(identity) = Identity::of(&row.name, &row.email) else {
      continue;
    };
    let status = Status::normalized(row.status.as_str());
    if !status.is_marked() {
      continue;
    }
    out.insert(identity, DraftSelection {
      status,
      baptismal_name: row.baptismal_name.trim().to_owned(),
    });
  }
  out
}

/// Keep one record per `(name, email)` pair. A repeated pair takes the
/// later record's values at the earlier record's position.
pub fn one_per_person(records: Vec<AttendanceRecord>) -> Vec<AttendanceRecord> {
  let mut seen: HashMap<(String, String), usize> = HashMap::new();
  let mut out: Vec<AttendanceRecord> = Vec::with_capacity(records.len());
  for record in records {
    let key = (record.name.trim().to_owned(), record.email.trim().to_owned());
    match seen.get(&key) {
      Some(&at) => out[at] = record,
      None => {
        seen.insert(key, out.len());
        out.push(record);
      }
    }
  }
  out
}
