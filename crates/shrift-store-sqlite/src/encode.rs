//! Encoding and decoding between domain types and SQLite text columns.
//!
//! Dates are stored as `YYYY-MM-DD`, timestamps as `YYYY-MM-DD HH:MM:SS`.
//! Statuses are stored verbatim.

use chrono::{NaiveDate, NaiveDateTime};
use shrift_core::{
  date::{DATE_FORMAT, TIMESTAMP_FORMAT},
  record::{AttendanceRecord, RosterEntry, Status},
};

use crate::{Error, Result};

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn encode_timestamp(ts: NaiveDateTime) -> String { ts.format(TIMESTAMP_FORMAT).to_string() }

pub fn decode_timestamp(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A roster row as read from SQLite, before decoding.
pub struct RawRosterEntry {
  pub event_date: String,
  pub name:       String,
  pub email:      String,
}

impl RawRosterEntry {
  pub fn into_entry(self) -> Result<RosterEntry> {
    Ok(RosterEntry {
      date:  decode_date(&self.event_date)?,
      name:  self.name,
      email: self.email,
    })
  }
}

/// An attendance or draft row in column form.
pub struct RawRecord {
  pub event_date:     String,
  pub name:           String,
  pub email:          String,
  pub baptismal_name: String,
  pub status:         String,
  pub recorded_at:    String,
}

impl RawRecord {
  pub fn from_record(record: AttendanceRecord) -> Self {
    Self {
      event_date:     encode_date(record.date),
      name:           record.name,
      email:          record.email,
      baptismal_name: record.baptismal_name,
      status:         record.status.into(),
      recorded_at:    encode_timestamp(record.recorded_at),
    }
  }

  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      date:           decode_date(&self.event_date)?,
      name:           self.name,
      email:          self.email,
      baptismal_name: self.baptismal_name,
      status:         Status::parse(&self.status),
      recorded_at:    decode_timestamp(&self.recorded_at)?,
    })
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_date:     row.get(0)?,
      name:           row.get(1)?,
      email:          row.get(2)?,
      baptismal_name: row.get(3)?,
      status:         row.get(4)?,
      recorded_at:    row.get(5)?,
    })
  }
}
