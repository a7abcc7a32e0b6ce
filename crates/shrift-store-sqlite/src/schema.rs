//! SQL schema for the shrift SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Partitioned by event_date; a rebuild replaces one date's rows.
CREATE TABLE IF NOT EXISTS roster (
    row_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    event_date  TEXT NOT NULL,   -- YYYY-MM-DD
    name        TEXT NOT NULL,
    email       TEXT NOT NULL
);

-- Append-only. row_id order is the recency order used for history.
CREATE TABLE IF NOT EXISTS attendance (
    row_id          INTEGER PRIMARY KEY AUTOINCREMENT,
    event_date      TEXT NOT NULL,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL,
    baptismal_name  TEXT NOT NULL DEFAULT '',
    status          TEXT NOT NULL DEFAULT '',
    recorded_at     TEXT NOT NULL  -- YYYY-MM-DD HH:MM:SS, configured zone
);

CREATE TABLE IF NOT EXISTS attendance_draft (
    row_id          INTEGER PRIMARY KEY AUTOINCREMENT,
    event_date      TEXT NOT NULL,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL,
    baptismal_name  TEXT NOT NULL DEFAULT '',
    status          TEXT NOT NULL DEFAULT '',
    recorded_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS settings (
    key    TEXT PRIMARY KEY,
    value  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS roster_date_idx ON roster(event_date);
CREATE INDEX IF NOT EXISTS draft_date_idx  ON attendance_draft(event_date);

PRAGMA user_version = 1;
";

/// Tables sharing the attendance row layout.
#[derive(Debug, Clone, Copy)]
pub enum RecordTable {
  Attendance,
  Draft,
}

impl RecordTable {
  pub fn name(self) -> &'static str {
    match self {
      Self::Attendance => "attendance",
      Self::Draft => "attendance_draft",
    }
  }
}
