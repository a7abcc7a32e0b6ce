//! The `AttendanceStore` trait.
//!
//! Implemented by storage backends (e.g. `shrift-store-sqlite`). Roster and
//! draft rows are partitioned by date: replacing one date's rows never
//! touches another date. Attendance rows are append-only.

use std::future::Future;

use chrono::NaiveDate;

use crate::record::{AttendanceRecord, Person, RosterEntry};

/// All methods return `Send` futures so the trait can be used behind `axum`.
pub trait AttendanceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Roster ────────────────────────────────────────────────────────────

  /// Atomically replace the roster for `date` with `people`, in order.
  /// Returns the number of rows written.
  fn replace_roster(
    &self,
    date: NaiveDate,
    people: Vec<Person>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Roster rows for `date` in the order they were written.
  fn roster_for_date(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<RosterEntry>, Self::Error>> + Send + '_;

  // ── Attendance (append-only) ──────────────────────────────────────────

  fn append_attendance(
    &self,
    records: Vec<AttendanceRecord>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Every attendance row, oldest append first.
  fn list_attendance(
    &self,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + '_;

  // ── Drafts ────────────────────────────────────────────────────────────

  /// Atomically replace the draft rows for `date` with `records`.
  fn replace_draft(
    &self,
    date: NaiveDate,
    records: Vec<AttendanceRecord>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  fn draft_for_date(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + '_;

  /// Delete the draft rows for `date`, returning how many were removed.
  fn clear_draft(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Settings ──────────────────────────────────────────────────────────

  /// Raw key/value pairs from the Settings table.
  fn settings(
    &self,
  ) -> impl Future<Output = Result<Vec<(String, String)>, Self::Error>> + Send + '_;

  fn put_setting(
    &self,
    key: String,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
