//! [`SqliteStore`]: the SQLite implementation of [`AttendanceStore`].

use std::path::Path;

use chrono::NaiveDate;
use shrift_core::{
  record::{AttendanceRecord, Person, RosterEntry},
  store::AttendanceStore,
};

use crate::{
  Result,
  encode::{RawRecord, RawRosterEntry, encode_date},
  schema::{RecordTable, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The attendance tables backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Replace `table`'s rows for `date` inside one transaction.
  async fn replace_records(
    &self,
    table: RecordTable,
    date: NaiveDate,
    records: Vec<AttendanceRecord>,
  ) -> Result<usize> {
    let date_str = encode_date(date);
    let raws: Vec<RawRecord> = records.into_iter().map(RawRecord::from_record).collect();

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          &format!("DELETE FROM {} WHERE event_date = ?1", table.name()),
          rusqlite::params![date_str],
        )?;
        let written = insert_records(&tx, table, &raws)?;
        tx.commit()?;
        Ok(written)
      })
      .await?;
    Ok(written)
  }

  /// Rows of `table`, optionally restricted to one date, in `row_id` order.
  async fn select_records(
    &self,
    table: RecordTable,
    date: Option<NaiveDate>,
  ) -> Result<Vec<AttendanceRecord>> {
    let date_str = date.map(encode_date);

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let columns = "event_date, name, email, baptismal_name, status, recorded_at";
        let rows = if let Some(d) = date_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {columns} FROM {} WHERE event_date = ?1 ORDER BY row_id",
            table.name()
          ))?;
          stmt
            .query_map(rusqlite::params![d], RawRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {columns} FROM {} ORDER BY row_id",
            table.name()
          ))?;
          stmt
            .query_map([], RawRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }
}

fn insert_records(
  tx: &rusqlite::Transaction<'_>,
  table: RecordTable,
  raws: &[RawRecord],
) -> rusqlite::Result<usize> {
  let mut stmt = tx.prepare(&format!(
    "INSERT INTO {} (event_date, name, email, baptismal_name, status, recorded_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    table.name()
  ))?;
  for raw in raws {
    stmt.execute(rusqlite::params![
      raw.event_date,
      raw.name,
      raw.email,
      raw.baptismal_name,
      raw.status,
      raw.recorded_at,
    ])?;
  }
  Ok(raws.len())
}

// ─── AttendanceStore impl ────────────────────────────────────────────────────

impl AttendanceStore for SqliteStore {
  type Error = crate::Error;

  // ── Roster ────────────────────────────────────────────────────────────────

  async fn replace_roster(&self, date: NaiveDate, people: Vec<Person>) -> Result<usize> {
    let date_str = encode_date(date);

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM roster WHERE event_date = ?1",
          rusqlite::params![date_str],
        )?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO roster (event_date, name, email) VALUES (?1, ?2, ?3)",
          )?;
          for p in &people {
            stmt.execute(rusqlite::params![date_str, p.name, p.email])?;
          }
        }
        tx.commit()?;
        Ok(people.len())
      })
      .await?;

    tracing::debug!(%date, written, "roster partition replaced");
    Ok(written)
  }

  async fn roster_for_date(&self, date: NaiveDate) -> Result<Vec<RosterEntry>> {
    let date_str = encode_date(date);

    let raws: Vec<RawRosterEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT event_date, name, email FROM roster
           WHERE event_date = ?1 ORDER BY row_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![date_str], |row| {
            Ok(RawRosterEntry {
              event_date: row.get(0)?,
              name:       row.get(1)?,
              email:      row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRosterEntry::into_entry).collect()
  }

  // ── Attendance (append-only) ──────────────────────────────────────────────

  async fn append_attendance(&self, records: Vec<AttendanceRecord>) -> Result<usize> {
    let raws: Vec<RawRecord> = records.into_iter().map(RawRecord::from_record).collect();

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let written = insert_records(&tx, RecordTable::Attendance, &raws)?;
        tx.commit()?;
        Ok(written)
      })
      .await?;
    Ok(written)
  }

  async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>> {
    self.select_records(RecordTable::Attendance, None).await
  }

  // ── Drafts ────────────────────────────────────────────────────────────────

  async fn replace_draft(
    &self,
    date: NaiveDate,
    records: Vec<AttendanceRecord>,
  ) -> Result<usize> {
    self.replace_records(RecordTable::Draft, date, records).await
  }

  async fn draft_for_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>> {
    self.select_records(RecordTable::Draft, Some(date)).await
  }

  async fn clear_draft(&self, date: NaiveDate) -> Result<usize> {
    let date_str = encode_date(date);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM attendance_draft WHERE event_date = ?1",
          rusqlite::params![date_str],
        )?)
      })
      .await?;
    Ok(removed)
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn settings(&self) -> Result<Vec<(String, String)>> {
    let pairs = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<(String, String)>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(pairs)
  }

  async fn put_setting(&self, key: String, value: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO settings (key, value) VALUES (?1, ?2)
           ON CONFLICT(key) DO UPDATE SET value = excluded.value",
          rusqlite::params![key, value],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
