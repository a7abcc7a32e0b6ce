//! [`Desk`]: the attendance operations the form calls.
//!
//! Every operation loads settings fresh from the store. Writes for one date
//! (roster rebuild, draft save/clear, finalize) are serialised behind a
//! per-date lock; operations on different dates run independently.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError},
};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::{
  Error, Result,
  calendar::CalendarSource,
  date::{DayWindow, local_timestamp, parse_date, resolve_target_date},
  draft::{self, DraftSelections},
  history::{self, History},
  mail::Mailer,
  notify::{self, NotificationKind},
  record::{AttendanceRecord, Mark, Person, RosterEntry},
  roster::{self, RosterRules},
  settings::{DEFAULT_TIMEZONE, Settings},
  store::AttendanceStore,
};

// ─── Inputs and outputs ──────────────────────────────────────────────────────

/// A draft or final submission from the form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
  pub date:   String,
  #[serde(default)]
  pub marked: Vec<Mark>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterBuilt {
  pub date:  NaiveDate,
  pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterAndHistory {
  pub date:          NaiveDate,
  pub people:        Vec<Person>,
  pub history:       History,
  pub history_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftSaved {
  pub ok:    bool,
  pub saved: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftCleared {
  pub ok:      bool,
  pub removed: usize,
}

/// How one notification email fared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationOutcome {
  pub kind:      NotificationKind,
  pub recipient: String,
  pub delivered: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:     Option<String>,
}

/// Result of a final submission. `ok` reflects persistence only; mail
/// failures are reported in `notifications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finalized {
  pub ok:            bool,
  pub saved:         usize,
  pub present_count: usize,
  pub absent_count:  usize,
  pub notifications: Vec<NotificationOutcome>,
}

// ─── Desk ────────────────────────────────────────────────────────────────────

pub struct Desk<S, C, M> {
  store:            Arc<S>,
  calendar:         Arc<C>,
  mailer:           Arc<M>,
  default_timezone: String,
  clock:            fn() -> DateTime<Utc>,
  locks:            DateLocks,
}

impl<S, C, M> Desk<S, C, M>
where
  S: AttendanceStore,
  C: CalendarSource,
  M: Mailer,
{
  pub fn new(store: Arc<S>, calendar: Arc<C>, mailer: Arc<M>) -> Self {
    Self {
      store,
      calendar,
      mailer,
      default_timezone: DEFAULT_TIMEZONE.to_owned(),
      clock: Utc::now,
      locks: DateLocks::default(),
    }
  }

  /// Zone used when the Settings table has no `TIMEZONE`.
  pub fn with_default_timezone(mut self, timezone: impl Into<String>) -> Self {
    self.default_timezone = timezone.into();
    self
  }

  pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
    self.clock = clock;
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Settings ──────────────────────────────────────────────────────────

  pub async fn settings(&self) -> Result<Settings> {
    let pairs = self.store.settings().await.map_err(store_err)?;
    Settings::from_pairs(pairs, &self.default_timezone)
  }

  /// Store one setting. The change is rejected, and nothing written, if
  /// the resulting settings would not resolve.
  pub async fn put_setting(&self, key: &str, value: &str) -> Result<Settings> {
    let (key, value) = (key.trim().to_owned(), value.trim().to_owned());
    let mut pairs = self.store.settings().await.map_err(store_err)?;
    pairs.push((key.clone(), value.clone()));
    let settings = Settings::from_pairs(pairs, &self.default_timezone)?;

    self
      .store
      .put_setting(key.clone(), value)
      .await
      .map_err(store_err)?;
    tracing::info!(%key, "setting updated");
    Ok(settings)
  }

  // ── Roster ────────────────────────────────────────────────────────────

  /// Rebuild the roster for `date` (or the coming Saturday) from the
  /// calendar.
  pub async fn build_roster(&self, date: Option<&str>) -> Result<RosterBuilt> {
    let settings = self.settings().await?;
    let date = resolve_target_date(date, self.today())?;
    let _guard = self.locks.lock(date).await;
    let count = self.rebuild_roster(date, &settings).await?;
    Ok(RosterBuilt { date, count })
  }

  /// Rebuild the roster, then join it against attendance history.
  pub async fn roster_and_history(&self, date: Option<&str>) -> Result<RosterAndHistory> {
    let settings = self.settings().await?;
    let date = resolve_target_date(date, self.today())?;

    let people: Vec<Person> = {
      let _guard = self.locks.lock(date).await;
      self.rebuild_roster(date, &settings).await?;
      self
        .store
        .roster_for_date(date)
        .await
        .map_err(store_err)?
        .into_iter()
        .map(RosterEntry::into_person)
        .collect()
    };

    let attendance = self.store.list_attendance().await.map_err(store_err)?;
    let history = history::reconcile(&people, &attendance, settings.history_depth);

    Ok(RosterAndHistory {
      date,
      people,
      history,
      history_depth: settings.history_depth,
    })
  }

  /// Caller must hold the lock for `date`.
  async fn rebuild_roster(&self, date: NaiveDate, settings: &Settings) -> Result<usize> {
    let window = DayWindow::for_date(date, settings.timezone);
    let calendar_id = settings.calendar_id.as_deref();

    let events = self
      .calendar
      .events(calendar_id, window)
      .await
      .map_err(|e| Error::Calendar(Box::new(e)))?
      .ok_or_else(|| {
        Error::CalendarNotFound(calendar_id.unwrap_or("default calendar").to_owned())
      })?;

    let people = roster::build_roster(&events, RosterRules {
      officiant:    settings.officiant_email.as_deref(),
      title_filter: settings.event_filter.as_deref(),
    });

    let count = self
      .store
      .replace_roster(date, people)
      .await
      .map_err(store_err)?;
    tracing::info!(%date, events = events.len(), count, "roster rebuilt");
    Ok(count)
  }

  // ── Drafts ────────────────────────────────────────────────────────────

  /// Replace the draft for the submission's date. A person marked more
  /// than once keeps only their last mark.
  pub async fn save_draft(&self, submission: Submission) -> Result<DraftSaved> {
    let settings = self.settings().await?;
    let date = parse_date(&submission.date)?;
    let records = draft::one_per_person(self.records(date, &submission.marked, &settings));

    let _guard = self.locks.lock(date).await;
    let saved = self
      .store
      .replace_draft(date, records)
      .await
      .map_err(store_err)?;
    tracing::info!(%date, saved, "draft saved");
    Ok(DraftSaved { ok: true, saved })
  }

  pub async fn draft(&self, date: &str) -> Result<DraftSelections> {
    let date = parse_date(date)?;
    let rows = self.store.draft_for_date(date).await.map_err(store_err)?;
    Ok(draft::selections(&rows))
  }

  pub async fn clear_draft(&self, date: &str) -> Result<DraftCleared> {
    let date = parse_date(date)?;
    let _guard = self.locks.lock(date).await;
    self.clear_draft_locked(date).await
  }

  async fn clear_draft_locked(&self, date: NaiveDate) -> Result<DraftCleared> {
    let removed = self.store.clear_draft(date).await.map_err(store_err)?;
    tracing::debug!(%date, removed, "draft cleared");
    Ok(DraftCleared { ok: true, removed })
  }

  // ── Finalize ──────────────────────────────────────────────────────────

  /// Append the final attendance, notify the report recipients and drop
  /// the draft for the date.
  pub async fn finalize(&self, submission: Submission) -> Result<Finalized> {
    let settings = self.settings().await?;
    let date = parse_date(&submission.date)?;
    let records = self.records(date, &submission.marked, &settings);

    let _guard = self.locks.lock(date).await;
    let saved = self
      .store
      .append_attendance(records)
      .await
      .map_err(store_err)?;

    let split = notify::partition(&submission.marked);
    let planned = notify::plan(
      date,
      &split,
      settings.present_report_email.as_deref(),
      settings.absent_report_email.as_deref(),
    );

    let mut notifications = Vec::with_capacity(planned.len());
    for (kind, message) in planned {
      let recipient = message.to.clone();
      let error = match self.mailer.send(message).await {
        Ok(()) => None,
        Err(e) => {
          tracing::warn!(%date, ?kind, %recipient, error = %e, "notification failed");
          Some(e.to_string())
        }
      };
      notifications.push(NotificationOutcome {
        kind,
        recipient,
        delivered: error.is_none(),
        error,
      });
    }

    self.clear_draft_locked(date).await?;

    tracing::info!(
      %date,
      saved,
      present = split.present.len(),
      absent = split.absent.len(),
      "attendance finalized"
    );

    Ok(Finalized {
      ok: true,
      saved,
      present_count: split.present.len(),
      absent_count: split.absent.len(),
      notifications,
    })
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  fn today(&self) -> NaiveDate { (self.clock)().with_timezone(&Local).date_naive() }

  fn records(&self, date: NaiveDate, marked: &[Mark], settings: &Settings) -> Vec<AttendanceRecord> {
    let recorded_at = local_timestamp((self.clock)(), settings.timezone);
    marked
      .iter()
      .map(|mark| AttendanceRecord::from_mark(date, mark, recorded_at))
      .collect()
  }
}

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Store(Box::new(e))
}

// ─── Per-date locks ──────────────────────────────────────────────────────────

/// One async mutex per date. Entries live only while someone holds or
/// waits on them.
#[derive(Debug, Default)]
struct DateLocks {
  inner: Mutex<HashMap<NaiveDate, Arc<AsyncMutex<()>>>>,
}

impl DateLocks {
  async fn lock(&self, date: NaiveDate) -> DateGuard<'_> {
    let lock = {
      let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
      Arc::clone(map.entry(date).or_default())
    };
    DateGuard {
      locks: self,
      date,
      guard: Some(lock.lock_owned().await),
    }
  }

  fn release(&self, date: NaiveDate) {
    let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    if map.get(&date).is_some_and(|lock| Arc::strong_count(lock) == 1) {
      map.remove(&date);
    }
  }
}

struct DateGuard<'a> {
  locks: &'a DateLocks,
  date:  NaiveDate,
  guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for DateGuard<'_> {
  fn drop(&mut self) {
    drop(self.guard.take());
    self.locks.release(self.date);
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use tokio::time::timeout;

  use super::*;

  const WAIT: Duration = Duration::from_millis(50);

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  fn entries(locks: &DateLocks) -> usize { locks.inner.lock().unwrap().len() }

  #[tokio::test]
  async fn same_date_waits_other_dates_proceed() {
    let locks = DateLocks::default();
    let held = locks.lock(ymd(2024, 6, 15)).await;

    assert!(timeout(WAIT, locks.lock(ymd(2024, 6, 15))).await.is_err());
    assert!(timeout(WAIT, locks.lock(ymd(2024, 6, 22))).await.is_ok());

    drop(held);
    assert!(timeout(WAIT, locks.lock(ymd(2024, 6, 15))).await.is_ok());
  }

  #[tokio::test]
  async fn waiter_acquires_once_holder_releases() {
    let locks = Arc::new(DateLocks::default());
    let held = locks.lock(ymd(2024, 6, 15)).await;

    let waiter = tokio::spawn({
      let locks = Arc::clone(&locks);
      async move {
        let _guard = locks.lock(ymd(2024, 6, 15)).await;
      }
    });
    tokio::time::sleep(WAIT).await;
    assert!(!waiter.is_finished());

    drop(held);
    timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
  }

  #[tokio::test]
  async fn released_dates_are_evicted() {
    let locks = DateLocks::default();
    let first = locks.lock(ymd(2024, 6, 15)).await;
    let second = locks.lock(ymd(2024, 6, 22)).await;
    assert_eq!(entries(&locks), 2);

    drop(first);
    assert_eq!(entries(&locks), 1);
    drop(second);
    assert_eq!(entries(&locks), 0);
  }
}
