//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, NaiveDateTime};
use shrift_core::{
  record::{AttendanceRecord, Person, Status},
  store::AttendanceStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 6, d).unwrap() }

fn at(s: &str) -> NaiveDateTime {
  NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn record(date: NaiveDate, name: &str, status: &str) -> AttendanceRecord {
  AttendanceRecord {
    date,
    name: name.into(),
    email: format!("{}@x.com", name.to_lowercase()),
    baptismal_name: String::new(),
    status: Status::parse(status),
    recorded_at: at("2024-06-15 10:30:00"),
  }
}

// ─── Roster ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_roster_keeps_order() {
  let s = store().await;
  let people = vec![Person::new("Alice", "a@x.com"), Person::new("Bob", "")];

  let written = s.replace_roster(day(15), people.clone()).await.unwrap();
  assert_eq!(written, 2);

  let rows = s.roster_for_date(day(15)).await.unwrap();
  let got: Vec<Person> = rows.into_iter().map(|r| r.into_person()).collect();
  assert_eq!(got, people);
}

#[tokio::test]
async fn replace_roster_only_touches_its_date() {
  let s = store().await;
  s.replace_roster(day(8), vec![Person::new("Old", "old@x.com")]).await.unwrap();
  s.replace_roster(day(15), vec![Person::new("First", "f@x.com")]).await.unwrap();
  s.replace_roster(day(15), vec![Person::new("Second", "s@x.com")]).await.unwrap();

  let fifteenth = s.roster_for_date(day(15)).await.unwrap();
  assert_eq!(fifteenth.len(), 1);
  assert_eq!(fifteenth[0].name, "Second");
  assert_eq!(fifteenth[0].date, day(15));

  let eighth = s.roster_for_date(day(8)).await.unwrap();
  assert_eq!(eighth.len(), 1);
  assert_eq!(eighth[0].name, "Old");
}

#[tokio::test]
async fn empty_roster_clears_the_date() {
  let s = store().await;
  s.replace_roster(day(15), vec![Person::new("A", "a@x.com")]).await.unwrap();
  assert_eq!(s.replace_roster(day(15), vec![]).await.unwrap(), 0);
  assert!(s.roster_for_date(day(15)).await.unwrap().is_empty());
}

// ─── Attendance ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn attendance_accumulates_in_append_order() {
  let s = store().await;
  s.append_attendance(vec![record(day(8), "A", "Present")]).await.unwrap();
  s.append_attendance(vec![
    record(day(15), "A", "Absent"),
    record(day(15), "B", "Late"),
  ])
  .await
  .unwrap();

  let all = s.list_attendance().await.unwrap();
  let summary: Vec<_> = all
    .iter()
    .map(|r| (r.date, r.name.as_str(), r.status.as_str()))
    .collect();
  assert_eq!(summary, [
    (day(8), "A", "Present"),
    (day(15), "A", "Absent"),
    (day(15), "B", "Late"),
  ]);
}

#[tokio::test]
async fn record_fields_roundtrip() {
  let s = store().await;
  let mut r = record(day(15), "Jane", "present");
  r.baptismal_name = "Mary".into();
  s.append_attendance(vec![r.clone()]).await.unwrap();

  let back = s.list_attendance().await.unwrap().remove(0);
  assert_eq!(back, r);
  assert_eq!(back.status, Status::Other("present".into()));
}

// ─── Drafts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_draft_save_replaces_first() {
  let s = store().await;
  s.replace_draft(day(15), vec![record(day(15), "A", "Present"), record(day(15), "B", "Absent")])
    .await
    .unwrap();
  s.replace_draft(day(15), vec![record(day(15), "C", "Present")]).await.unwrap();

  let rows = s.draft_for_date(day(15)).await.unwrap();
  let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
  assert_eq!(names, ["C"]);
}

#[tokio::test]
async fn draft_save_leaves_other_dates() {
  let s = store().await;
  s.replace_draft(day(8), vec![record(day(8), "A", "Present")]).await.unwrap();
  s.replace_draft(day(15), vec![record(day(15), "B", "Absent")]).await.unwrap();

  assert_eq!(s.draft_for_date(day(8)).await.unwrap().len(), 1);
  assert_eq!(s.draft_for_date(day(15)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn clear_draft_reports_removed_and_is_idempotent() {
  let s = store().await;
  s.replace_draft(day(15), vec![record(day(15), "A", ""), record(day(15), "B", "Absent")])
    .await
    .unwrap();
  s.replace_draft(day(8), vec![record(day(8), "C", "Present")]).await.unwrap();

  assert_eq!(s.clear_draft(day(15)).await.unwrap(), 2);
  assert_eq!(s.clear_draft(day(15)).await.unwrap(), 0);
  assert_eq!(s.draft_for_date(day(8)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn drafts_do_not_leak_into_attendance() {
  let s = store().await;
  s.replace_draft(day(15), vec![record(day(15), "A", "Present")]).await.unwrap();
  assert!(s.list_attendance().await.unwrap().is_empty());
}

// ─── Settings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_setting_upserts() {
  let s = store().await;
  s.put_setting("HISTORY_DEPTH".into(), "5".into()).await.unwrap();
  s.put_setting("HISTORY_DEPTH".into(), "2".into()).await.unwrap();
  s.put_setting("CALENDAR_ID".into(), "parish".into()).await.unwrap();

  let pairs = s.settings().await.unwrap();
  assert_eq!(pairs, [
    ("CALENDAR_ID".to_owned(), "parish".to_owned()),
    ("HISTORY_DEPTH".to_owned(), "2".to_owned()),
  ]);
}
