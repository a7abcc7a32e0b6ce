//! Present/absent partition and the notification emails sent on finalize.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  date::DATE_FORMAT,
  mail::Message,
  record::{Mark, Status},
};

/// Marks split by status. Anything but an exact `Present` or `Absent` is in
/// neither list.
#[derive(Debug, Clone, Default)]
pub struct Partition<'a> {
  pub present: Vec<&'a Mark>,
  pub absent:  Vec<&'a Mark>,
}

pub fn partition(marked: &[Mark]) -> Partition<'_> {
  let mut out = Partition::default();
  for mark in marked {
    match mark.status {
      Status::Present => out.present.push(mark),
      Status::Absent => out.absent.push(mark),
      _ => {}
    }
  }
  out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
  /// Present list, to the present-report recipient.
  Present,
  /// Absent list followed by the present list, to the absent-report recipient.
  Absent,
}

/// The emails a finalize should send.
///
/// The present report goes out when anyone is present. The absent report
/// needs at least one absent *and* one present mark; an absent-only
/// submission sends nothing to that recipient.
pub fn plan(
  date: NaiveDate,
  split: &Partition<'_>,
  present_recipient: Option<&str>,
  absent_recipient: Option<&str>,
) -> Vec<(NotificationKind, Message)> {
  let date = date.format(DATE_FORMAT).to_string();
  let mut out = Vec::new();

  if let Some(to) = present_recipient
    && !split.present.is_empty()
  {
    let mut lines = vec![format!("Confession attendance for {date}"), String::new()];
    push_section(&mut lines, "Present", &split.present);
    out.push((NotificationKind::Present, Message {
      to:      to.to_owned(),
      subject: format!("Confession Attendance – Present – {date}"),
      body:    lines.join("\n"),
    }));
  }

  if let Some(to) = absent_recipient
    && !split.absent.is_empty()
    && !split.present.is_empty()
  {
    let mut lines = vec![format!("Confession attendance for {date}"), String::new()];
    push_section(&mut lines, "Absent", &split.absent);
    lines.push(String::new());
    push_section(&mut lines, "Present", &split.present);
    out.push((NotificationKind::Absent, Message {
      to:      to.to_owned(),
      subject: format!("Confession Attendance – Absent – {date}"),
      body:    lines.join("\n"),
    }));
  }

  out
}

fn push_section(lines: &mut Vec<String>, heading: &str, marks: &[&Mark]) {
  lines.push(format!("{heading} ({}):", marks.len()));
  lines.extend(marks.iter().map(|m| bullet(m)));
}

fn bullet(mark: &Mark) -> String {
  let mut line = format!("• {}", mark.name);
  if !mark.baptismal_name.is_empty() {
    line.push_str(&format!(" (Baptismal: {})", mark.baptismal_name));
  }
  if !mark.email.is_empty() {
    line.push_str(&format!(" <{}>", mark.email));
  }
  line
}

#[cfg(test)]
mod tests {
  use super::*;

  fn mark(name: &str, email: &str, status: Status) -> Mark {
    Mark { name: name.into(), email: email.into(), baptismal_name: String::new(), status }
  }

  fn date() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 6, 15).unwrap() }

  const PRESENT_TO: Option<&str> = Some("present@parish.org");
  const ABSENT_TO: Option<&str> = Some("absent@parish.org");

  #[test]
  fn partition_uses_exact_status() {
    let marked = [
      mark("A", "", Status::Present),
      mark("B", "", Status::Absent),
      mark("C", "", Status::Other("present".into())),
      mark("D", "", Status::Unmarked),
    ];
    let split = partition(&marked);
    assert_eq!(split.present.len(), 1);
    assert_eq!(split.absent.len(), 1);
  }

  #[test]
  fn absent_only_sends_nothing() {
    let marked = [mark("B", "b@x.com", Status::Absent)];
    let planned = plan(date(), &partition(&marked), PRESENT_TO, ABSENT_TO);
    assert!(planned.is_empty());
  }

  #[test]
  fn present_only_sends_present_report() {
    let marked = [mark("A", "a@x.com", Status::Present)];
    let planned = plan(date(), &partition(&marked), PRESENT_TO, ABSENT_TO);
    let kinds: Vec<_> = planned.iter().map(|(k, _)| *k).collect();
    assert_eq!(kinds, [NotificationKind::Present]);
  }

  #[test]
  fn missing_recipient_skips_that_report() {
    let marked = [mark("A", "", Status::Present), mark("B", "", Status::Absent)];
    let planned = plan(date(), &partition(&marked), None, ABSENT_TO);
    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].0, NotificationKind::Absent);
  }

  #[test]
  fn absent_report_lists_absent_then_present() {
    let mut a = mark("A", "a@x.com", Status::Present);
    a.baptismal_name = "Paul".into();
    let marked = [a, mark("B", "", Status::Absent)];
    let planned = plan(date(), &partition(&marked), PRESENT_TO, ABSENT_TO);

    let (_, absent) = &planned[1];
    assert_eq!(absent.to, "absent@parish.org");
    assert_eq!(absent.subject, "Confession Attendance – Absent – 2024-06-15");
    assert_eq!(
      absent.body,
      "Confession attendance for 2024-06-15\n\nAbsent (1):\n• B\n\nPresent (1):\n• A (Baptismal: Paul) <a@x.com>"
    );
  }
}
