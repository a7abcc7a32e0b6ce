//! Target-date resolution and day windows.
//!
//! Dates cross every boundary as `YYYY-MM-DD` and are treated as plain
//! calendar dates; only the day window is anchored to the configured zone.

use chrono::{
  DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
  TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::{Error, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a `YYYY-MM-DD` string by its first three numeric components.
///
/// Out-of-range months and days roll over into the following period, so
/// `2024-02-30` is 2024-03-01 and `2024-13-01` is 2025-01-01. Components
/// after the third are ignored.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
  let invalid = || Error::InvalidDate(raw.to_owned());
  let mut parts = raw.trim().split('-');
  let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
    return Err(invalid());
  };
  let year: i32 = y.trim().parse().map_err(|_| invalid())?;
  let month: u32 = m.trim().parse().map_err(|_| invalid())?;
  let day: u32 = d.trim().parse().map_err(|_| invalid())?;

  let jan_first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
  let month_start = match month {
    0 => jan_first.checked_sub_months(Months::new(1)),
    m => jan_first.checked_add_months(Months::new(m - 1)),
  };
  month_start
    .and_then(|start| start.checked_add_signed(TimeDelta::days(i64::from(day) - 1)))
    .ok_or_else(invalid)
}

/// `today` if it is a Saturday, otherwise the following Saturday.
pub fn next_or_this_saturday(today: NaiveDate) -> NaiveDate {
  let weekday = today.weekday().num_days_from_sunday();
  let ahead = (6 + 7 - weekday) % 7;
  today + Days::new(u64::from(ahead))
}

/// The explicit date when one is given, else the coming Saturday.
pub fn resolve_target_date(explicit: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
  match explicit.map(str::trim).filter(|s| !s.is_empty()) {
    Some(raw) => parse_date(raw),
    None => Ok(next_or_this_saturday(today)),
  }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
  name
    .trim()
    .parse::<Tz>()
    .map_err(|_| Error::InvalidTimezone(name.to_owned()))
}

/// Wall-clock time of `now` in `tz`, as written to the timestamp column.
pub fn local_timestamp(now: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
  now.with_timezone(&tz).naive_local()
}

// ─── Day window ──────────────────────────────────────────────────────────────

/// One calendar day, 00:00:00.000 through 23:59:59.999 local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
  pub start: DateTime<Utc>,
  pub end:   DateTime<Utc>,
}

impl DayWindow {
  pub fn for_date(date: NaiveDate, tz: Tz) -> Self {
    let midnight = date.and_time(NaiveTime::MIN);
    let last_milli = midnight + TimeDelta::milliseconds(86_399_999);
    Self {
      start: anchor(tz, midnight),
      end:   anchor(tz, last_milli),
    }
  }

  /// Whether an event spanning `start..=end` touches this day.
  pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start <= self.end && end >= self.start
  }
}

/// Map a local wall-clock time to an instant. Ambiguous times take the
/// earlier instant; times inside a DST gap move forward an hour.
fn anchor(tz: Tz, local: NaiveDateTime) -> DateTime<Utc> {
  tz.from_local_datetime(&local)
    .earliest()
    .or_else(|| tz.from_local_datetime(&(local + TimeDelta::hours(1))).earliest())
    .map(|dt| dt.with_timezone(&Utc))
    .unwrap_or_else(|| local.and_utc())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  #[test]
  fn explicit_date_is_taken_literally() {
    assert_eq!(parse_date("2024-06-15").unwrap(), ymd(2024, 6, 15));
    assert_eq!(parse_date(" 2024-6-5 ").unwrap(), ymd(2024, 6, 5));
  }

  #[test]
  fn malformed_dates_are_rejected() {
    for raw in ["2024-06", "2024-xx-15", "15/06/2024", "", "2024-06-1x"] {
      assert!(
        matches!(parse_date(raw), Err(Error::InvalidDate(_))),
        "{raw} should not parse"
      );
    }
  }

  #[test]
  fn out_of_range_components_roll_over() {
    assert_eq!(parse_date("2024-02-30").unwrap(), ymd(2024, 3, 1));
    assert_eq!(parse_date("2023-02-29").unwrap(), ymd(2023, 3, 1));
    assert_eq!(parse_date("2024-13-01").unwrap(), ymd(2025, 1, 1));
    assert_eq!(parse_date("2024-06-00").unwrap(), ymd(2024, 5, 31));
    assert_eq!(parse_date("2024-00-15").unwrap(), ymd(2023, 12, 15));
  }

  #[test]
  fn components_after_the_day_are_ignored() {
    assert_eq!(parse_date("2024-06-15-01").unwrap(), ymd(2024, 6, 15));
  }

  #[test]
  fn saturday_resolves_to_itself() {
    let saturday = ymd(2024, 6, 15);
    assert_eq!(next_or_this_saturday(saturday), saturday);
  }

  #[test]
  fn other_days_resolve_to_following_saturday() {
    // 2024-06-09 is a Sunday, 2024-06-14 a Friday.
    assert_eq!(next_or_this_saturday(ymd(2024, 6, 9)), ymd(2024, 6, 15));
    assert_eq!(next_or_this_saturday(ymd(2024, 6, 14)), ymd(2024, 6, 15));
    assert_eq!(next_or_this_saturday(ymd(2024, 6, 16)), ymd(2024, 6, 22));
  }

  #[test]
  fn blank_explicit_date_means_coming_saturday() {
    let today = ymd(2024, 6, 12);
    assert_eq!(resolve_target_date(Some("  "), today).unwrap(), ymd(2024, 6, 15));
    assert_eq!(resolve_target_date(None, today).unwrap(), ymd(2024, 6, 15));
  }

  #[test]
  fn day_window_spans_local_day() {
    let tz: Tz = "America/New_York".parse().unwrap();
    let window = DayWindow::for_date(ymd(2024, 6, 15), tz);
    assert_eq!(window.start.to_rfc3339(), "2024-06-15T04:00:00+00:00");
    assert_eq!(window.end - window.start, TimeDelta::milliseconds(86_399_999));
  }

  #[test]
  fn overlap_includes_events_touching_the_window() {
    let window = DayWindow::for_date(ymd(2024, 6, 15), Tz::UTC);
    let before = window.start - TimeDelta::hours(2);
    assert!(window.overlaps(before, window.start + TimeDelta::minutes(30)));
    assert!(!window.overlaps(before, before + TimeDelta::minutes(30)));
  }

  #[test]
  fn unknown_timezone_is_a_configuration_error() {
    let err = parse_timezone("Mars/Olympus").unwrap_err();
    assert!(err.is_configuration());
  }
}
