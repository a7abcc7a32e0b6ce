//! Key/value settings with defaults.

use std::collections::BTreeMap;

use chrono_tz::Tz;

use crate::{Result, date::parse_timezone};

pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_HISTORY_DEPTH: usize = 3;

/// Keys recognised in the Settings table.
pub mod keys {
  pub const TIMEZONE: &str = "TIMEZONE";
  pub const HISTORY_DEPTH: &str = "HISTORY_DEPTH";
  pub const CALENDAR_ID: &str = "CALENDAR_ID";
  pub const EVENT_FILTER: &str = "EVENT_FILTER";
  pub const PRIEST_EMAIL: &str = "PRIEST_EMAIL";
  pub const PRESENT_REPORT_EMAIL: &str = "PRESENT_REPORT_EMAIL";
  pub const ABSENT_REPORT_EMAIL: &str = "ABSENT_REPORT_EMAIL";
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
  pub timezone:             Tz,
  /// At least 1.
  pub history_depth:        usize,
  /// `None` selects the default calendar.
  pub calendar_id:          Option<String>,
  pub event_filter:         Option<String>,
  pub officiant_email:      Option<String>,
  pub present_report_email: Option<String>,
  pub absent_report_email:  Option<String>,
}

impl Settings {
  /// Resolve raw table pairs. Keys and values are trimmed; blank keys are
  /// ignored and blank values count as unset. A later duplicate key wins.
  pub fn from_pairs<I, K, V>(pairs: I, default_timezone: &str) -> Result<Self>
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
  {
    let raw = normalise(pairs);
    let get = |key: &str| raw.get(key).filter(|v| !v.is_empty()).cloned();

    let timezone = parse_timezone(
      get(keys::TIMEZONE).as_deref().unwrap_or(default_timezone),
    )?;
    let history_depth = get(keys::HISTORY_DEPTH)
      .and_then(|v| v.parse::<i64>().ok())
      .map_or(DEFAULT_HISTORY_DEPTH, |d| usize::try_from(d.max(1)).unwrap_or(1));

    Ok(Self {
      timezone,
      history_depth,
      calendar_id: get(keys::CALENDAR_ID),
      event_filter: get(keys::EVENT_FILTER),
      officiant_email: get(keys::PRIEST_EMAIL),
      present_report_email: get(keys::PRESENT_REPORT_EMAIL),
      absent_report_email: get(keys::ABSENT_REPORT_EMAIL),
    })
  }

  /// The effective settings as table pairs, defaults filled in.
  pub fn to_pairs(&self) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    out.insert(keys::TIMEZONE.to_owned(), self.timezone.name().to_owned());
    out.insert(keys::HISTORY_DEPTH.to_owned(), self.history_depth.to_string());
    let optional = [
      (keys::CALENDAR_ID, &self.calendar_id),
      (keys::EVENT_FILTER, &self.event_filter),
      (keys::PRIEST_EMAIL, &self.officiant_email),
      (keys::PRESENT_REPORT_EMAIL, &self.present_report_email),
      (keys::ABSENT_REPORT_EMAIL, &self.absent_report_email),
    ];
    for (key, value) in optional {
      if let Some(value) = value {
        out.insert(key.to_owned(), value.clone());
      }
    }
    out
  }
}

fn normalise<I, K, V>(pairs: I) -> BTreeMap<String, String>
where
  I: IntoIterator<Item = (K, V)>,
  K: AsRef<str>,
  V: AsRef<str>,
{
  pairs
    .into_iter()
    .filter_map(|(k, v)| {
      let key = k.as_ref().trim();
      (!key.is_empty()).then(|| (key.to_owned(), v.as_ref().trim().to_owned()))
    })
    .collect()
}
