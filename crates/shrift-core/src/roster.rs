//! Deriving a deduplicated roster from one day's calendar events.

use std::{cmp::Ordering, collections::HashSet};

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{
  calendar::{Event, Guest},
  identity::Identity,
  record::Person,
};

/// Which events and guests make it onto the roster.
#[derive(Debug, Clone, Copy, Default)]
pub struct RosterRules<'a> {
  /// The officiant's email; never listed as a confessor.
  pub officiant:    Option<&'a str>,
  /// Case-insensitive substring an event title must contain.
  pub title_filter: Option<&'a str>,
}

/// Text inside the first non-empty parenthesised group of an event title,
/// e.g. `"Confession (Jane Doe)"` → `"Jane Doe"`.
pub fn title_name(title: &str) -> Option<&str> {
  let mut rest = title;
  while let Some(open) = rest.find('(') {
    let after = &rest[open + 1..];
    let close = after.find(')')?;
    if close > 0 {
      let inner = after[..close].trim();
      return (!inner.is_empty()).then_some(inner);
    }
    rest = &after[close + 1..];
  }
  None
}

/// The guests of one event minus the officiant.
///
/// With an officiant configured, guests without an email are dropped too. If
/// that leaves nobody, the full guest list is used instead so a wrong
/// officiant address can never empty the roster.
pub fn confessors<'a>(guests: &'a [Guest], officiant: Option<&str>) -> Vec<&'a Guest> {
  let officiant = officiant
    .map(str::trim)
    .filter(|e| !e.is_empty())
    .map(str::to_lowercase);

  let Some(officiant) = officiant else {
    return guests.iter().collect();
  };

  let filtered: Vec<&Guest> = guests
    .iter()
    .filter(|g| {
      let email = g.email.trim().to_lowercase();
      !email.is_empty() && email != officiant
    })
    .collect();

  if filtered.is_empty() { guests.iter().collect() } else { filtered }
}

/// Build the roster for one day: confessors across all events, first
/// occurrence per identity kept, sorted by name.
pub fn build_roster(events: &[Event], rules: RosterRules<'_>) -> Vec<Person> {
  let filter = rules
    .title_filter
    .map(str::trim)
    .filter(|f| !f.is_empty())
    .map(str::to_lowercase);

  let mut seen = HashSet::new();
  let mut people = Vec::new();

  for event in events {
    if let Some(filter) = &filter
      && !event.title.to_lowercase().contains(filter.as_str())
    {
      continue;
    }

    let from_title = title_name(&event.title);
    for guest in confessors(&event.guests, rules.officiant) {
      let email = guest.email.trim();
      let name = from_title
        .or_else(|| non_blank(&guest.name))
        .or_else(|| non_blank(email))
        .unwrap_or_default();

      let Some(identity) = Identity::of(name, email) else {
        continue;
      };
      if seen.insert(identity) {
        people.push(Person::new(name, email));
      }
    }
  }

  people.sort_by(|a, b| collate(&a.name, &b.name));
  people
}

/// Name ordering: base letters first (ignoring accents and case), then
/// accents, then case, so "Émile" sits between "Adam" and "Zoe".
pub fn collate(a: &str, b: &str) -> Ordering {
  fold(a)
    .cmp(&fold(b))
    .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
    .then_with(|| a.cmp(b))
}

fn fold(s: &str) -> String {
  s.nfd()
    .filter(|c| !is_combining_mark(*c))
    .flat_map(char::to_lowercase)
    .collect()
}

fn non_blank(s: &str) -> Option<&str> {
  let trimmed = s.trim();
  (!trimmed.is_empty()).then_some(trimmed)
}
