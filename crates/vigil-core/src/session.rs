//! Sessions — the (calendar date, half-day slot) pairs everything keys on.
//!
//! A session is a UTC calendar day plus a half-day slot. Comparisons are
//! always on the `NaiveDate`, never on an instant: an exam recorded at
//! `2025-06-01T18:30:00Z` and a preference submitted as `2025-06-01` must
//! compare equal regardless of the submitter's timezone.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Half-day time slot. Wire names follow the institutional convention:
/// `FN` (forenoon) and `AN` (afternoon).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
  Deserialize,
)]
pub enum TimeSlot {
  #[serde(rename = "FN")]
  Forenoon,
  #[serde(rename = "AN")]
  Afternoon,
}

impl TimeSlot {
  /// Parse a wire-format slot name. Anything other than `FN`/`AN` is
  /// rejected with [`Error::InvalidSlot`].
  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "FN" => Ok(TimeSlot::Forenoon),
      "AN" => Ok(TimeSlot::Afternoon),
      other => Err(Error::InvalidSlot(other.to_owned())),
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      TimeSlot::Forenoon => "FN",
      TimeSlot::Afternoon => "AN",
    }
  }

  /// Wall-clock start of the slot (UTC).
  pub fn start_time(&self) -> NaiveTime {
    match self {
      TimeSlot::Forenoon => NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
      TimeSlot::Afternoon => NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
    }
  }

  /// Wall-clock end of the slot (UTC).
  pub fn end_time(&self) -> NaiveTime {
    match self {
      TimeSlot::Forenoon => NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
      TimeSlot::Afternoon => NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    }
  }
}

impl fmt::Display for TimeSlot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A bookable session: one calendar day, one half-day slot.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
  Deserialize,
)]
pub struct Session {
  pub date: NaiveDate,
  pub slot: TimeSlot,
}

impl Session {
  pub fn new(date: NaiveDate, slot: TimeSlot) -> Self { Self { date, slot } }

  /// The instant the session begins, in UTC.
  pub fn starts_at(&self) -> DateTime<Utc> {
    self.date.and_time(self.slot.start_time()).and_utc()
  }

  /// The instant the session ends, in UTC.
  pub fn ends_at(&self) -> DateTime<Utc> {
    self.date.and_time(self.slot.end_time()).and_utc()
  }
}

impl fmt::Display for Session {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.date, self.slot)
  }
}

/// Normalise an instant to its UTC calendar day.
pub fn calendar_day(at: DateTime<Utc>) -> NaiveDate { at.date_naive() }

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn parse_accepts_only_fn_and_an() {
    assert_eq!(TimeSlot::parse("FN").unwrap(), TimeSlot::Forenoon);
    assert_eq!(TimeSlot::parse("AN").unwrap(), TimeSlot::Afternoon);
    assert!(matches!(TimeSlot::parse("fn"), Err(Error::InvalidSlot(_))));
    assert!(matches!(TimeSlot::parse("EVE"), Err(Error::InvalidSlot(_))));
  }

  #[test]
  fn slot_serde_uses_wire_names() {
    assert_eq!(
      serde_json::to_string(&TimeSlot::Forenoon).unwrap(),
      "\"FN\""
    );
    let slot: TimeSlot = serde_json::from_str("\"AN\"").unwrap();
    assert_eq!(slot, TimeSlot::Afternoon);
  }

  #[test]
  fn calendar_day_ignores_time_of_day() {
    let late = Utc.with_ymd_and_hms(2025, 6, 1, 23, 45, 0).unwrap();
    let early = Utc.with_ymd_and_hms(2025, 6, 1, 0, 5, 0).unwrap();
    assert_eq!(calendar_day(late), calendar_day(early));
  }

  #[test]
  fn session_instants_use_slot_windows() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let fn_session = Session::new(date, TimeSlot::Forenoon);
    assert_eq!(
      fn_session.starts_at(),
      Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    );
    assert_eq!(
      fn_session.ends_at(),
      Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    );
    let an_session = Session::new(date, TimeSlot::Afternoon);
    assert!(an_session.starts_at() > fn_session.ends_at());
  }
}
