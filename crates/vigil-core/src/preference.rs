//! Staff session preferences.
//!
//! Each staff member declares up to [`MAX_PREFERENCES`] sessions they are
//! willing to invigilate. Submissions replace the whole set; the engine
//! never merges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, session::TimeSlot};

/// Maximum preference entries per staff member.
pub const MAX_PREFERENCES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPreference {
  pub date:      NaiveDate,
  pub time_slot: TimeSlot,
}

/// Validate a full submission: at most [`MAX_PREFERENCES`] entries, no two
/// on the same calendar date.
pub fn validate_preferences(prefs: &[SlotPreference]) -> Result<()> {
  if prefs.len() > MAX_PREFERENCES {
    return Err(Error::TooManyPreferences(prefs.len()));
  }
  let mut seen: Vec<NaiveDate> = Vec::with_capacity(prefs.len());
  for pref in prefs {
    if seen.contains(&pref.date) {
      return Err(Error::DuplicatePreferenceDate(pref.date));
    }
    seen.push(pref.date);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pref(day: u32, slot: TimeSlot) -> SlotPreference {
    SlotPreference {
      date:      NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
      time_slot: slot,
    }
  }

  #[test]
  fn accepts_up_to_four_distinct_dates() {
    let prefs = [
      pref(1, TimeSlot::Forenoon),
      pref(2, TimeSlot::Afternoon),
      pref(3, TimeSlot::Forenoon),
      pref(4, TimeSlot::Afternoon),
    ];
    assert!(validate_preferences(&prefs).is_ok());
  }

  #[test]
  fn rejects_more_than_four() {
    let prefs = [
      pref(1, TimeSlot::Forenoon),
      pref(2, TimeSlot::Forenoon),
      pref(3, TimeSlot::Forenoon),
      pref(4, TimeSlot::Forenoon),
      pref(5, TimeSlot::Forenoon),
    ];
    assert!(matches!(
      validate_preferences(&prefs),
      Err(Error::TooManyPreferences(5))
    ));
  }

  #[test]
  fn rejects_duplicate_dates_even_across_slots() {
    let prefs = [pref(1, TimeSlot::Forenoon), pref(1, TimeSlot::Afternoon)];
    assert!(matches!(
      validate_preferences(&prefs),
      Err(Error::DuplicatePreferenceDate(_))
    ));
  }
}
