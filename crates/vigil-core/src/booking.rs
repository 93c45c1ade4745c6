//! Session bookings — a staff member's claim on one session.
//!
//! The `(staff_id, date, time_slot)` key is unique; the store rejects the
//! second of two simultaneous inserts. Status only moves forward
//! (booked → assigned, by the assignment service); a booking can be deleted
//! only while still `booked`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{Session, TimeSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
  Booked,
  Assigned,
  Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionBooking {
  pub booking_id:       Uuid,
  pub staff_id:         Uuid,
  pub date:             NaiveDate,
  pub time_slot:        TimeSlot,
  pub status:           BookingStatus,
  pub assigned_exam_id: Option<Uuid>,
  pub assigned_hall_id: Option<Uuid>,
  pub booked_at:        DateTime<Utc>,
}

impl SessionBooking {
  pub fn session(&self) -> Session { Session::new(self.date, self.time_slot) }
}

/// A session as presented to staff choosing what to book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionAvailability {
  Available,
  Booked,
  Full,
}

/// Per-session supply/demand summary computed by the booking service.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
  pub date:         NaiveDate,
  pub time_slot:    TimeSlot,
  /// Halls declared across all exams sharing this session.
  pub hall_count:   usize,
  /// Existing bookings for this session.
  pub staff_count:  usize,
  pub availability: SessionAvailability,
}
