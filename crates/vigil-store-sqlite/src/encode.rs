//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar days as `YYYY-MM-DD`,
//! the hall snapshot list as compact JSON, UUIDs as hyphenated lowercase
//! strings.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use vigil_core::{
  booking::{BookingStatus, SessionBooking},
  exam::{Exam, ExamStatus, HallSlot},
  hall::{Hall, HallStatus},
  preference::SlotPreference,
  session::TimeSlot,
};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_uuid_opt(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

// ─── Timestamps and dates ────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

pub fn encode_day(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_day(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn encode_slot(slot: TimeSlot) -> &'static str { slot.as_str() }

pub fn decode_slot(s: &str) -> Result<TimeSlot> {
  TimeSlot::parse(s).map_err(Error::Core)
}

pub fn encode_hall_status(s: HallStatus) -> &'static str {
  match s {
    HallStatus::Available => "available",
    HallStatus::Allocated => "allocated",
    HallStatus::Maintenance => "maintenance",
  }
}

pub fn decode_hall_status(s: &str) -> Result<HallStatus> {
  match s {
    "available" => Ok(HallStatus::Available),
    "allocated" => Ok(HallStatus::Allocated),
    "maintenance" => Ok(HallStatus::Maintenance),
    other => Err(Error::Decode(format!("unknown hall status: {other:?}"))),
  }
}

pub fn encode_exam_status(s: ExamStatus) -> &'static str {
  match s {
    ExamStatus::Draft => "draft",
    ExamStatus::Scheduled => "scheduled",
    ExamStatus::HallsPending => "halls_pending",
    ExamStatus::HallsAllocated => "halls_allocated",
    ExamStatus::StaffPreferencesPending => "staff_preferences_pending",
    ExamStatus::StaffPreferencesSubmitted => "staff_preferences_submitted",
    ExamStatus::StaffAssigned => "staff_assigned",
    ExamStatus::Published => "published",
    ExamStatus::Completed => "completed",
    ExamStatus::Cancelled => "cancelled",
  }
}

pub fn decode_exam_status(s: &str) -> Result<ExamStatus> {
  match s {
    "draft" => Ok(ExamStatus::Draft),
    "scheduled" => Ok(ExamStatus::Scheduled),
    "halls_pending" => Ok(ExamStatus::HallsPending),
    "halls_allocated" => Ok(ExamStatus::HallsAllocated),
    "staff_preferences_pending" => Ok(ExamStatus::StaffPreferencesPending),
    "staff_preferences_submitted" => Ok(ExamStatus::StaffPreferencesSubmitted),
    "staff_assigned" => Ok(ExamStatus::StaffAssigned),
    "published" => Ok(ExamStatus::Published),
    "completed" => Ok(ExamStatus::Completed),
    "cancelled" => Ok(ExamStatus::Cancelled),
    other => Err(Error::Decode(format!("unknown exam status: {other:?}"))),
  }
}

pub fn encode_booking_status(s: BookingStatus) -> &'static str {
  match s {
    BookingStatus::Booked => "booked",
    BookingStatus::Assigned => "assigned",
    BookingStatus::Completed => "completed",
  }
}

pub fn decode_booking_status(s: &str) -> Result<BookingStatus> {
  match s {
    "booked" => Ok(BookingStatus::Booked),
    "assigned" => Ok(BookingStatus::Assigned),
    "completed" => Ok(BookingStatus::Completed),
    other => {
      Err(Error::Decode(format!("unknown booking status: {other:?}")))
    }
  }
}

// ─── Hall snapshot list ──────────────────────────────────────────────────────

pub fn encode_hall_slots(halls: &[HallSlot]) -> Result<String> {
  Ok(serde_json::to_string(halls)?)
}

pub fn decode_hall_slots(s: &str) -> Result<Vec<HallSlot>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `halls` row.
pub struct RawHall {
  pub hall_id:      String,
  pub hall_number:  String,
  pub capacity:     i64,
  pub department:   String,
  pub status:       String,
  pub current_exam: Option<String>,
  pub allocated_by: Option<String>,
  pub allocated_at: Option<String>,
  pub created_by:   String,
  pub created_at:   String,
}

impl RawHall {
  pub fn into_hall(self) -> Result<Hall> {
    Ok(Hall {
      hall_id:      decode_uuid(&self.hall_id)?,
      hall_number:  self.hall_number,
      capacity:     self.capacity as u32,
      department:   self.department,
      status:       decode_hall_status(&self.status)?,
      current_exam: decode_uuid_opt(self.current_exam.as_deref())?,
      allocated_by: decode_uuid_opt(self.allocated_by.as_deref())?,
      allocated_at: self.allocated_at.as_deref().map(decode_dt).transpose()?,
      created_by:   decode_uuid(&self.created_by)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `exams` row.
pub struct RawExam {
  pub exam_id:        String,
  pub title:          String,
  pub course_code:    String,
  pub department:     String,
  pub date:           String,
  pub time_slot:      String,
  pub total_students: i64,
  pub status:         String,
  pub halls_json:     String,
  pub created_by:     String,
  pub created_at:     String,
  pub assigned_by:    Option<String>,
  pub assigned_at:    Option<String>,
}

impl RawExam {
  pub fn into_exam(self) -> Result<Exam> {
    Ok(Exam {
      exam_id:        decode_uuid(&self.exam_id)?,
      title:          self.title,
      course_code:    self.course_code,
      department:     self.department,
      date:           decode_day(&self.date)?,
      time_slot:      decode_slot(&self.time_slot)?,
      total_students: self.total_students as u32,
      status:         decode_exam_status(&self.status)?,
      halls:          decode_hall_slots(&self.halls_json)?,
      created_by:     decode_uuid(&self.created_by)?,
      created_at:     decode_dt(&self.created_at)?,
      assigned_by:    decode_uuid_opt(self.assigned_by.as_deref())?,
      assigned_at:    self.assigned_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw strings read directly from a `session_bookings` row.
pub struct RawBooking {
  pub booking_id:       String,
  pub staff_id:         String,
  pub date:             String,
  pub time_slot:        String,
  pub status:           String,
  pub assigned_exam_id: Option<String>,
  pub assigned_hall_id: Option<String>,
  pub booked_at:        String,
}

impl RawBooking {
  pub fn into_booking(self) -> Result<SessionBooking> {
    Ok(SessionBooking {
      booking_id:       decode_uuid(&self.booking_id)?,
      staff_id:         decode_uuid(&self.staff_id)?,
      date:             decode_day(&self.date)?,
      time_slot:        decode_slot(&self.time_slot)?,
      status:           decode_booking_status(&self.status)?,
      assigned_exam_id: decode_uuid_opt(self.assigned_exam_id.as_deref())?,
      assigned_hall_id: decode_uuid_opt(self.assigned_hall_id.as_deref())?,
      booked_at:        decode_dt(&self.booked_at)?,
    })
  }
}

/// Raw strings read directly from a `staff_preferences` row.
pub struct RawPreference {
  pub date:      String,
  pub time_slot: String,
}

impl RawPreference {
  pub fn into_preference(self) -> Result<SlotPreference> {
    Ok(SlotPreference {
      date:      decode_day(&self.date)?,
      time_slot: decode_slot(&self.time_slot)?,
    })
  }
}
