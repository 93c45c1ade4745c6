//! Error types for `vigil-core`.
//!
//! Every failure carries a named variant; [`Error::kind`] collapses the
//! variants into the coarse categories callers (and the HTTP layer) dispatch
//! on. Precondition and uniqueness failures are detected before any write,
//! so an error always means the store is unchanged by the failed call.

use thiserror::Error;
use uuid::Uuid;

/// Coarse classification of an [`Error`], stable across the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  InvalidInput,
  NotFound,
  Unauthorized,
  Conflict,
  CapacityInsufficient,
  PreconditionFailed,
  InternalStoreError,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid time slot: {0:?} (expected FN or AN)")]
  InvalidSlot(String),

  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("too many preferences: {0} (maximum {max})", max = crate::preference::MAX_PREFERENCES)]
  TooManyPreferences(usize),

  #[error("duplicate preference date: {0}")]
  DuplicatePreferenceDate(chrono::NaiveDate),

  #[error("exam not found: {0}")]
  ExamNotFound(Uuid),

  #[error("hall not found: {0}")]
  HallNotFound(Uuid),

  #[error("booking not found: {0}")]
  BookingNotFound(Uuid),

  #[error("not authorized: {0}")]
  Unauthorized(String),

  #[error("actor department {actor:?} does not own exam department {owner:?}")]
  NotOwner { actor: Option<String>, owner: String },

  #[error("staff member already holds a booking for {date} {slot}")]
  AlreadyBooked { date: chrono::NaiveDate, slot: crate::session::TimeSlot },

  #[error("exam already exists for ({department}, {course_code}, {slot})")]
  DuplicateExamKey {
    department:  String,
    course_code: String,
    slot:        crate::session::TimeSlot,
  },

  #[error("hall number {hall_number:?} already exists")]
  DuplicateHallNumber { hall_number: String },

  #[error("hall {hall_number} is not available")]
  HallUnavailable { hall_number: String },

  #[error("exam {0} already has halls allocated; deallocate first")]
  HallsAlreadyAllocated(Uuid),

  #[error(
    "allocated capacity {available} is insufficient for {required} students"
  )]
  CapacityInsufficient { required: u32, available: u32 },

  #[error("booking {0} is already assigned and cannot be cancelled")]
  AlreadyAssigned(Uuid),

  #[error("cannot cancel within 16 hours of the session start")]
  CancellationWindowClosed,

  #[error("exam {0} has no halls allocated")]
  NoHallsAllocated(Uuid),

  #[error("no staff preferences match exam {0}")]
  NoPreferences(Uuid),

  #[error("invalid status transition: {from:?} -> {to:?}")]
  InvalidTransition {
    from: crate::exam::ExamStatus,
    to:   crate::exam::ExamStatus,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(String),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    use ErrorKind::*;
    match self {
      Error::InvalidSlot(_)
      | Error::MissingField(_)
      | Error::TooManyPreferences(_)
      | Error::DuplicatePreferenceDate(_) => InvalidInput,

      Error::ExamNotFound(_)
      | Error::HallNotFound(_)
      | Error::BookingNotFound(_) => NotFound,

      Error::Unauthorized(_) | Error::NotOwner { .. } => Unauthorized,

      Error::AlreadyBooked { .. }
      | Error::DuplicateExamKey { .. }
      | Error::DuplicateHallNumber { .. } => Conflict,

      Error::CapacityInsufficient { .. } => CapacityInsufficient,

      Error::HallUnavailable { .. }
      | Error::HallsAlreadyAllocated(_)
      | Error::AlreadyAssigned(_)
      | Error::CancellationWindowClosed
      | Error::NoHallsAllocated(_)
      | Error::NoPreferences(_)
      | Error::InvalidTransition { .. } => PreconditionFailed,

      Error::Serialization(_) | Error::Store(_) => InternalStoreError,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
