//! The `DirectoryStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `vigil-store-sqlite`).
//! The engine and API layers depend on this abstraction, not on any concrete
//! backend.
//!
//! The store is the single shared mutable resource in the system. Every
//! cross-entity invariant — uniqueness of hall occupancy, uniqueness of the
//! booking key, monotonic booking assignment — is enforced here at write
//! time, either by unique constraints or by conditional updates that reject
//! the loser of a race. Callers may pre-validate for better error messages,
//! but the store write is authoritative.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  booking::SessionBooking,
  exam::{Exam, ExamStatus, HallSlot, NewExam},
  hall::{Hall, NewHall},
  preference::SlotPreference,
  session::Session,
};

/// Abstraction over the directory store backend.
///
/// Single-document operations are atomic; the multi-entity operations
/// ([`allocate_halls`](DirectoryStore::allocate_halls),
/// [`release_halls`](DirectoryStore::release_halls),
/// [`replace_preferences`](DirectoryStore::replace_preferences)) run in one
/// transaction and either apply fully or leave state untouched.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DirectoryStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Halls ─────────────────────────────────────────────────────────────

  /// Create and persist a hall record.
  fn insert_hall(
    &self,
    input: NewHall,
    created_by: Uuid,
  ) -> impl Future<Output = Result<Hall, Self::Error>> + Send + '_;

  /// Retrieve a hall by id. Returns `None` if not found.
  fn get_hall(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Hall>, Self::Error>> + Send + '_;

  /// List all halls, optionally restricted to one department.
  fn list_halls(
    &self,
    department: Option<String>,
  ) -> impl Future<Output = Result<Vec<Hall>, Self::Error>> + Send + '_;

  // ── Exams ─────────────────────────────────────────────────────────────

  /// Create and persist an exam in `Draft` state. Fails with a conflict if
  /// `(department, course_code, time_slot)` is already taken.
  fn insert_exam(
    &self,
    input: NewExam,
    created_by: Uuid,
  ) -> impl Future<Output = Result<Exam, Self::Error>> + Send + '_;

  /// Retrieve an exam by id. Returns `None` if not found.
  fn get_exam(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Exam>, Self::Error>> + Send + '_;

  /// List all exams.
  fn list_exams(
    &self,
  ) -> impl Future<Output = Result<Vec<Exam>, Self::Error>> + Send + '_;

  /// List exams scheduled for exactly this session.
  fn list_exams_for_session(
    &self,
    session: Session,
  ) -> impl Future<Output = Result<Vec<Exam>, Self::Error>> + Send + '_;

  /// Overwrite an exam's stored lifecycle status. Transition legality is the
  /// caller's responsibility.
  fn update_exam_status(
    &self,
    id: Uuid,
    status: ExamStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Hall allocation (multi-entity, transactional) ─────────────────────

  /// Atomically allocate `hall_ids` to `exam_id`: every named hall flips
  /// available → allocated with an exam reference, and the exam receives a
  /// fresh snapshot list plus status `HallsAllocated`.
  ///
  /// Availability is re-checked per hall with a conditional update inside
  /// the transaction; if any hall is missing or no longer available the
  /// whole transaction rolls back, so concurrent competitors see exactly
  /// one winner.
  fn allocate_halls(
    &self,
    exam_id: Uuid,
    hall_ids: Vec<Uuid>,
    allocated_by: Uuid,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Exam, Self::Error>> + Send + '_;

  /// Reverse an allocation: halls referencing `exam_id` revert to available
  /// with no exam reference, the exam's snapshot list is cleared and its
  /// status reverts to `HallsPending`.
  fn release_halls(
    &self,
    exam_id: Uuid,
  ) -> impl Future<Output = Result<Exam, Self::Error>> + Send + '_;

  /// Persist an updated snapshot list (staff assignments filled in) and mark
  /// the exam `StaffAssigned`.
  fn store_exam_assignments(
    &self,
    exam_id: Uuid,
    halls: Vec<HallSlot>,
    assigned_by: Uuid,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Exam, Self::Error>> + Send + '_;

  // ── Session bookings ──────────────────────────────────────────────────

  /// Insert a booking with status `Booked`. The unique
  /// `(staff_id, date, time_slot)` key rejects duplicates at write time,
  /// including the loser of two simultaneous inserts.
  fn insert_booking(
    &self,
    staff_id: Uuid,
    session: Session,
  ) -> impl Future<Output = Result<SessionBooking, Self::Error>> + Send + '_;

  /// Retrieve a booking by id. Returns `None` if not found.
  fn get_booking(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<SessionBooking>, Self::Error>> + Send + '_;

  /// All bookings held by one staff member, ordered by date then slot.
  fn list_bookings_by_staff(
    &self,
    staff_id: Uuid,
  ) -> impl Future<Output = Result<Vec<SessionBooking>, Self::Error>> + Send + '_;

  /// All bookings for one session.
  fn list_bookings_for_session(
    &self,
    session: Session,
  ) -> impl Future<Output = Result<Vec<SessionBooking>, Self::Error>> + Send + '_;

  /// Every booking in the store, ordered by date then slot.
  fn list_bookings(
    &self,
  ) -> impl Future<Output = Result<Vec<SessionBooking>, Self::Error>> + Send + '_;

  /// Conditionally move a booking booked → assigned, recording the exam and
  /// hall. Returns `false` (without error) when the booking was not in
  /// `Booked` state any more — assignment is monotonic and never overwrites.
  fn assign_booking(
    &self,
    booking_id: Uuid,
    exam_id: Uuid,
    hall_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete a booking, conditionally on it still being `Booked`. Returns
  /// `false` when the guard failed.
  fn delete_booking(
    &self,
    booking_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Staff preferences ─────────────────────────────────────────────────

  /// Replace a staff member's entire preference set in one transaction.
  fn replace_preferences(
    &self,
    staff_id: Uuid,
    prefs: Vec<SlotPreference>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// A staff member's current preference set, ordered by date.
  fn preferences_for(
    &self,
    staff_id: Uuid,
  ) -> impl Future<Output = Result<Vec<SlotPreference>, Self::Error>> + Send + '_;

  /// Distinct staff ids holding a preference for exactly this session.
  fn staff_preferring(
    &self,
    session: Session,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;
}
