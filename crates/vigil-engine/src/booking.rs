//! Session booking — staff claims on (date, slot) sessions.
//!
//! The booking key is unique per staff member; the store rejects the loser
//! of two simultaneous inserts. Fullness is computed from hall supply vs.
//! staff demand at read time and never stored.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use vigil_core::{
  Error, Result,
  booking::{
    BookingStatus, SessionAvailability, SessionBooking, SessionSummary,
  },
  identity::{AuthContext, Role},
  session::Session,
  store::DirectoryStore,
};

/// Bookings may not be cancelled within this window before session start.
const CANCELLATION_WINDOW_HOURS: i64 = 16;

pub struct BookingService<S> {
  store: Arc<S>,
}

impl<S: DirectoryStore> BookingService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Reserve one session for the calling staff member.
  pub async fn book_session(
    &self,
    session: Session,
    actor: &AuthContext,
  ) -> Result<SessionBooking> {
    actor.require_role(Role::Staff)?;
    let booking = self
      .store
      .insert_booking(actor.user_id, session)
      .await
      .map_err(Into::into)?;
    tracing::info!(staff = %actor.user_id, %session, "session booked");
    Ok(booking)
  }

  /// Sessions the calling staff member can still book.
  ///
  /// Computes every distinct (date, slot) pair across all exams, counts hall
  /// supply and booking demand per pair, and filters out pairs that are full
  /// or already booked by the caller — staff are not shown dead-end options.
  pub async fn list_available_sessions(
    &self,
    actor: &AuthContext,
  ) -> Result<Vec<SessionSummary>> {
    actor.require_role(Role::Staff)?;

    let exams = self.store.list_exams().await.map_err(Into::into)?;
    let bookings = self.store.list_bookings().await.map_err(Into::into)?;

    let mut hall_counts: BTreeMap<Session, usize> = BTreeMap::new();
    for exam in &exams {
      *hall_counts.entry(exam.session()).or_default() += exam.halls.len();
    }

    let mut staff_counts: BTreeMap<Session, usize> = BTreeMap::new();
    let mut mine: Vec<Session> = Vec::new();
    for booking in &bookings {
      *staff_counts.entry(booking.session()).or_default() += 1;
      if booking.staff_id == actor.user_id {
        mine.push(booking.session());
      }
    }

    let sessions = hall_counts
      .into_iter()
      .map(|(session, hall_count)| {
        let staff_count = staff_counts.get(&session).copied().unwrap_or(0);
        let availability = if mine.contains(&session) {
          SessionAvailability::Booked
        } else if hall_count > 0 && staff_count >= hall_count {
          SessionAvailability::Full
        } else {
          SessionAvailability::Available
        };
        SessionSummary {
          date: session.date,
          time_slot: session.slot,
          hall_count,
          staff_count,
          availability,
        }
      })
      .filter(|s| s.availability == SessionAvailability::Available)
      .collect();

    Ok(sessions)
  }

  /// Cancel a booking the caller holds.
  ///
  /// Refused once the booking is assigned, and within 16 hours of the
  /// session start — a pure precondition against the current wall clock,
  /// re-evaluated on every request.
  pub async fn cancel_session(
    &self,
    booking_id: Uuid,
    actor: &AuthContext,
  ) -> Result<()> {
    actor.require_role(Role::Staff)?;

    let booking = self
      .store
      .get_booking(booking_id)
      .await
      .map_err(Into::into)?
      .filter(|b| b.staff_id == actor.user_id)
      .ok_or(Error::BookingNotFound(booking_id))?;

    if booking.status != BookingStatus::Booked {
      return Err(Error::AlreadyAssigned(booking_id));
    }
    let cutoff =
      booking.session().starts_at() - Duration::hours(CANCELLATION_WINDOW_HOURS);
    if Utc::now() >= cutoff {
      return Err(Error::CancellationWindowClosed);
    }

    // The delete re-checks the booked guard; losing that race means an
    // assignment landed in between.
    let deleted = self
      .store
      .delete_booking(booking_id)
      .await
      .map_err(Into::into)?;
    if !deleted {
      return Err(Error::AlreadyAssigned(booking_id));
    }
    tracing::info!(booking = %booking_id, "session booking cancelled");
    Ok(())
  }

  /// The caller's bookings, ordered by date then slot.
  pub async fn my_booked_sessions(
    &self,
    actor: &AuthContext,
  ) -> Result<Vec<SessionBooking>> {
    actor.require_role(Role::Staff)?;
    self
      .store
      .list_bookings_by_staff(actor.user_id)
      .await
      .map_err(Into::into)
  }

  /// Every booking in the store — coordinator view.
  pub async fn all_booked_sessions(
    &self,
    actor: &AuthContext,
  ) -> Result<Vec<SessionBooking>> {
    actor.require_role(Role::ExamCoordinator)?;
    self.store.list_bookings().await.map_err(Into::into)
  }
}
