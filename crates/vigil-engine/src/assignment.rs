//! Staff assignment — pairing invigilators with halls.
//!
//! Two strategies operate over overlapping data and never double-assign a
//! hall or a staff member:
//!
//! - exam-scoped random assignment, driven by matched preferences and a
//!   caller-supplied randomness source (seedable in tests, entropy-backed in
//!   production);
//! - session-scoped round-robin auto-assignment, driven by bookings, fully
//!   deterministic.
//!
//! Both treat "already assigned" as a precondition to exclude, never a slot
//! to overwrite: assignment is monotonic.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rand::{Rng, seq::SliceRandom};
use serde::Serialize;
use uuid::Uuid;

use vigil_core::{
  Error, Result,
  booking::BookingStatus,
  exam::{HallSlot, SlotAssignment},
  identity::{AuthContext, Role},
  session::Session,
  store::DirectoryStore,
};

/// Outcome of an exam-scoped assignment run.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentReport {
  pub exam_id:        Uuid,
  /// (hall number, staff) pairs written by this run.
  pub assigned:       Vec<(String, Uuid)>,
  /// Halls left without an invigilator because staff ran out.
  pub unfilled_halls: usize,
}

pub struct AssignmentService<S> {
  store: Arc<S>,
}

impl<S: DirectoryStore> AssignmentService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Randomly assign preference-matched staff to an exam's halls.
  ///
  /// The matched staff list is shuffled with a uniform permutation from
  /// `rng`, then walked against the exam's hall list in order. Halls that
  /// already hold an assignee, in the snapshot or via an assigned booking
  /// of the same session, are skipped; halls beyond the available staff
  /// stay unassigned and are reported, not failed.
  pub async fn assign_staff_to_exam<R>(
    &self,
    exam_id: Uuid,
    actor: &AuthContext,
    rng: &mut R,
  ) -> Result<AssignmentReport>
  where
    R: Rng + ?Sized,
  {
    actor.require_role(Role::ExamCoordinator)?;

    let exam = self
      .store
      .get_exam(exam_id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::ExamNotFound(exam_id))?;
    if exam.halls.is_empty() {
      return Err(Error::NoHallsAllocated(exam_id));
    }

    let mut staff = self
      .store
      .staff_preferring(exam.session())
      .await
      .map_err(Into::into)?;
    if staff.is_empty() {
      return Err(Error::NoPreferences(exam_id));
    }

    // Round-robin assignment records its pairings on booking rows, never in
    // the snapshot. Halls and staff it has paired in this session count as
    // taken here as well.
    let bookings = self
      .store
      .list_bookings_for_session(exam.session())
      .await
      .map_err(Into::into)?;
    let booked_halls: HashSet<Uuid> =
      bookings.iter().filter_map(|b| b.assigned_hall_id).collect();

    // Staff already holding a hall in this session keep it and are not
    // reused for a second hall.
    let mut taken: HashSet<Uuid> =
      exam.halls.iter().filter_map(|h| h.staff_id).collect();
    taken.extend(
      bookings
        .iter()
        .filter(|b| b.assigned_hall_id.is_some())
        .map(|b| b.staff_id),
    );
    staff.retain(|s| !taken.contains(s));
    staff.shuffle(rng);

    let open =
      |h: &HallSlot| !h.is_assigned() && !booked_halls.contains(&h.hall_id);
    let mut halls = exam.halls.clone();
    let mut assigned: Vec<(String, Uuid)> = Vec::new();
    let mut pool = staff.into_iter();
    for slot in halls.iter_mut().filter(|h| open(h)) {
      let Some(staff_id) = pool.next() else { break };
      slot.assignment = SlotAssignment::Assigned;
      slot.staff_id = Some(staff_id);
      assigned.push((slot.hall_number.clone(), staff_id));
    }
    let unfilled_halls = halls.iter().filter(|h| open(h)).count();

    self
      .store
      .store_exam_assignments(exam_id, halls, actor.user_id, Utc::now())
      .await
      .map_err(Into::into)?;

    tracing::info!(
      exam = %exam_id,
      assigned = assigned.len(),
      unfilled = unfilled_halls,
      "staff assigned to exam"
    );
    Ok(AssignmentReport { exam_id, assigned, unfilled_halls })
  }

  /// Round-robin auto-assignment for one session.
  ///
  /// Pairs the Nth unassigned booking with the Nth free hall in stable list
  /// order — no randomness. Each pair commits independently with a
  /// conditional write, so a run that fails partway leaves written pairs
  /// intact and re-running assigns nothing twice. Returns the number of
  /// newly assigned pairs; zero inputs are a no-op outcome, not an error.
  pub async fn auto_assign_session(
    &self,
    session: Session,
    actor: &AuthContext,
  ) -> Result<usize> {
    actor.require_role(Role::ExamCoordinator)?;

    let bookings = self
      .store
      .list_bookings_for_session(session)
      .await
      .map_err(Into::into)?;

    // Halls referenced by ANY assigned booking of this session are off the
    // table, including assignments written by prior runs.
    let taken_halls: HashSet<Uuid> = bookings
      .iter()
      .filter_map(|b| b.assigned_hall_id)
      .collect();
    let pending: Vec<_> = bookings
      .iter()
      .filter(|b| {
        b.status == BookingStatus::Booked && b.assigned_hall_id.is_none()
      })
      .collect();

    let exams = self
      .store
      .list_exams_for_session(session)
      .await
      .map_err(Into::into)?;
    let free_halls: Vec<(Uuid, Uuid)> = exams
      .iter()
      .flat_map(|exam| {
        exam
          .halls
          .iter()
          .filter(|h| !h.is_assigned())
          .map(move |h| (exam.exam_id, h.hall_id))
      })
      .filter(|(_, hall_id)| !taken_halls.contains(hall_id))
      .collect();

    let mut newly_assigned = 0usize;
    for (booking, (exam_id, hall_id)) in pending.iter().zip(&free_halls) {
      let won = self
        .store
        .assign_booking(booking.booking_id, *exam_id, *hall_id)
        .await
        .map_err(Into::into)?;
      // A booking grabbed by a concurrent run fails its guard; skip it.
      if won {
        newly_assigned += 1;
      }
    }

    tracing::info!(
      %session,
      assigned = newly_assigned,
      pending = pending.len(),
      free_halls = free_halls.len(),
      "session auto-assignment complete"
    );
    Ok(newly_assigned)
  }
}
