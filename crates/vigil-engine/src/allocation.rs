//! Hall allocation — binding halls to an exam, all-or-nothing.
//!
//! Allocation validates the complete batch before committing any member:
//! ownership, availability and capacity are checked against a read, and the
//! store transaction re-checks availability with conditional updates so a
//! concurrent competitor for the same hall gets `HallUnavailable` while
//! exactly one caller wins.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use vigil_core::{
  Error, Result,
  exam::Exam,
  hall::{Hall, NewHall},
  identity::{AuthContext, Role},
  store::DirectoryStore,
};

pub struct AllocationService<S> {
  store: Arc<S>,
}

impl<S: DirectoryStore> AllocationService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Create a hall record in the actor's department.
  pub async fn create_hall(
    &self,
    mut input: NewHall,
    actor: &AuthContext,
  ) -> Result<Hall> {
    actor.require_role(Role::DepartmentCoordinator)?;
    if let Some(dept) = &actor.department {
      input.department = dept.clone();
    }
    input.validate()?;
    self
      .store
      .insert_hall(input, actor.user_id)
      .await
      .map_err(Into::into)
  }

  /// List halls, optionally one department's.
  pub async fn list_halls(&self, department: Option<String>) -> Result<Vec<Hall>> {
    self.store.list_halls(department).await.map_err(Into::into)
  }

  /// Allocate `hall_ids` to an exam.
  ///
  /// Fails with `HallUnavailable` (naming the offending hall) if any hall is
  /// outside the actor's department or not currently available, and with
  /// `CapacityInsufficient` if the summed capacities fall short of the
  /// exam's student count. An exam with a standing allocation must be
  /// deallocated first; replacing the snapshot in place would strand the
  /// previous halls in `allocated`. On failure nothing is mutated.
  pub async fn allocate_halls(
    &self,
    exam_id: Uuid,
    hall_ids: &[Uuid],
    actor: &AuthContext,
  ) -> Result<Exam> {
    actor.require_role(Role::DepartmentCoordinator)?;
    if hall_ids.is_empty() {
      return Err(Error::MissingField("hall_ids"));
    }

    let exam = self
      .store
      .get_exam(exam_id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::ExamNotFound(exam_id))?;
    let now = Utc::now();
    if exam.effective_status(now).is_terminal() {
      return Err(Error::InvalidTransition {
        from: exam.effective_status(now),
        to:   vigil_core::exam::ExamStatus::HallsAllocated,
      });
    }
    if !exam.halls.is_empty() {
      return Err(Error::HallsAlreadyAllocated(exam_id));
    }

    // Advisory pre-checks for precise errors; the store transaction repeats
    // the availability and capacity guards authoritatively.
    let mut capacity: u32 = 0;
    for hall_id in hall_ids {
      let hall = self
        .store
        .get_hall(*hall_id)
        .await
        .map_err(Into::into)?
        .ok_or(Error::HallNotFound(*hall_id))?;
      let owned = actor.department.as_deref() == Some(hall.department.as_str());
      if !owned || hall.status != vigil_core::hall::HallStatus::Available {
        return Err(Error::HallUnavailable { hall_number: hall.hall_number });
      }
      capacity += hall.capacity;
    }
    if capacity < exam.total_students {
      return Err(Error::CapacityInsufficient {
        required:  exam.total_students,
        available: capacity,
      });
    }

    let updated = self
      .store
      .allocate_halls(exam_id, hall_ids.to_vec(), actor.user_id, now)
      .await
      .map_err(Into::into)?;

    tracing::info!(
      exam = %exam_id,
      halls = hall_ids.len(),
      capacity,
      "halls allocated"
    );
    Ok(updated)
  }

  /// Reverse an allocation: every hall referencing the exam reverts to
  /// available and the exam drops back to `HallsPending`.
  pub async fn deallocate_halls(
    &self,
    exam_id: Uuid,
    actor: &AuthContext,
  ) -> Result<Exam> {
    actor.require_role(Role::DepartmentCoordinator)?;

    let exam = self
      .store
      .get_exam(exam_id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::ExamNotFound(exam_id))?;
    if actor.department.as_deref() != Some(exam.department.as_str()) {
      return Err(Error::NotOwner {
        actor: actor.department.clone(),
        owner: exam.department,
      });
    }

    let updated =
      self.store.release_halls(exam_id).await.map_err(Into::into)?;
    tracing::info!(exam = %exam_id, "halls released");
    Ok(updated)
  }
}
