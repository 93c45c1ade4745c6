//! Exam records and coordinator-triggered lifecycle transitions.
//!
//! Read paths present [`Exam::effective_status`] rather than the stored
//! field, so an exam whose session has ended reads as completed without a
//! separate write.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use vigil_core::{
  Error, Result,
  exam::{Exam, ExamStatus, NewExam},
  identity::{AuthContext, Role},
  store::DirectoryStore,
};

/// Rewrite the presented status in place; the stored field may lag.
fn presented(mut exam: Exam) -> Exam {
  exam.status = exam.effective_status(Utc::now());
  exam
}

pub struct ExamService<S> {
  store: Arc<S>,
}

impl<S: DirectoryStore> ExamService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn create_exam(
    &self,
    input: NewExam,
    actor: &AuthContext,
  ) -> Result<Exam> {
    actor.require_role(Role::ExamCoordinator)?;
    input.validate()?;
    self
      .store
      .insert_exam(input, actor.user_id)
      .await
      .map_err(Into::into)
  }

  pub async fn get_exam(&self, exam_id: Uuid) -> Result<Exam> {
    self
      .store
      .get_exam(exam_id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::ExamNotFound(exam_id))
      .map(presented)
  }

  pub async fn list_exams(&self) -> Result<Vec<Exam>> {
    let exams = self.store.list_exams().await.map_err(Into::into)?;
    Ok(exams.into_iter().map(presented).collect())
  }

  /// Coordinator-triggered lifecycle transition.
  ///
  /// Re-invocation with the current state is a no-op. Entering
  /// `HallsAllocated` demands sufficient allocated capacity and fails with
  /// `CapacityInsufficient` without touching the stored state.
  pub async fn update_status(
    &self,
    exam_id: Uuid,
    target: ExamStatus,
    actor: &AuthContext,
  ) -> Result<Exam> {
    actor.require_role(Role::ExamCoordinator)?;

    let exam = self
      .store
      .get_exam(exam_id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::ExamNotFound(exam_id))?;

    let current = exam.effective_status(Utc::now());
    if current == target {
      return Ok(presented(exam));
    }
    if !current.can_transition(target) {
      return Err(Error::InvalidTransition { from: current, to: target });
    }
    if target == ExamStatus::HallsAllocated {
      exam.check_capacity()?;
    }

    self
      .store
      .update_exam_status(exam_id, target)
      .await
      .map_err(Into::into)?;
    tracing::info!(exam = %exam_id, status = ?target, "exam status updated");
    self.get_exam(exam_id).await
  }
}
