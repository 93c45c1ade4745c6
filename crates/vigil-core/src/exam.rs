//! Exams — one scheduled examination and its lifecycle state machine.
//!
//! The `halls` list is a point-in-time snapshot taken at allocation time
//! (hall number and capacity as they were then), not a live join against the
//! hall table. Consistency between `Hall::current_exam` and `Exam::halls` is
//! maintained transactionally by the allocation service; later edits to a
//! hall record do not propagate into existing snapshots.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{Session, TimeSlot};

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
  Draft,
  Scheduled,
  HallsPending,
  HallsAllocated,
  StaffPreferencesPending,
  StaffPreferencesSubmitted,
  StaffAssigned,
  Published,
  Completed,
  Cancelled,
}

impl ExamStatus {
  /// Position in the forward chain; terminal states have none.
  fn rank(self) -> Option<u8> {
    use ExamStatus::*;
    match self {
      Draft => Some(0),
      Scheduled => Some(1),
      HallsPending => Some(2),
      HallsAllocated => Some(3),
      StaffPreferencesPending => Some(4),
      StaffPreferencesSubmitted => Some(5),
      StaffAssigned => Some(6),
      Published => Some(7),
      Completed => Some(8),
      Cancelled => None,
    }
  }

  pub fn is_terminal(self) -> bool {
    matches!(self, ExamStatus::Completed | ExamStatus::Cancelled)
  }

  /// Whether a coordinator-triggered transition from `self` to `to` is
  /// legal. Re-invocation with the current state is an accepted no-op;
  /// `Cancelled` is reachable from any non-terminal state; otherwise only
  /// the next state in the chain is allowed.
  pub fn can_transition(self, to: ExamStatus) -> bool {
    if self == to {
      return true;
    }
    if to == ExamStatus::Cancelled {
      return !self.is_terminal();
    }
    match (self.rank(), to.rank()) {
      (Some(from), Some(next)) => next == from + 1,
      _ => false,
    }
  }
}

// ─── Hall snapshot ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotAssignment {
  Unassigned,
  Assigned,
}

/// One entry in an exam's denormalized hall list, captured at allocation
/// time. `staff_id` is filled in by the staff assignment service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HallSlot {
  pub hall_id:     Uuid,
  pub hall_number: String,
  pub capacity:    u32,
  pub assignment:  SlotAssignment,
  pub staff_id:    Option<Uuid>,
}

impl HallSlot {
  pub fn is_assigned(&self) -> bool {
    self.assignment == SlotAssignment::Assigned
  }
}

// ─── Exam ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
  pub exam_id:        Uuid,
  pub title:          String,
  pub course_code:    String,
  pub department:     String,
  pub date:           NaiveDate,
  pub time_slot:      TimeSlot,
  pub total_students: u32,
  pub status:         ExamStatus,
  /// Allocation-time snapshot; see the module docs for the staleness
  /// contract.
  pub halls:          Vec<HallSlot>,
  pub created_by:     Uuid,
  pub created_at:     DateTime<Utc>,
  pub assigned_by:    Option<Uuid>,
  pub assigned_at:    Option<DateTime<Utc>>,
}

impl Exam {
  pub fn session(&self) -> Session { Session::new(self.date, self.time_slot) }

  /// Sum of snapshot capacities.
  pub fn allocated_capacity(&self) -> u32 {
    self.halls.iter().map(|h| h.capacity).sum()
  }

  /// The status callers should see at `now`.
  ///
  /// An exam whose session has ended is presented as completed even if the
  /// stored field has not been rewritten yet; the stored field is allowed to
  /// lag until the next explicit save. Cancelled exams stay cancelled.
  pub fn effective_status(&self, now: DateTime<Utc>) -> ExamStatus {
    if !self.status.is_terminal() && now >= self.session().ends_at() {
      ExamStatus::Completed
    } else {
      self.status
    }
  }

  /// Capacity gate for entering [`ExamStatus::HallsAllocated`].
  pub fn check_capacity(&self) -> crate::Result<()> {
    let available = self.allocated_capacity();
    if available < self.total_students {
      return Err(crate::Error::CapacityInsufficient {
        required: self.total_students,
        available,
      });
    }
    Ok(())
  }
}

/// Input for creating an exam record.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExam {
  pub title:          String,
  pub course_code:    String,
  pub department:     String,
  pub date:           NaiveDate,
  pub time_slot:      TimeSlot,
  pub total_students: u32,
}

impl NewExam {
  pub fn validate(&self) -> crate::Result<()> {
    if self.title.trim().is_empty() {
      return Err(crate::Error::MissingField("title"));
    }
    if self.course_code.trim().is_empty() {
      return Err(crate::Error::MissingField("course_code"));
    }
    if self.department.trim().is_empty() {
      return Err(crate::Error::MissingField("department"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn exam(status: ExamStatus, halls: Vec<HallSlot>) -> Exam {
    Exam {
      exam_id:        Uuid::new_v4(),
      title:          "Algorithms".into(),
      course_code:    "CS101".into(),
      department:     "CS".into(),
      date:           NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
      time_slot:      TimeSlot::Forenoon,
      total_students: 50,
      status,
      halls,
      created_by:     Uuid::new_v4(),
      created_at:     Utc::now(),
      assigned_by:    None,
      assigned_at:    None,
    }
  }

  fn slot(capacity: u32) -> HallSlot {
    HallSlot {
      hall_id:     Uuid::new_v4(),
      hall_number: "H1".into(),
      capacity,
      assignment:  SlotAssignment::Unassigned,
      staff_id:    None,
    }
  }

  #[test]
  fn forward_chain_advances_one_step() {
    assert!(ExamStatus::Draft.can_transition(ExamStatus::Scheduled));
    assert!(ExamStatus::Scheduled.can_transition(ExamStatus::HallsPending));
    assert!(!ExamStatus::Draft.can_transition(ExamStatus::HallsAllocated));
    assert!(!ExamStatus::Published.can_transition(ExamStatus::Draft));
  }

  #[test]
  fn same_state_is_a_noop_transition() {
    assert!(ExamStatus::Scheduled.can_transition(ExamStatus::Scheduled));
    assert!(ExamStatus::Completed.can_transition(ExamStatus::Completed));
  }

  #[test]
  fn cancelled_reachable_from_non_terminal_only() {
    assert!(ExamStatus::Draft.can_transition(ExamStatus::Cancelled));
    assert!(ExamStatus::Published.can_transition(ExamStatus::Cancelled));
    assert!(!ExamStatus::Completed.can_transition(ExamStatus::Cancelled));
    assert!(!ExamStatus::Cancelled.can_transition(ExamStatus::Scheduled));
  }

  #[test]
  fn capacity_gate() {
    let short = exam(ExamStatus::HallsPending, vec![slot(30)]);
    assert!(matches!(
      short.check_capacity(),
      Err(crate::Error::CapacityInsufficient { required: 50, available: 30 })
    ));

    let enough = exam(ExamStatus::HallsPending, vec![slot(30), slot(30)]);
    assert!(enough.check_capacity().is_ok());
  }

  #[test]
  fn effective_status_completes_after_session_end() {
    let e = exam(ExamStatus::Published, vec![]);
    let before = Utc.with_ymd_and_hms(2025, 6, 1, 11, 0, 0).unwrap();
    let after = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap();
    assert_eq!(e.effective_status(before), ExamStatus::Published);
    assert_eq!(e.effective_status(after), ExamStatus::Completed);
  }

  #[test]
  fn effective_status_never_revives_cancelled() {
    let e = exam(ExamStatus::Cancelled, vec![]);
    let after = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
    assert_eq!(e.effective_status(after), ExamStatus::Cancelled);
  }
}
