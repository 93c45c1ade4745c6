//! Halls — physical rooms owned by a department.
//!
//! A hall's `status` and `current_exam` move together: `available` means no
//! exam reference, `allocated` means exactly one. The store enforces this
//! pairing with CHECK constraints; the allocation service is the only writer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HallStatus {
  Available,
  Allocated,
  Maintenance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hall {
  pub hall_id:      Uuid,
  pub hall_number:  String,
  pub capacity:     u32,
  pub department:   String,
  pub status:       HallStatus,
  /// The exam currently occupying this hall, if allocated.
  pub current_exam: Option<Uuid>,
  pub allocated_by: Option<Uuid>,
  pub allocated_at: Option<DateTime<Utc>>,
  pub created_by:   Uuid,
  pub created_at:   DateTime<Utc>,
}

/// Input for creating a hall record.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHall {
  pub hall_number: String,
  pub capacity:    u32,
  pub department:  String,
}

impl NewHall {
  pub fn validate(&self) -> crate::Result<()> {
    if self.hall_number.trim().is_empty() {
      return Err(crate::Error::MissingField("hall_number"));
    }
    if self.capacity < 1 {
      return Err(crate::Error::MissingField("capacity"));
    }
    if self.department.trim().is_empty() {
      return Err(crate::Error::MissingField("department"));
    }
    Ok(())
  }
}
