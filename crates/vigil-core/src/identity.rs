//! Authenticated caller identity, as reported by the Identity collaborator.
//!
//! The core never validates credentials; it trusts the `AuthContext` handed
//! to it by whatever sits at the boundary (HTTP Basic auth in `vigil-api`).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  ExamCoordinator,
  DepartmentCoordinator,
  Staff,
}

/// The result of authenticating one inbound request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
  pub user_id:    Uuid,
  pub role:       Role,
  /// Set for department coordinators and staff; exam coordinators operate
  /// across departments.
  pub department: Option<String>,
}

impl AuthContext {
  /// Guard helper: `Unauthorized` unless the caller holds `role`.
  pub fn require_role(&self, role: Role) -> crate::Result<()> {
    if self.role == role {
      Ok(())
    } else {
      Err(crate::Error::Unauthorized(format!(
        "requires role {role:?}, caller is {:?}",
        self.role
      )))
    }
  }
}
