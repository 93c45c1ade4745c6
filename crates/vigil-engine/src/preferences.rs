//! Staff preference submission and matching.
//!
//! Preferences are compared to exam sessions by UTC calendar day and slot;
//! time-of-day components never participate, so a submitter's timezone
//! cannot produce a false negative.

use std::sync::Arc;

use uuid::Uuid;

use vigil_core::{
  Error, Result,
  identity::{AuthContext, Role},
  preference::{SlotPreference, validate_preferences},
  store::DirectoryStore,
};

pub struct PreferenceService<S> {
  store: Arc<S>,
}

impl<S: DirectoryStore> PreferenceService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Replace the caller's entire preference set. Submissions are wholesale:
  /// the previous set is discarded, never merged.
  pub async fn submit_preferences(
    &self,
    prefs: Vec<SlotPreference>,
    actor: &AuthContext,
  ) -> Result<Vec<SlotPreference>> {
    actor.require_role(Role::Staff)?;
    validate_preferences(&prefs)?;
    self
      .store
      .replace_preferences(actor.user_id, prefs.clone())
      .await
      .map_err(Into::into)?;
    tracing::info!(
      staff = %actor.user_id,
      count = prefs.len(),
      "preferences replaced"
    );
    Ok(prefs)
  }

  /// The caller's current preference set.
  pub async fn get_preferences(
    &self,
    actor: &AuthContext,
  ) -> Result<Vec<SlotPreference>> {
    actor.require_role(Role::Staff)?;
    self
      .store
      .preferences_for(actor.user_id)
      .await
      .map_err(Into::into)
  }

  /// Staff whose preference matches the exam's session exactly.
  pub async fn matching_staff(&self, exam_id: Uuid) -> Result<Vec<Uuid>> {
    let exam = self
      .store
      .get_exam(exam_id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::ExamNotFound(exam_id))?;
    self
      .store
      .staff_preferring(exam.session())
      .await
      .map_err(Into::into)
  }
}
