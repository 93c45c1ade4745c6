//! Handlers for `/preferences` endpoints.
//!
//! | Method | Path | Role | Notes |
//! |--------|------|------|-------|
//! | `PUT` | `/preferences` | staff | Body replaces the whole set |
//! | `GET` | `/preferences` | staff | |

use axum::{Json, extract::State};
use vigil_core::{preference::SlotPreference, store::DirectoryStore};
use vigil_engine::PreferenceService;

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `PUT /preferences` — body: `[{"date":"2026-09-10","time_slot":"AN"}, ...]`
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  Json(body): Json<Vec<SlotPreference>>,
) -> Result<Json<Vec<SlotPreference>>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let prefs = PreferenceService::new(state.store.clone())
    .submit_preferences(body, &actor)
    .await?;
  Ok(Json(prefs))
}

/// `GET /preferences`
pub async fn get<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
) -> Result<Json<Vec<SlotPreference>>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let prefs = PreferenceService::new(state.store.clone())
    .get_preferences(&actor)
    .await?;
  Ok(Json(prefs))
}
