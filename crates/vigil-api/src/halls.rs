//! Handlers for `/halls` endpoints.
//!
//! | Method | Path | Role | Notes |
//! |--------|------|------|-------|
//! | `POST` | `/halls` | department coordinator | Body: hall fields |
//! | `GET`  | `/halls` | any | Optional `?department=<name>` |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use vigil_core::{hall::Hall, hall::NewHall, store::DirectoryStore};
use vigil_engine::AllocationService;

use crate::{AppState, auth::Authenticated, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub department: Option<String>,
}

/// `GET /halls[?department=<name>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Authenticated(_actor): Authenticated,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Hall>>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let halls = AllocationService::new(state.store.clone())
    .list_halls(params.department)
    .await?;
  Ok(Json(halls))
}

/// `POST /halls`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  Json(body): Json<NewHall>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let hall = AllocationService::new(state.store.clone())
    .create_hall(body, &actor)
    .await?;
  Ok((StatusCode::CREATED, Json(hall)))
}
