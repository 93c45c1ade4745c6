//! Handlers for `/exams` endpoints.
//!
//! | Method | Path | Role |
//! |--------|------|------|
//! | `POST`  | `/exams` | exam coordinator |
//! | `GET`   | `/exams` | any |
//! | `GET`   | `/exams/:id` | any |
//! | `PATCH` | `/exams/:id/status` | exam coordinator |
//! | `POST`  | `/exams/:id/allocate-halls` | department coordinator |
//! | `POST`  | `/exams/:id/deallocate-halls` | department coordinator |
//! | `GET`   | `/exams/:id/matching-staff` | exam coordinator |
//! | `POST`  | `/exams/:id/assign-staff` | exam coordinator |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use uuid::Uuid;
use vigil_core::{
  exam::{Exam, ExamStatus, NewExam},
  identity::Role,
  store::DirectoryStore,
};
use vigil_engine::{
  AllocationService, AssignmentReport, AssignmentService, ExamService,
  PreferenceService,
};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `POST /exams`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  Json(body): Json<NewExam>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let exam = ExamService::new(state.store.clone())
    .create_exam(body, &actor)
    .await?;
  Ok((StatusCode::CREATED, Json(exam)))
}

/// `GET /exams`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Authenticated(_actor): Authenticated,
) -> Result<Json<Vec<Exam>>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let exams = ExamService::new(state.store.clone()).list_exams().await?;
  Ok(Json(exams))
}

/// `GET /exams/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Authenticated(_actor): Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Exam>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let exam = ExamService::new(state.store.clone()).get_exam(id).await?;
  Ok(Json(exam))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: ExamStatus,
}

/// `PATCH /exams/:id/status` — body: `{"status":"scheduled"}`
pub async fn update_status<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Exam>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let exam = ExamService::new(state.store.clone())
    .update_status(id, body.status, &actor)
    .await?;
  Ok(Json(exam))
}

#[derive(Debug, Deserialize)]
pub struct AllocateBody {
  pub hall_ids: Vec<Uuid>,
}

/// `POST /exams/:id/allocate-halls` — body: `{"hall_ids":[...]}`
pub async fn allocate_halls<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  Path(id): Path<Uuid>,
  Json(body): Json<AllocateBody>,
) -> Result<Json<Exam>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let exam = AllocationService::new(state.store.clone())
    .allocate_halls(id, &body.hall_ids, &actor)
    .await?;
  Ok(Json(exam))
}

/// `POST /exams/:id/deallocate-halls`
pub async fn deallocate_halls<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Exam>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let exam = AllocationService::new(state.store.clone())
    .deallocate_halls(id, &actor)
    .await?;
  Ok(Json(exam))
}

/// `GET /exams/:id/matching-staff`
pub async fn matching_staff<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Uuid>>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  actor.require_role(Role::ExamCoordinator)?;
  let staff = PreferenceService::new(state.store.clone())
    .matching_staff(id)
    .await?;
  Ok(Json(staff))
}

/// `POST /exams/:id/assign-staff`
pub async fn assign_staff<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<AssignmentReport>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let mut rng = StdRng::from_entropy();
  let report = AssignmentService::new(state.store.clone())
    .assign_staff_to_exam(id, &actor, &mut rng)
    .await?;
  Ok(Json(report))
}
