//! Handlers for `/sessions` endpoints.
//!
//! | Method | Path | Role |
//! |--------|------|------|
//! | `GET`    | `/sessions/available` | staff |
//! | `POST`   | `/sessions/book` | staff |
//! | `DELETE` | `/sessions/:booking_id` | staff (owner) |
//! | `GET`    | `/sessions/my-bookings` | staff |
//! | `GET`    | `/sessions/all` | exam coordinator |
//! | `POST`   | `/sessions/auto-assign` | exam coordinator |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vigil_core::{
  booking::{SessionBooking, SessionSummary},
  session::{Session, TimeSlot},
  store::DirectoryStore,
};
use vigil_engine::{AssignmentService, BookingService};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// A session named on the wire: `{"date":"2026-09-10","time_slot":"FN"}`.
#[derive(Debug, Deserialize)]
pub struct SessionBody {
  pub date:      NaiveDate,
  pub time_slot: TimeSlot,
}

impl SessionBody {
  fn session(&self) -> Session { Session::new(self.date, self.time_slot) }
}

/// `GET /sessions/available`
pub async fn available<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
) -> Result<Json<Vec<SessionSummary>>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let sessions = BookingService::new(state.store.clone())
    .list_available_sessions(&actor)
    .await?;
  Ok(Json(sessions))
}

/// `POST /sessions/book`
pub async fn book<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  Json(body): Json<SessionBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let booking = BookingService::new(state.store.clone())
    .book_session(body.session(), &actor)
    .await?;
  Ok((StatusCode::CREATED, Json(booking)))
}

/// `DELETE /sessions/:booking_id`
pub async fn cancel<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  BookingService::new(state.store.clone())
    .cancel_session(booking_id, &actor)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /sessions/my-bookings`
pub async fn my_bookings<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
) -> Result<Json<Vec<SessionBooking>>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let bookings = BookingService::new(state.store.clone())
    .my_booked_sessions(&actor)
    .await?;
  Ok(Json(bookings))
}

/// `GET /sessions/all`
pub async fn all<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
) -> Result<Json<Vec<SessionBooking>>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let bookings = BookingService::new(state.store.clone())
    .all_booked_sessions(&actor)
    .await?;
  Ok(Json(bookings))
}

#[derive(Debug, Serialize)]
pub struct AutoAssignResponse {
  pub assigned: usize,
}

/// `POST /sessions/auto-assign`
pub async fn auto_assign<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  Json(body): Json<SessionBody>,
) -> Result<Json<AutoAssignResponse>, ApiError>
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  let assigned = AssignmentService::new(state.store.clone())
    .auto_assign_session(body.session(), &actor)
    .await?;
  Ok(Json(AutoAssignResponse { assigned }))
}
