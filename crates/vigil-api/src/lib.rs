//! JSON REST API for Vigil.
//!
//! Exposes an axum [`Router`] backed by any
//! [`vigil_core::store::DirectoryStore`]. Requests authenticate with HTTP
//! Basic auth against config-declared users; the resulting
//! [`vigil_core::identity::AuthContext`] is what the engine's role guards
//! dispatch on.

pub mod auth;
pub mod error;
pub mod exams;
pub mod halls;
pub mod preferences;
pub mod sessions;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, patch, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use vigil_core::store::DirectoryStore;

use auth::{AuthConfig, AuthUser};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub users:      Vec<AuthUser>,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: DirectoryStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Halls
    .route("/halls", get(halls::list::<S>).post(halls::create::<S>))
    // Exams
    .route("/exams", get(exams::list::<S>).post(exams::create::<S>))
    .route("/exams/{id}", get(exams::get_one::<S>))
    .route("/exams/{id}/status", patch(exams::update_status::<S>))
    .route("/exams/{id}/allocate-halls", post(exams::allocate_halls::<S>))
    .route(
      "/exams/{id}/deallocate-halls",
      post(exams::deallocate_halls::<S>),
    )
    .route("/exams/{id}/matching-staff", get(exams::matching_staff::<S>))
    .route("/exams/{id}/assign-staff", post(exams::assign_staff::<S>))
    // Sessions
    .route("/sessions/available", get(sessions::available::<S>))
    .route("/sessions/book", post(sessions::book::<S>))
    .route("/sessions/my-bookings", get(sessions::my_bookings::<S>))
    .route("/sessions/all", get(sessions::all::<S>))
    .route("/sessions/auto-assign", post(sessions::auto_assign::<S>))
    .route("/sessions/{booking_id}", delete(sessions::cancel::<S>))
    // Preferences
    .route(
      "/preferences",
      get(preferences::get::<S>).put(preferences::submit::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
