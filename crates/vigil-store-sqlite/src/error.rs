//! Error type for `vigil-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] vigil_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column held text no domain value corresponds to.
  #[error("corrupt column value: {0}")]
  Decode(String),
}

impl From<Error> for vigil_core::Error {
  fn from(e: Error) -> Self {
    match e {
      // Domain guard failures raised inside store transactions pass through
      // with their original kind.
      Error::Core(core) => core,
      Error::Database(db) => vigil_core::Error::Store(db.to_string()),
      Error::Json(j) => vigil_core::Error::Serialization(j),
      Error::Uuid(u) => vigil_core::Error::Store(u.to_string()),
      Error::Decode(m) => vigil_core::Error::Store(m),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
