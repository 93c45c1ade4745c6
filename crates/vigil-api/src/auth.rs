//! HTTP Basic-auth extractor — the Identity collaborator.
//!
//! Users are declared in server configuration with argon2 PHC password
//! hashes; a verified request yields the [`AuthContext`] the engine's role
//! guards dispatch on. The engine itself never sees credentials.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use serde::Deserialize;
use uuid::Uuid;
use vigil_core::{
  identity::{AuthContext, Role},
  store::DirectoryStore,
};

use crate::{AppState, error::ApiError};

/// One configured account.
#[derive(Clone, Deserialize)]
pub struct AuthUser {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub user_id:       Uuid,
  pub role:          Role,
  pub department:    Option<String>,
}

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub users: Vec<AuthUser>,
}

/// Verify credentials directly from headers.
pub fn verify_auth(
  headers: &HeaderMap,
  config: &AuthConfig,
) -> Result<AuthContext, ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::BadCredentials)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::BadCredentials)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::BadCredentials)?;
  let creds =
    std::str::from_utf8(&decoded).map_err(|_| ApiError::BadCredentials)?;

  let (username, password) =
    creds.split_once(':').ok_or(ApiError::BadCredentials)?;

  let user = config
    .users
    .iter()
    .find(|u| u.username == username)
    .ok_or(ApiError::BadCredentials)?;

  let parsed_hash = PasswordHash::new(&user.password_hash)
    .map_err(|_| ApiError::BadCredentials)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::BadCredentials)?;

  Ok(AuthContext {
    user_id:    user.user_id,
    role:       user.role,
    department: user.department.clone(),
  })
}

/// Extractor: present in a handler means the request was authenticated.
pub struct Authenticated(pub AuthContext);

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: DirectoryStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    Ok(Authenticated(verify_auth(&parts.headers, &state.auth)?))
  }
}

#[cfg(test)]
mod tests {
  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::http::header;
  use rand_core::OsRng;

  use super::*;

  fn hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  fn config(password: &str) -> AuthConfig {
    AuthConfig {
      users: vec![AuthUser {
        username:      "alice".to_string(),
        password_hash: hash(password),
        user_id:       Uuid::from_u128(1),
        role:          Role::Staff,
        department:    Some("CS".to_string()),
      }],
    }
  }

  fn headers_with(user: &str, pass: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let encoded = B64.encode(format!("{user}:{pass}"));
    headers.insert(
      header::AUTHORIZATION,
      format!("Basic {encoded}").parse().unwrap(),
    );
    headers
  }

  #[test]
  fn correct_credentials_yield_context() {
    let cfg = config("secret");
    let ctx = verify_auth(&headers_with("alice", "secret"), &cfg).unwrap();
    assert_eq!(ctx.user_id, Uuid::from_u128(1));
    assert_eq!(ctx.role, Role::Staff);
    assert_eq!(ctx.department.as_deref(), Some("CS"));
  }

  #[test]
  fn wrong_password_rejected() {
    let cfg = config("secret");
    assert!(matches!(
      verify_auth(&headers_with("alice", "wrong"), &cfg),
      Err(ApiError::BadCredentials)
    ));
  }

  #[test]
  fn unknown_user_rejected() {
    let cfg = config("secret");
    assert!(matches!(
      verify_auth(&headers_with("mallory", "secret"), &cfg),
      Err(ApiError::BadCredentials)
    ));
  }

  #[test]
  fn missing_header_rejected() {
    let cfg = config("secret");
    assert!(matches!(
      verify_auth(&HeaderMap::new(), &cfg),
      Err(ApiError::BadCredentials)
    ));
  }

  #[test]
  fn invalid_base64_rejected() {
    let cfg = config("secret");
    let mut headers = HeaderMap::new();
    headers
      .insert(header::AUTHORIZATION, "Basic !!!not-base64!!!".parse().unwrap());
    assert!(matches!(
      verify_auth(&headers, &cfg),
      Err(ApiError::BadCredentials)
    ));
  }
}
