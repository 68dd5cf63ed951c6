//! Password hashing, credential verification, and bearer-token sessions.

use crate::errors::{AppError, Result};
use crate::models::{Session, User};
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verifies a plain-text password against a stored Argon2 hash. A mismatch
/// is `Ok(false)`; only malformed hashes or internal failures are errors.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool> {
  let parsed = PasswordHash::new(stored_hash)
    .map_err(|e| AppError::Internal(format!("Invalid stored password hash: {}", e)))?;
  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(e) => Err(AppError::Internal(format!("Password verification failed: {}", e))),
  }
}

#[derive(Debug)]
pub struct SignupInput {
  pub email: String,
  pub username: String,
  pub first_name: String,
  pub last_name: String,
  pub password: String,
}

fn validate_signup(input: &SignupInput) -> Result<()> {
  if input.email.trim().is_empty() || !input.email.contains('@') {
    return Err(AppError::Validation("A valid email address is required.".to_string()));
  }
  if input.username.trim().is_empty() {
    return Err(AppError::Validation("Username is required.".to_string()));
  }
  if input.password.len() < 8 {
    return Err(AppError::Validation(
      "Password must be at least 8 characters long.".to_string(),
    ));
  }
  Ok(())
}

/// Creates a user and signs them in, returning the new user and an issued
/// session. Duplicate emails are rejected.
#[instrument(name = "auth_service::signup", skip(pool, input), fields(email = %input.email))]
pub async fn signup(pool: &PgPool, input: SignupInput, session_ttl_days: i64) -> Result<(User, Session)> {
  validate_signup(&input)?;

  let email = input.email.trim().to_lowercase();
  let password_hash = hash_password(&input.password)?;

  // The UNIQUE constraint on users.email is the authoritative duplicate
  // check; concurrent signups for the same address both land here and the
  // loser gets the violation.
  let user: User = sqlx::query_as(
    "INSERT INTO users (id, email, username, first_name, last_name, password_hash) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(&email)
  .bind(input.username.trim())
  .bind(input.first_name.trim())
  .bind(input.last_name.trim())
  .bind(&password_hash)
  .fetch_one(pool)
  .await
  .map_err(|e| {
    if e.as_database_error().map_or(false, |db| db.is_unique_violation()) {
      warn!("Signup rejected: email already registered.");
      AppError::Validation("Email address is already registered.".to_string())
    } else {
      AppError::Sqlx(e)
    }
  })?;

  let session = create_session(pool, user.id, session_ttl_days).await?;
  debug!(user_id = %user.id, "Signup complete, session issued.");
  Ok((user, session))
}

/// Verifies credentials and issues a fresh session token.
#[instrument(name = "auth_service::signin", skip(pool, password), fields(email = %email))]
pub async fn signin(pool: &PgPool, email: &str, password: &str, session_ttl_days: i64) -> Result<(User, Session)> {
  let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1 AND is_active = TRUE")
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?;

  let user = match user {
    Some(u) => u,
    None => {
      warn!("Signin failed: no active user for email.");
      return Err(AppError::Auth("Invalid email or password.".to_string()));
    }
  };

  if !verify_password(&user.password_hash, password)? {
    warn!(user_id = %user.id, "Signin failed: password mismatch.");
    return Err(AppError::Auth("Invalid email or password.".to_string()));
  }

  let session = create_session(pool, user.id, session_ttl_days).await?;
  Ok((user, session))
}

pub async fn create_session(pool: &PgPool, user_id: Uuid, ttl_days: i64) -> Result<Session> {
  let session: Session = sqlx::query_as(
    "INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(user_id)
  .bind(Utc::now() + Duration::days(ttl_days))
  .fetch_one(pool)
  .await?;
  Ok(session)
}

/// Resolves a bearer token to its user. Expired tokens and disabled
/// accounts both fail authentication.
#[instrument(name = "auth_service::resolve_session", skip_all)]
pub async fn resolve_session(pool: &PgPool, token: Uuid) -> Result<User> {
  let user: Option<User> = sqlx::query_as(
    "SELECT u.* FROM users u \
     JOIN sessions s ON s.user_id = u.id \
     WHERE s.token = $1 AND s.expires_at > NOW() AND u.is_active = TRUE",
  )
  .bind(token)
  .fetch_optional(pool)
  .await?;
  user.ok_or_else(|| AppError::Auth("Invalid or expired session token.".to_string()))
}

/// Deletes the session for `token`, signing the user out.
pub async fn signout(pool: &PgPool, token: Uuid) -> Result<()> {
  sqlx::query("DELETE FROM sessions WHERE token = $1")
    .bind(token)
    .execute(pool)
    .await?;
  Ok(())
}

pub async fn get_user(pool: &PgPool, user_id: Uuid) -> Result<User> {
  let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
  user.ok_or_else(|| AppError::NotFound(format!("User {} not found.", user_id)))
}
