//! Bearer-token authentication extractor.

use crate::errors::AppError;
use crate::services::auth_service;
use crate::state::AppState;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

/// The authenticated caller, resolved from `Authorization: Bearer <token>`
/// against the sessions table. Handlers take this as a parameter to require
/// authentication.
#[derive(Debug)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
  pub token: Uuid,
}

fn bearer_token(req: &HttpRequest) -> Result<Uuid, AppError> {
  let header = req
    .headers()
    .get("Authorization")
    .and_then(|v| v.to_str().ok())
    .ok_or_else(|| AppError::Auth("Missing Authorization header.".to_string()))?;
  let token = header
    .strip_prefix("Bearer ")
    .ok_or_else(|| AppError::Auth("Authorization header must be a Bearer token.".to_string()))?;
  Uuid::parse_str(token.trim()).map_err(|_| AppError::Auth("Malformed session token.".to_string()))
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let token = bearer_token(req);
    let app_state = req.app_data::<web::Data<AppState>>().cloned();

    Box::pin(async move {
      let token = token?;
      let app_state = app_state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
      match auth_service::resolve_session(&app_state.db_pool, token).await {
        Ok(user) => Ok(AuthenticatedUser {
          user_id: user.id,
          token,
        }),
        Err(e) => {
          warn!("Authentication failed: {}", e);
          Err(e)
        }
      }
    })
  }
}
