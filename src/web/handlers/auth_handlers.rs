use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::auth_service::{self, SignupInput};
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct SignupRequestPayload {
  pub email: String,
  pub username: String,
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

#[instrument(name = "handler::signup", skip(app_state, payload), fields(email = %payload.email))]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<SignupRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let (user, session) = auth_service::signup(
    &app_state.db_pool,
    SignupInput {
      email: payload.email,
      username: payload.username,
      first_name: payload.first_name,
      last_name: payload.last_name,
      password: payload.password,
    },
    app_state.config.session_ttl_days,
  )
  .await?;

  info!(user_id = %user.id, "User signed up.");
  Ok(HttpResponse::Created().json(json!({
      "message": "Account created successfully.",
      "user": user,
      "token": session.token,
      "expires_at": session.expires_at
  })))
}

#[instrument(name = "handler::signin", skip(app_state, payload), fields(email = %payload.email))]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let (user, session) =
    auth_service::signin(&app_state.db_pool, &payload.email, &payload.password, app_state.config.session_ttl_days)
      .await?;

  info!(user_id = %user.id, "User signed in.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Signed in successfully.",
      "user": user,
      "token": session.token,
      "expires_at": session.expires_at
  })))
}

#[instrument(name = "handler::signout", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn signout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_service::signout(&app_state.db_pool, auth_user.token).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Signed out successfully." })))
}

#[instrument(name = "handler::me", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn me_handler(app_state: web::Data<AppState>, auth_user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  let user = auth_service::get_user(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
