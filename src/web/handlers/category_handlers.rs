use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::category_service::{self, CreateCategoryInput, UpdateCategoryInput};
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct MoveCategoryPayload {
  pub new_parent_id: Option<Uuid>,
}

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = category_service::list_categories(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}

#[instrument(name = "handler::category_tree", skip(app_state))]
pub async fn category_tree_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let tree = category_service::category_tree(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(json!({ "tree": tree })))
}

#[instrument(name = "handler::get_category", skip(app_state, path), fields(category_id = %path.as_ref()))]
pub async fn get_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let detail = category_service::get_category_detail(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "category": detail })))
}

#[instrument(name = "handler::create_category", skip(app_state, payload, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn create_category_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateCategoryInput>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let category = category_service::create_category(&app_state.db_pool, payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(json!({
      "message": "Category created successfully.",
      "category": category
  })))
}

#[instrument(name = "handler::update_category", skip(app_state, path, payload, auth_user), fields(category_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn update_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateCategoryInput>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let category = category_service::update_category(&app_state.db_pool, path.into_inner(), payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Category updated successfully.",
      "category": category
  })))
}

#[instrument(name = "handler::move_category", skip(app_state, path, payload, auth_user), fields(category_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn move_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<MoveCategoryPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let category = category_service::move_category(&app_state.db_pool, path.into_inner(), payload.new_parent_id).await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Category moved successfully.",
      "category": category
  })))
}

#[instrument(name = "handler::delete_category", skip(app_state, path, auth_user), fields(category_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn delete_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let outcome = category_service::delete_category(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "result": outcome })))
}
