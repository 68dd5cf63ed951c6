use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::OrderStatus;
use crate::services::order_service;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CheckoutRequestPayload {
  pub shipping_address: String,
}

fn default_restore_stock() -> bool {
  true
}

#[derive(Deserialize, Debug)]
pub struct CancelOrderPayload {
  #[serde(default = "default_restore_stock")]
  pub restore_stock: bool,
}

#[derive(Deserialize, Debug)]
pub struct UpdateStatusPayload {
  pub status: OrderStatus,
}

#[instrument(name = "handler::checkout", skip(app_state, payload, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CheckoutRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let placed = order_service::checkout(&app_state.db_pool, auth_user.user_id, &payload.shipping_address).await?;
  info!(order_id = %placed.order.id, "Checkout completed.");
  Ok(HttpResponse::Created().json(json!({
      "message": "Order placed successfully.",
      "order": placed
  })))
}

#[instrument(name = "handler::list_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = order_service::list_orders(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(name = "handler::get_order", skip(app_state, path, auth_user), fields(user_id = %auth_user.user_id, order_id = %path.as_ref()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order = order_service::get_order(&app_state.db_pool, auth_user.user_id, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "order": order })))
}

#[instrument(name = "handler::cancel_order", skip(app_state, path, payload, auth_user), fields(user_id = %auth_user.user_id, order_id = %path.as_ref()))]
pub async fn cancel_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: Option<web::Json<CancelOrderPayload>>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  // Body is optional; stock is restored unless the caller opts out.
  let restore_stock = payload.map(|p| p.restore_stock).unwrap_or(true);
  let order =
    order_service::cancel_order(&app_state.db_pool, auth_user.user_id, path.into_inner(), restore_stock).await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Order cancelled.",
      "order": order
  })))
}

#[instrument(name = "handler::update_order_status", skip(app_state, path, payload, auth_user), fields(user_id = %auth_user.user_id, order_id = %path.as_ref()))]
pub async fn update_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateStatusPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order =
    order_service::update_status(&app_state.db_pool, auth_user.user_id, path.into_inner(), payload.status).await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Order status updated.",
      "order": order
  })))
}
