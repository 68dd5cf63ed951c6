//! Shopping cart operations. Cart lines are keyed by (user, product); every
//! mutation re-validates against current stock since nothing is reserved
//! between carting and checkout.

use crate::errors::{AppError, Result};
use crate::models::{CartItem, CartLine, CartView};
use crate::services::product_service;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

const CART_LINES: &str = "SELECT ci.id, ci.product_id, p.name AS product_name, p.price_cents, \
   ci.quantity, p.stock_quantity, ci.added_at \
   FROM cart_items ci JOIN products p ON p.id = ci.product_id \
   WHERE ci.user_id = $1 ORDER BY ci.added_at ASC";

/// The user's cart with live product pricing and derived totals.
pub async fn view_cart(pool: &PgPool, user_id: Uuid) -> Result<CartView> {
  let lines: Vec<CartLine> = sqlx::query_as(CART_LINES).bind(user_id).fetch_all(pool).await?;
  Ok(CartView::from_lines(lines))
}

/// Adds `quantity` of a product, merging with any existing line. The merged
/// quantity must fit within current stock.
#[instrument(name = "cart_service::add_product", skip(pool), fields(user_id = %user_id, product_id = %product_id))]
pub async fn add_product(pool: &PgPool, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<CartItem> {
  if quantity <= 0 {
    return Err(AppError::Validation("Quantity must be a positive number.".to_string()));
  }

  let product = product_service::get_product(pool, product_id).await?;
  let existing: Option<i32> = sqlx::query_scalar(
    "SELECT quantity FROM cart_items WHERE user_id = $1 AND product_id = $2",
  )
  .bind(user_id)
  .bind(product_id)
  .fetch_optional(pool)
  .await?;

  let merged = existing.unwrap_or(0) + quantity;
  product.can_purchase(merged).map_err(AppError::Validation)?;

  let item: CartItem = sqlx::query_as(
    "INSERT INTO cart_items (id, user_id, product_id, quantity) VALUES ($1, $2, $3, $4) \
     ON CONFLICT (user_id, product_id) \
     DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, added_at = NOW() \
     RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(user_id)
  .bind(product_id)
  .bind(quantity)
  .fetch_one(pool)
  .await?;

  info!(new_quantity = item.quantity, "Cart line added/merged.");
  Ok(item)
}

/// Sets a line's quantity outright. Zero removes the line and returns
/// `None`; anything else is validated against current stock.
#[instrument(name = "cart_service::update_quantity", skip(pool), fields(user_id = %user_id, product_id = %product_id))]
pub async fn update_quantity(pool: &PgPool, user_id: Uuid, product_id: Uuid, quantity: i32) -> Result<Option<CartItem>> {
  if quantity < 0 {
    return Err(AppError::Validation("Quantity must be non-negative.".to_string()));
  }
  if quantity == 0 {
    remove_product(pool, user_id, product_id).await?;
    return Ok(None);
  }

  let product = product_service::get_product(pool, product_id).await?;
  product.can_purchase(quantity).map_err(AppError::Validation)?;

  let item: CartItem = sqlx::query_as(
    "INSERT INTO cart_items (id, user_id, product_id, quantity) VALUES ($1, $2, $3, $4) \
     ON CONFLICT (user_id, product_id) \
     DO UPDATE SET quantity = EXCLUDED.quantity, added_at = NOW() \
     RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(user_id)
  .bind(product_id)
  .bind(quantity)
  .fetch_one(pool)
  .await?;
  Ok(Some(item))
}

/// Removes a line; absent lines are a not-found error.
pub async fn remove_product(pool: &PgPool, user_id: Uuid, product_id: Uuid) -> Result<()> {
  let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
    .bind(user_id)
    .bind(product_id)
    .execute(pool)
    .await?;
  if result.rows_affected() == 0 {
    return Err(AppError::NotFound("Product is not in the cart.".to_string()));
  }
  Ok(())
}

/// Empties the cart, returning how many lines were removed.
pub async fn clear_cart(pool: &PgPool, user_id: Uuid) -> Result<u64> {
  let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
    .bind(user_id)
    .execute(pool)
    .await?;
  Ok(result.rows_affected())
}
