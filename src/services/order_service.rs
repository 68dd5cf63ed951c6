//! Checkout and order lifecycle. Checkout is the one multi-step,
//! multi-entity operation in the system and runs inside a single database
//! transaction: order + items are created, stock is decremented, and the
//! cart is cleared, or none of it happens.

use crate::errors::{AppError, Result};
use crate::models::{Order, OrderItem, OrderStatus};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct OrderWithItems {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<OrderItem>,
}

#[derive(Debug, FromRow)]
struct CheckoutLine {
  product_id: Uuid,
  quantity: i32,
  name: String,
  price_cents: i64,
  stock_quantity: i32,
  seller_id: Uuid,
  is_active: bool,
}

/// Places an order from the user's cart.
///
/// Validates a non-blank shipping address and a non-empty cart, then inside
/// one transaction: creates the order, snapshots each cart line into an
/// order item (copying current price and seller), decrements product stock,
/// and deletes the cart lines. Any error rolls everything back.
#[instrument(name = "order_service::checkout", skip(pool, shipping_address), fields(buyer_id = %buyer_id))]
pub async fn checkout(pool: &PgPool, buyer_id: Uuid, shipping_address: &str) -> Result<OrderWithItems> {
  if shipping_address.trim().is_empty() {
    return Err(AppError::Validation("Shipping address is required.".to_string()));
  }

  let mut tx = pool.begin().await?;

  let lines: Vec<CheckoutLine> = sqlx::query_as(
    "SELECT ci.product_id, ci.quantity, p.name, p.price_cents, p.stock_quantity, p.seller_id, p.is_active \
     FROM cart_items ci JOIN products p ON p.id = ci.product_id \
     WHERE ci.user_id = $1 ORDER BY ci.added_at ASC",
  )
  .bind(buyer_id)
  .fetch_all(&mut *tx)
  .await?;

  if lines.is_empty() {
    return Err(AppError::Validation("Your cart is empty.".to_string()));
  }

  let total_amount_cents: i64 = lines.iter().map(|l| l.price_cents * l.quantity as i64).sum();

  let order: Order = sqlx::query_as(
    "INSERT INTO orders (id, buyer_id, status, total_amount_cents, shipping_address) \
     VALUES ($1, $2, 'pending', $3, $4) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(buyer_id)
  .bind(total_amount_cents)
  .bind(shipping_address.trim())
  .fetch_one(&mut *tx)
  .await?;

  let mut items = Vec::with_capacity(lines.len());
  for line in &lines {
    if !line.is_active {
      warn!(product_id = %line.product_id, "Checkout aborted: product no longer available.");
      return Err(AppError::Validation(format!("'{}' is no longer available.", line.name)));
    }
    if line.stock_quantity < line.quantity {
      warn!(product_id = %line.product_id, "Checkout aborted: insufficient stock.");
      return Err(AppError::Validation(format!(
        "Not enough stock for '{}' (available: {}).",
        line.name, line.stock_quantity
      )));
    }

    let item: OrderItem = sqlx::query_as(
      "INSERT INTO order_items (id, order_id, product_id, seller_id, quantity, price_cents) \
       VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(order.id)
    .bind(line.product_id)
    .bind(line.seller_id)
    .bind(line.quantity)
    .bind(line.price_cents)
    .fetch_one(&mut *tx)
    .await?;
    items.push(item);

    // Known gap carried over from the original system: no row lock between
    // the stock check above and this decrement, so two concurrent checkouts
    // for the last units can both pass validation. The CHECK constraint on
    // stock_quantity then aborts the losing transaction instead of
    // overselling.
    sqlx::query("UPDATE products SET stock_quantity = stock_quantity - $1, updated_at = NOW() WHERE id = $2")
      .bind(line.quantity)
      .bind(line.product_id)
      .execute(&mut *tx)
      .await?;
  }

  sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
    .bind(buyer_id)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;

  info!(order_id = %order.id, total_cents = total_amount_cents, "Order placed.");
  Ok(OrderWithItems { order, items })
}

/// The buyer's order history, newest first.
pub async fn list_orders(pool: &PgPool, buyer_id: Uuid) -> Result<Vec<Order>> {
  let orders: Vec<Order> = sqlx::query_as("SELECT * FROM orders WHERE buyer_id = $1 ORDER BY created_at DESC")
    .bind(buyer_id)
    .fetch_all(pool)
    .await?;
  Ok(orders)
}

async fn load_order(pool: &PgPool, order_id: Uuid) -> Result<Order> {
  let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
  order.ok_or_else(|| AppError::NotFound(format!("Order {} not found.", order_id)))
}

async fn is_seller_on_order(pool: &PgPool, order_id: Uuid, user_id: Uuid) -> Result<bool> {
  Ok(
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM order_items WHERE order_id = $1 AND seller_id = $2)")
      .bind(order_id)
      .bind(user_id)
      .fetch_one(pool)
      .await?,
  )
}

/// An order with its items, readable by the buyer or by any seller with
/// items in it.
pub async fn get_order(pool: &PgPool, user_id: Uuid, order_id: Uuid) -> Result<OrderWithItems> {
  let order = load_order(pool, order_id).await?;
  if order.buyer_id != user_id && !is_seller_on_order(pool, order_id, user_id).await? {
    return Err(AppError::Forbidden("You do not have access to this order.".to_string()));
  }
  let items: Vec<OrderItem> = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY created_at ASC")
    .bind(order_id)
    .fetch_all(pool)
    .await?;
  Ok(OrderWithItems { order, items })
}

/// Cancels an order. Buyer only, and only from pending/confirmed; by
/// default each item's quantity is restored to its product's stock. Runs in
/// one transaction so status change and restock are atomic.
#[instrument(name = "order_service::cancel", skip(pool), fields(buyer_id = %buyer_id, order_id = %order_id))]
pub async fn cancel_order(pool: &PgPool, buyer_id: Uuid, order_id: Uuid, restore_stock: bool) -> Result<Order> {
  let order = load_order(pool, order_id).await?;
  if order.buyer_id != buyer_id {
    return Err(AppError::Forbidden("Only the buyer may cancel this order.".to_string()));
  }
  if !order.status.can_be_cancelled() {
    return Err(AppError::Business(format!(
      "Cannot cancel {} order.",
      order.status.as_str()
    )));
  }

  let mut tx = pool.begin().await?;

  // The status guard is repeated on the UPDATE itself: of two concurrent
  // cancels, only the one that flips the row proceeds to restock.
  let cancelled: Option<Order> = sqlx::query_as(
    "UPDATE orders SET status = 'cancelled', updated_at = NOW() \
     WHERE id = $1 AND status IN ('pending', 'confirmed') RETURNING *",
  )
  .bind(order_id)
  .fetch_optional(&mut *tx)
  .await?;
  let cancelled = match cancelled {
    Some(order) => order,
    None => {
      return Err(AppError::Business("Order can no longer be cancelled.".to_string()));
    }
  };

  if restore_stock {
    sqlx::query(
      "UPDATE products p SET stock_quantity = p.stock_quantity + oi.quantity, updated_at = NOW() \
       FROM order_items oi WHERE oi.order_id = $1 AND oi.product_id = p.id",
    )
    .bind(order_id)
    .execute(&mut *tx)
    .await?;
  }

  tx.commit().await?;
  info!(order_id = %order_id, restore_stock, "Order cancelled.");
  Ok(cancelled)
}

/// Advances an order's status along pending -> confirmed -> shipped ->
/// delivered. Restricted to sellers with items in the order; cancellation
/// goes through [`cancel_order`] instead.
#[instrument(name = "order_service::update_status", skip(pool), fields(user_id = %user_id, order_id = %order_id))]
pub async fn update_status(pool: &PgPool, user_id: Uuid, order_id: Uuid, new_status: OrderStatus) -> Result<Order> {
  if new_status == OrderStatus::Cancelled {
    return Err(AppError::Validation(
      "Use the cancel endpoint to cancel an order.".to_string(),
    ));
  }

  let order = load_order(pool, order_id).await?;
  if !is_seller_on_order(pool, order_id, user_id).await? {
    return Err(AppError::Forbidden(
      "Only a seller with items in this order may update its status.".to_string(),
    ));
  }
  if !order.status.can_transition_to(new_status) {
    return Err(AppError::Business(format!(
      "Cannot move order from {} to {}.",
      order.status.as_str(),
      new_status.as_str()
    )));
  }

  // Compare-and-set on the status the transition was validated against, so
  // a concurrent update cannot be silently overwritten.
  let updated: Option<Order> = sqlx::query_as(
    "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 AND status = $3 RETURNING *",
  )
  .bind(order_id)
  .bind(new_status)
  .bind(order.status)
  .fetch_optional(pool)
  .await?;

  match updated {
    Some(updated) => {
      info!(order_id = %order_id, status = new_status.as_str(), "Order status updated.");
      Ok(updated)
    }
    None => Err(AppError::Business(format!(
      "Order is no longer {}; refresh and retry.",
      order.status.as_str()
    ))),
  }
}
