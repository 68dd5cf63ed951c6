use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Immutable purchase snapshot: `price_cents` is copied from the product at
/// checkout so later price changes never alter historical orders.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub seller_id: Uuid,
  pub quantity: i32,
  pub price_cents: i64,
  pub created_at: DateTime<Utc>,
}

impl OrderItem {
  pub fn total_price_cents(&self) -> i64 {
    self.price_cents * self.quantity as i64
  }
}
