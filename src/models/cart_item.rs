use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartItem {
  pub id: Uuid,
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
}

/// A cart item joined with live product data. Prices are not snapshotted in
/// the cart; `price_cents` is whatever the product costs right now.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLine {
  pub id: Uuid,
  pub product_id: Uuid,
  pub product_name: String,
  pub price_cents: i64,
  pub quantity: i32,
  pub stock_quantity: i32,
  pub added_at: DateTime<Utc>,
}

impl CartLine {
  pub fn line_total_cents(&self) -> i64 {
    self.price_cents * self.quantity as i64
  }
}

/// The user's cart as the API serves it: lines plus derived totals.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
  pub items: Vec<CartLine>,
  pub total_cents: i64,
  pub total_items: i32,
}

impl CartView {
  pub fn from_lines(items: Vec<CartLine>) -> Self {
    let total_cents = items.iter().map(CartLine::line_total_cents).sum();
    let total_items = items.iter().map(|l| l.quantity).sum();
    Self {
      items,
      total_cents,
      total_items,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line(price_cents: i64, quantity: i32) -> CartLine {
    CartLine {
      id: Uuid::new_v4(),
      product_id: Uuid::new_v4(),
      product_name: "Widget".to_string(),
      price_cents,
      quantity,
      stock_quantity: 100,
      added_at: Utc::now(),
    }
  }

  #[test]
  fn totals_sum_price_times_quantity() {
    // 2 x $10.00 + 1 x $5.00 = $25.00
    let view = CartView::from_lines(vec![line(1000, 2), line(500, 1)]);
    assert_eq!(view.total_cents, 2500);
    assert_eq!(view.total_items, 3);
  }

  #[test]
  fn empty_cart_has_zero_totals() {
    let view = CartView::from_lines(vec![]);
    assert!(view.is_empty());
    assert_eq!(view.total_cents, 0);
    assert_eq!(view.total_items, 0);
  }
}
