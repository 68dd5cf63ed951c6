use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub image_url: Option<String>,
  pub price_cents: i64,
  pub stock_quantity: i32,
  pub category_id: Uuid,
  pub seller_id: Uuid,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// Can `quantity` units be purchased right now? Returns the refusal
  /// reason when not.
  pub fn can_purchase(&self, quantity: i32) -> Result<(), String> {
    if !self.is_active {
      return Err("Product is not available".to_string());
    }
    if quantity <= 0 {
      return Err("Quantity must be positive".to_string());
    }
    if self.stock_quantity < quantity {
      return Err(format!("Insufficient stock (available: {})", self.stock_quantity));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn product(stock: i32, active: bool) -> Product {
    Product {
      id: Uuid::new_v4(),
      name: "Widget".to_string(),
      description: None,
      image_url: None,
      price_cents: 1000,
      stock_quantity: stock,
      category_id: Uuid::new_v4(),
      seller_id: Uuid::new_v4(),
      is_active: active,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn purchase_within_stock_is_allowed() {
    assert!(product(5, true).can_purchase(5).is_ok());
  }

  #[test]
  fn purchase_beyond_stock_is_refused() {
    let err = product(2, true).can_purchase(3).unwrap_err();
    assert!(err.contains("Insufficient stock"));
  }

  #[test]
  fn inactive_product_cannot_be_purchased() {
    assert!(product(10, false).can_purchase(1).is_err());
  }

  #[test]
  fn non_positive_quantity_is_refused() {
    assert!(product(10, true).can_purchase(0).is_err());
    assert!(product(10, true).can_purchase(-1).is_err());
  }
}
