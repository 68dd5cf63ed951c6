use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

/// Order lifecycle: pending -> {confirmed, cancelled};
/// confirmed -> {shipped, cancelled}; shipped -> delivered.
/// `delivered` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Confirmed,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub fn can_transition_to(self, next: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
      (self, next),
      (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Shipped) | (Confirmed, Cancelled) | (Shipped, Delivered)
    )
  }

  pub fn can_be_cancelled(self) -> bool {
    matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
  }

  pub fn is_terminal(self) -> bool {
    matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Confirmed => "confirmed",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub buyer_id: Uuid,
  pub status: OrderStatus,
  pub total_amount_cents: i64,
  pub shipping_address: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::OrderStatus::*;

  #[test]
  fn pending_can_confirm_or_cancel() {
    assert!(Pending.can_transition_to(Confirmed));
    assert!(Pending.can_transition_to(Cancelled));
    assert!(!Pending.can_transition_to(Shipped));
    assert!(!Pending.can_transition_to(Delivered));
  }

  #[test]
  fn confirmed_can_ship_or_cancel() {
    assert!(Confirmed.can_transition_to(Shipped));
    assert!(Confirmed.can_transition_to(Cancelled));
    assert!(!Confirmed.can_transition_to(Delivered));
  }

  #[test]
  fn shipped_only_delivers() {
    assert!(Shipped.can_transition_to(Delivered));
    assert!(!Shipped.can_transition_to(Cancelled));
    assert!(!Shipped.can_be_cancelled());
  }

  #[test]
  fn terminal_states_allow_nothing() {
    for next in [Pending, Confirmed, Shipped, Delivered, Cancelled] {
      assert!(!Delivered.can_transition_to(next));
      assert!(!Cancelled.can_transition_to(next));
    }
    assert!(Delivered.is_terminal());
    assert!(Cancelled.is_terminal());
  }

  #[test]
  fn cancellable_only_before_shipping() {
    assert!(Pending.can_be_cancelled());
    assert!(Confirmed.can_be_cancelled());
    assert!(!Shipped.can_be_cancelled());
    assert!(!Delivered.can_be_cancelled());
    assert!(!Cancelled.can_be_cancelled());
  }
}
