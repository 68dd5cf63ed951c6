use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A node in the product-classification tree. `parent_id = None` marks a
/// root category. Siblings display in (sort_order, name) order.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub slug: String,
  pub parent_id: Option<Uuid>,
  pub is_active: bool,
  pub sort_order: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
