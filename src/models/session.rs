use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A bearer-token session row. The token itself is the primary key.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Session {
  pub token: Uuid,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}
