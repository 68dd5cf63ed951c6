//! Helper for PATCH-style partial updates on nullable columns.

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field from an explicit `null`. Pair with
/// `#[serde(default, deserialize_with = "...")]` on an `Option<Option<T>>`
/// field: absent deserializes to `None` (keep the current value), `null` to
/// `Some(None)` (clear it), and a value to `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Deserialize::deserialize(deserializer).map(Some)
}
