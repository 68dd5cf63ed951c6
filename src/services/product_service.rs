//! Seller-scoped product catalog operations.

use crate::errors::{AppError, Result};
use crate::models::Product;
use crate::services::patch;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
  pub name: String,
  pub description: Option<String>,
  pub image_url: Option<String>,
  pub price_cents: i64,
  #[serde(default)]
  pub stock_quantity: i32,
  pub category_id: Uuid,
}

/// Partial update. The nullable fields use a double `Option` so an absent
/// field keeps the current value while an explicit `null` clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
  pub name: Option<String>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub description: Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub image_url: Option<Option<String>>,
  pub price_cents: Option<i64>,
  pub stock_quantity: Option<i32>,
  pub category_id: Option<Uuid>,
  pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
  pub category_id: Option<Uuid>,
  pub seller_id: Option<Uuid>,
}

fn validate_pricing(price_cents: i64, stock_quantity: i32) -> Result<()> {
  if price_cents <= 0 {
    return Err(AppError::Validation("Product price must be positive.".to_string()));
  }
  if stock_quantity < 0 {
    return Err(AppError::Validation("Stock quantity cannot be negative.".to_string()));
  }
  Ok(())
}

async fn require_active_category(pool: &PgPool, category_id: Uuid) -> Result<()> {
  let active: Option<bool> = sqlx::query_scalar("SELECT is_active FROM categories WHERE id = $1")
    .bind(category_id)
    .fetch_optional(pool)
    .await?;
  match active {
    None => Err(AppError::NotFound(format!("Category {} not found.", category_id))),
    Some(false) => Err(AppError::Validation("Product category must be active.".to_string())),
    Some(true) => Ok(()),
  }
}

/// Active products, newest first, optionally filtered by category or seller.
pub async fn list_products(pool: &PgPool, filter: &ProductFilter) -> Result<Vec<Product>> {
  let products: Vec<Product> = sqlx::query_as(
    "SELECT * FROM products WHERE is_active = TRUE \
     AND ($1::uuid IS NULL OR category_id = $1) \
     AND ($2::uuid IS NULL OR seller_id = $2) \
     ORDER BY created_at DESC",
  )
  .bind(filter.category_id)
  .bind(filter.seller_id)
  .fetch_all(pool)
  .await?;
  Ok(products)
}

/// Any product by id, regardless of `is_active`. For internal paths (cart
/// merging, ownership checks); the public detail endpoint uses
/// [`get_active_product`].
pub async fn get_product(pool: &PgPool, id: Uuid) -> Result<Product> {
  let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
    .bind(id)
    .fetch_optional(pool)
    .await?;
  product.ok_or_else(|| AppError::NotFound(format!("Product {} not found.", id)))
}

/// Active product by id; soft-disabled products are not found.
pub async fn get_active_product(pool: &PgPool, id: Uuid) -> Result<Product> {
  let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1 AND is_active = TRUE")
    .bind(id)
    .fetch_optional(pool)
    .await?;
  product.ok_or_else(|| AppError::NotFound(format!("Product {} not found.", id)))
}

#[instrument(name = "product_service::create", skip(pool, input), fields(seller_id = %seller_id, name = %input.name))]
pub async fn create_product(pool: &PgPool, seller_id: Uuid, input: CreateProductInput) -> Result<Product> {
  if input.name.trim().is_empty() {
    return Err(AppError::Validation("Product name is required.".to_string()));
  }
  validate_pricing(input.price_cents, input.stock_quantity)?;
  require_active_category(pool, input.category_id).await?;

  let product: Product = sqlx::query_as(
    "INSERT INTO products (id, name, description, image_url, price_cents, stock_quantity, category_id, seller_id) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(input.name.trim())
  .bind(&input.description)
  .bind(&input.image_url)
  .bind(input.price_cents)
  .bind(input.stock_quantity)
  .bind(input.category_id)
  .bind(seller_id)
  .fetch_one(pool)
  .await?;

  info!(product_id = %product.id, "Product created.");
  Ok(product)
}

/// Loads the product and checks the acting user owns it.
async fn get_owned_product(pool: &PgPool, seller_id: Uuid, id: Uuid) -> Result<Product> {
  let product = get_product(pool, id).await?;
  if product.seller_id != seller_id {
    return Err(AppError::Forbidden("Only the product's seller may modify it.".to_string()));
  }
  Ok(product)
}

#[instrument(name = "product_service::update", skip(pool, input), fields(seller_id = %seller_id))]
pub async fn update_product(pool: &PgPool, seller_id: Uuid, id: Uuid, input: UpdateProductInput) -> Result<Product> {
  let current = get_owned_product(pool, seller_id, id).await?;

  let name = input.name.unwrap_or(current.name);
  if name.trim().is_empty() {
    return Err(AppError::Validation("Product name is required.".to_string()));
  }
  let price_cents = input.price_cents.unwrap_or(current.price_cents);
  let stock_quantity = input.stock_quantity.unwrap_or(current.stock_quantity);
  validate_pricing(price_cents, stock_quantity)?;

  let category_id = input.category_id.unwrap_or(current.category_id);
  if category_id != current.category_id {
    require_active_category(pool, category_id).await?;
  }

  let product: Product = sqlx::query_as(
    "UPDATE products SET name = $2, description = $3, image_url = $4, price_cents = $5, \
     stock_quantity = $6, category_id = $7, is_active = $8, updated_at = NOW() WHERE id = $1 RETURNING *",
  )
  .bind(id)
  .bind(name.trim())
  .bind(input.description.unwrap_or(current.description))
  .bind(input.image_url.unwrap_or(current.image_url))
  .bind(price_cents)
  .bind(stock_quantity)
  .bind(category_id)
  .bind(input.is_active.unwrap_or(current.is_active))
  .fetch_one(pool)
  .await?;
  Ok(product)
}

/// Soft-disables a product; historical orders keep referencing it.
#[instrument(name = "product_service::delete", skip(pool), fields(seller_id = %seller_id))]
pub async fn delete_product(pool: &PgPool, seller_id: Uuid, id: Uuid) -> Result<()> {
  let _ = get_owned_product(pool, seller_id, id).await?;
  sqlx::query("UPDATE products SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
    .bind(id)
    .execute(pool)
    .await?;
  info!(product_id = %id, "Product disabled.");
  Ok(())
}
