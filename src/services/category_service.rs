//! Category hierarchy operations: CRUD, slug generation, re-parenting with
//! cycle/depth validation, and product counts.

use crate::errors::{AppError, Result};
use crate::models::Category;
use crate::services::category_tree::{CategoryTree, MoveError};
use crate::services::patch;
use crate::services::slug::slugify;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

const ACTIVE_ORDERED: &str =
  "SELECT * FROM categories WHERE is_active = TRUE ORDER BY sort_order ASC, name ASC";

#[derive(Debug, Deserialize)]
pub struct CreateCategoryInput {
  pub name: String,
  pub description: Option<String>,
  pub parent_id: Option<Uuid>,
  #[serde(default)]
  pub sort_order: i32,
}

/// Partial update; `description` distinguishes an absent field (keep) from
/// an explicit `null` (clear).
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryInput {
  pub name: Option<String>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub description: Option<Option<String>>,
  pub sort_order: Option<i32>,
  pub is_active: Option<bool>,
}

/// A category with its subtree, for the nested tree endpoint.
#[derive(Debug, Serialize)]
pub struct CategoryTreeNode {
  #[serde(flatten)]
  pub category: Category,
  pub children: Vec<CategoryTreeNode>,
}

/// Outcome of a delete request: categories still in use are soft-disabled
/// instead of removed.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CategoryDeletion {
  Deleted,
  Disabled { reason: String },
}

#[derive(Debug, Serialize)]
pub struct CategoryDetail {
  #[serde(flatten)]
  pub category: Category,
  /// Immediate parent first, root last.
  pub ancestors: Vec<Category>,
  pub product_count: i64,
  pub total_product_count: i64,
}

/// Active categories in display order.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>> {
  Ok(sqlx::query_as(ACTIVE_ORDERED).fetch_all(pool).await?)
}

/// Snapshot of the whole table, active or not, for hierarchy validation.
async fn load_all(pool: &PgPool) -> Result<Vec<Category>> {
  Ok(sqlx::query_as("SELECT * FROM categories").fetch_all(pool).await?)
}

fn validate_fields(name: &str, sort_order: i32) -> Result<()> {
  if name.trim().is_empty() {
    return Err(AppError::Validation("Category name is required.".to_string()));
  }
  if !(0..=9999).contains(&sort_order) {
    return Err(AppError::Validation("Sort order must be between 0 and 9999.".to_string()));
  }
  Ok(())
}

/// Finds a free slug for `name`, suffixing `-2`, `-3`, ... on collisions.
async fn unique_slug(pool: &PgPool, name: &str) -> Result<String> {
  let base = {
    let s = slugify(name);
    if s.is_empty() {
      "category".to_string()
    } else {
      s
    }
  };
  let mut candidate = base.clone();
  let mut counter = 1u32;
  loop {
    let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1)")
      .bind(&candidate)
      .fetch_one(pool)
      .await?;
    if !taken {
      return Ok(candidate);
    }
    counter += 1;
    candidate = format!("{}-{}", base, counter);
  }
}

fn map_move_error(e: MoveError) -> AppError {
  match e {
    MoveError::UnknownCategory => AppError::NotFound("Category not found.".to_string()),
    MoveError::UnknownParent => AppError::NotFound("Parent category not found.".to_string()),
    other => AppError::Validation(other.to_string()),
  }
}

#[instrument(name = "category_service::create", skip(pool, input), fields(name = %input.name))]
pub async fn create_category(pool: &PgPool, input: CreateCategoryInput) -> Result<Category> {
  validate_fields(&input.name, input.sort_order)?;

  if let Some(parent_id) = input.parent_id {
    let snapshot = CategoryTree::from_categories(&load_all(pool).await?);
    snapshot.check_new_child(parent_id).map_err(map_move_error)?;
  }

  let slug = unique_slug(pool, input.name.trim()).await?;
  let category: Category = sqlx::query_as(
    "INSERT INTO categories (id, name, description, slug, parent_id, sort_order) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(input.name.trim())
  .bind(&input.description)
  .bind(&slug)
  .bind(input.parent_id)
  .bind(input.sort_order)
  .fetch_one(pool)
  .await?;

  info!(category_id = %category.id, slug = %category.slug, "Category created.");
  Ok(category)
}

pub async fn get_category(pool: &PgPool, id: Uuid) -> Result<Category> {
  let category: Option<Category> = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
    .bind(id)
    .fetch_optional(pool)
    .await?;
  category.ok_or_else(|| AppError::NotFound(format!("Category {} not found.", id)))
}

/// Category plus its ancestor chain and direct/recursive product counts.
pub async fn get_category_detail(pool: &PgPool, id: Uuid) -> Result<CategoryDetail> {
  let category = get_category(pool, id).await?;
  let all = load_all(pool).await?;
  let snapshot = CategoryTree::from_categories(&all);
  let by_id: HashMap<Uuid, &Category> = all.iter().map(|c| (c.id, c)).collect();

  let ancestors = snapshot
    .ancestors(id)
    .into_iter()
    .filter_map(|a| by_id.get(&a).map(|&c| c.clone()))
    .collect();

  let product_count = direct_product_count(pool, id).await?;
  let mut scope: Vec<Uuid> = snapshot.descendants(id);
  scope.push(id);
  let total_product_count: i64 = sqlx::query_scalar(
    "SELECT COUNT(*) FROM products WHERE is_active = TRUE AND category_id = ANY($1)",
  )
  .bind(&scope)
  .fetch_one(pool)
  .await?;

  Ok(CategoryDetail {
    category,
    ancestors,
    product_count,
    total_product_count,
  })
}

async fn direct_product_count(pool: &PgPool, id: Uuid) -> Result<i64> {
  Ok(
    sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = TRUE AND category_id = $1")
      .bind(id)
      .fetch_one(pool)
      .await?,
  )
}

/// The nested active-category tree, siblings in display order.
pub async fn category_tree(pool: &PgPool) -> Result<Vec<CategoryTreeNode>> {
  let all = load_all(pool).await?;
  let snapshot = CategoryTree::from_categories(&all);
  let by_id: HashMap<Uuid, &Category> = all.iter().map(|c| (c.id, c)).collect();

  fn build(snapshot: &CategoryTree, by_id: &HashMap<Uuid, &Category>, id: Uuid) -> Option<CategoryTreeNode> {
    let category = (*by_id.get(&id)?).clone();
    let children = snapshot
      .children(id)
      .into_iter()
      .filter_map(|c| build(snapshot, by_id, c))
      .collect();
    Some(CategoryTreeNode { category, children })
  }

  Ok(
    snapshot
      .roots()
      .into_iter()
      .filter_map(|r| build(&snapshot, &by_id, r))
      .collect(),
  )
}

#[instrument(name = "category_service::update", skip(pool, input))]
pub async fn update_category(pool: &PgPool, id: Uuid, input: UpdateCategoryInput) -> Result<Category> {
  let current = get_category(pool, id).await?;
  let name = input.name.unwrap_or(current.name);
  let sort_order = input.sort_order.unwrap_or(current.sort_order);
  validate_fields(&name, sort_order)?;

  let category: Category = sqlx::query_as(
    "UPDATE categories SET name = $2, description = $3, sort_order = $4, is_active = $5, updated_at = NOW() \
     WHERE id = $1 RETURNING *",
  )
  .bind(id)
  .bind(name.trim())
  .bind(input.description.unwrap_or(current.description))
  .bind(sort_order)
  .bind(input.is_active.unwrap_or(current.is_active))
  .fetch_one(pool)
  .await?;
  Ok(category)
}

/// Re-parents a category after validating the move against the full
/// hierarchy snapshot (no cycles, depth limit respected).
#[instrument(name = "category_service::move", skip(pool))]
pub async fn move_category(pool: &PgPool, id: Uuid, new_parent_id: Option<Uuid>) -> Result<Category> {
  let snapshot = CategoryTree::from_categories(&load_all(pool).await?);
  snapshot.check_move(id, new_parent_id).map_err(map_move_error)?;

  let category: Category = sqlx::query_as(
    "UPDATE categories SET parent_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
  )
  .bind(id)
  .bind(new_parent_id)
  .fetch_one(pool)
  .await?;

  info!(category_id = %id, new_parent = ?new_parent_id, "Category moved.");
  Ok(category)
}

/// Deletes a category outright when it is unused; a category with active
/// products or active children is soft-disabled instead.
#[instrument(name = "category_service::delete", skip(pool))]
pub async fn delete_category(pool: &PgPool, id: Uuid) -> Result<CategoryDeletion> {
  let _ = get_category(pool, id).await?;

  let has_products: bool =
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE category_id = $1 AND is_active = TRUE)")
      .bind(id)
      .fetch_one(pool)
      .await?;
  let has_children: bool =
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE parent_id = $1 AND is_active = TRUE)")
      .bind(id)
      .fetch_one(pool)
      .await?;

  if has_products || has_children {
    let reason = if has_products {
      "Category has active products assigned".to_string()
    } else {
      "Category has active subcategories".to_string()
    };
    sqlx::query("UPDATE categories SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
      .bind(id)
      .execute(pool)
      .await?;
    info!(category_id = %id, %reason, "Category soft-disabled instead of deleted.");
    return Ok(CategoryDeletion::Disabled { reason });
  }

  sqlx::query("DELETE FROM categories WHERE id = $1").bind(id).execute(pool).await?;
  info!(category_id = %id, "Category deleted.");
  Ok(CategoryDeletion::Deleted)
}
