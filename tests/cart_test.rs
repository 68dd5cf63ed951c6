mod common;

use buybuy_backend::errors::AppError;
use buybuy_backend::services::cart_service;
use common::{create_category, create_product, create_user, setup_database};

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn adding_the_same_product_merges_lines() {
  let pool = setup_database().await;
  let buyer = create_user(&pool, "buyer@example.com").await;
  let seller = create_user(&pool, "seller@example.com").await;
  let category = create_category(&pool, "Electronics", None).await;
  let product = create_product(&pool, seller, category, 1000, 10).await;

  cart_service::add_product(&pool, buyer, product, 2).await.unwrap();
  let merged = cart_service::add_product(&pool, buyer, product, 3).await.unwrap();
  assert_eq!(merged.quantity, 5);

  let cart = cart_service::view_cart(&pool, buyer).await.unwrap();
  assert_eq!(cart.items.len(), 1);
  assert_eq!(cart.total_items, 5);
  assert_eq!(cart.total_cents, 5000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn merged_quantity_cannot_exceed_stock() {
  let pool = setup_database().await;
  let buyer = create_user(&pool, "buyer@example.com").await;
  let seller = create_user(&pool, "seller@example.com").await;
  let category = create_category(&pool, "Electronics", None).await;
  let product = create_product(&pool, seller, category, 1000, 4).await;

  cart_service::add_product(&pool, buyer, product, 3).await.unwrap();
  let err = cart_service::add_product(&pool, buyer, product, 2).await.unwrap_err();
  assert!(matches!(err, AppError::Validation(m) if m.contains("Insufficient stock")));

  // The failed merge did not change the line.
  let cart = cart_service::view_cart(&pool, buyer).await.unwrap();
  assert_eq!(cart.total_items, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn zero_quantity_update_removes_the_line() {
  let pool = setup_database().await;
  let buyer = create_user(&pool, "buyer@example.com").await;
  let seller = create_user(&pool, "seller@example.com").await;
  let category = create_category(&pool, "Electronics", None).await;
  let product = create_product(&pool, seller, category, 1000, 10).await;

  cart_service::add_product(&pool, buyer, product, 2).await.unwrap();

  let updated = cart_service::update_quantity(&pool, buyer, product, 6).await.unwrap();
  assert_eq!(updated.unwrap().quantity, 6);

  let removed = cart_service::update_quantity(&pool, buyer, product, 0).await.unwrap();
  assert!(removed.is_none());
  assert!(cart_service::view_cart(&pool, buyer).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn negative_quantities_are_rejected() {
  let pool = setup_database().await;
  let buyer = create_user(&pool, "buyer@example.com").await;
  let seller = create_user(&pool, "seller@example.com").await;
  let category = create_category(&pool, "Electronics", None).await;
  let product = create_product(&pool, seller, category, 1000, 10).await;

  let err = cart_service::add_product(&pool, buyer, product, 0).await.unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));
  let err = cart_service::update_quantity(&pool, buyer, product, -1).await.unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn removing_an_absent_line_is_not_found() {
  let pool = setup_database().await;
  let buyer = create_user(&pool, "buyer@example.com").await;
  let seller = create_user(&pool, "seller@example.com").await;
  let category = create_category(&pool, "Electronics", None).await;
  let product = create_product(&pool, seller, category, 1000, 10).await;

  let err = cart_service::remove_product(&pool, buyer, product).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn clearing_reports_how_many_lines_were_removed() {
  let pool = setup_database().await;
  let buyer = create_user(&pool, "buyer@example.com").await;
  let seller = create_user(&pool, "seller@example.com").await;
  let category = create_category(&pool, "Electronics", None).await;
  let a = create_product(&pool, seller, category, 1000, 10).await;
  let b = create_product(&pool, seller, category, 500, 10).await;

  cart_service::add_product(&pool, buyer, a, 1).await.unwrap();
  cart_service::add_product(&pool, buyer, b, 2).await.unwrap();

  assert_eq!(cart_service::clear_cart(&pool, buyer).await.unwrap(), 2);
  assert!(cart_service::view_cart(&pool, buyer).await.unwrap().is_empty());
}
