mod common;

use buybuy_backend::errors::AppError;
use buybuy_backend::services::product_service::{self, CreateProductInput, UpdateProductInput};
use common::{create_category, create_product, create_user, setup_database};

fn no_changes() -> UpdateProductInput {
  UpdateProductInput {
    name: None,
    description: None,
    image_url: None,
    price_cents: None,
    stock_quantity: None,
    category_id: None,
    is_active: None,
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn disabled_products_are_hidden_from_the_public_detail() {
  let pool = setup_database().await;
  let seller = create_user(&pool, "seller@example.com").await;
  let category = create_category(&pool, "Electronics", None).await;
  let product = create_product(&pool, seller, category, 1000, 10).await;

  assert!(product_service::get_active_product(&pool, product).await.is_ok());

  product_service::delete_product(&pool, seller, product).await.unwrap();

  let err = product_service::get_active_product(&pool, product).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));

  // Internal paths (ownership checks, historical orders) still resolve it,
  // so the seller can re-enable the listing.
  assert!(product_service::get_product(&pool, product).await.is_ok());
  let revived = product_service::update_product(
    &pool,
    seller,
    product,
    UpdateProductInput {
      is_active: Some(true),
      ..no_changes()
    },
  )
  .await
  .unwrap();
  assert!(revived.is_active);
  assert!(product_service::get_active_product(&pool, product).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn image_url_is_stored_and_clearable() {
  let pool = setup_database().await;
  let seller = create_user(&pool, "seller@example.com").await;
  let category = create_category(&pool, "Electronics", None).await;

  let product = product_service::create_product(
    &pool,
    seller,
    CreateProductInput {
      name: "Camera".to_string(),
      description: Some("Mirrorless".to_string()),
      image_url: Some("https://cdn.example.com/camera.jpg".to_string()),
      price_cents: 49900,
      stock_quantity: 5,
      category_id: category,
    },
  )
  .await
  .unwrap();
  assert_eq!(product.image_url.as_deref(), Some("https://cdn.example.com/camera.jpg"));

  let updated = product_service::update_product(
    &pool,
    seller,
    product.id,
    UpdateProductInput {
      image_url: Some(Some("https://cdn.example.com/camera-v2.jpg".to_string())),
      ..no_changes()
    },
  )
  .await
  .unwrap();
  assert_eq!(updated.image_url.as_deref(), Some("https://cdn.example.com/camera-v2.jpg"));

  // An explicit null clears the image entirely.
  let cleared = product_service::update_product(
    &pool,
    seller,
    product.id,
    UpdateProductInput {
      image_url: Some(None),
      ..no_changes()
    },
  )
  .await
  .unwrap();
  assert_eq!(cleared.image_url, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
#[serial_test::serial]
async fn absent_description_is_kept_and_explicit_null_clears_it() {
  let pool = setup_database().await;
  let seller = create_user(&pool, "seller@example.com").await;
  let category = create_category(&pool, "Electronics", None).await;

  let product = product_service::create_product(
    &pool,
    seller,
    CreateProductInput {
      name: "Tripod".to_string(),
      description: Some("Carbon fiber".to_string()),
      image_url: None,
      price_cents: 9900,
      stock_quantity: 5,
      category_id: category,
    },
  )
  .await
  .unwrap();

  // Updating an unrelated field leaves the description alone.
  let repriced = product_service::update_product(
    &pool,
    seller,
    product.id,
    UpdateProductInput {
      price_cents: Some(8900),
      ..no_changes()
    },
  )
  .await
  .unwrap();
  assert_eq!(repriced.description.as_deref(), Some("Carbon fiber"));

  let cleared = product_service::update_product(
    &pool,
    seller,
    product.id,
    UpdateProductInput {
      description: Some(None),
      ..no_changes()
    },
  )
  .await
  .unwrap();
  assert_eq!(cleared.description, None);
}
