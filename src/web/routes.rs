use actix_web::web;

use crate::web::handlers::{auth_handlers, cart_handlers, category_handlers, order_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/signup", web::post().to(auth_handlers::signup_handler))
          .route("/signin", web::post().to(auth_handlers::signin_handler))
          .route("/signout", web::post().to(auth_handlers::signout_handler))
          .route("/me", web::get().to(auth_handlers::me_handler)),
      )
      .service(
        web::scope("/categories")
          .route("", web::get().to(category_handlers::list_categories_handler))
          .route("", web::post().to(category_handlers::create_category_handler))
          .route("/tree", web::get().to(category_handlers::category_tree_handler))
          .route("/{category_id}", web::get().to(category_handlers::get_category_handler))
          .route("/{category_id}", web::put().to(category_handlers::update_category_handler))
          .route(
            "/{category_id}",
            web::delete().to(category_handlers::delete_category_handler),
          )
          .route(
            "/{category_id}/move",
            web::post().to(category_handlers::move_category_handler),
          ),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("", web::post().to(product_handlers::create_product_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
          .route("/{product_id}", web::put().to(product_handlers::update_product_handler))
          .route("/{product_id}", web::delete().to(product_handlers::delete_product_handler)),
      )
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::view_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_to_cart_handler))
          .route(
            "/items/{product_id}",
            web::put().to(cart_handlers::update_quantity_handler),
          )
          .route(
            "/items/{product_id}",
            web::delete().to(cart_handlers::remove_from_cart_handler),
          ),
      )
      .service(
        web::scope("/orders")
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/checkout", web::post().to(order_handlers::checkout_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
          .route("/{order_id}/cancel", web::post().to(order_handlers::cancel_order_handler))
          .route("/{order_id}/status", web::post().to(order_handlers::update_status_handler)),
      ),
  );
}
