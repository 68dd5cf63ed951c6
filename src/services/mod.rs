//! Business logic, one module per resource. Handlers stay thin and call
//! into these; everything that touches the database lives here.

pub mod auth_service;
pub mod cart_service;
pub mod category_service;
pub mod category_tree;
pub mod order_service;
pub mod patch;
pub mod product_service;
pub mod slug;
