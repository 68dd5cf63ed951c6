//! Data structures representing database entities.

pub mod cart_item;
pub mod category;
pub mod order;
pub mod order_item;
pub mod product;
pub mod session;
pub mod user;

pub use cart_item::{CartItem, CartLine, CartView};
pub use category::Category;
pub use order::{Order, OrderStatus};
pub use order_item::OrderItem;
pub use product::Product;
pub use session::Session;
pub use user::User;
