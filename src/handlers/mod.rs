pub mod auth;
pub mod cart;
pub mod order;
pub mod product;
pub mod webhook;

pub use auth::auth_config;
pub use cart::cart_config;
pub use order::order_config;
pub use product::product_config;
pub use webhook::webhook_config;
