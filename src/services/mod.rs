pub mod auth_service;
pub mod cart_service;
pub mod numbering_service;
pub mod order_service;
pub mod product_service;
pub mod webhook_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth_service::*;
pub use cart_service::*;
pub use numbering_service::*;
pub use order_service::*;
pub use product_service::*;
pub use webhook_service::*;
