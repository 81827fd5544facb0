pub mod numberings;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod user_carts;
pub mod users;

pub use numberings as numbering_entity;
pub use order_items as order_item_entity;
pub use orders as order_entity;
pub use orders::{OrderStatus, effective_status};
pub use products as product_entity;
pub use user_carts as user_cart_entity;
pub use users as user_entity;
pub use users::UserRole;
