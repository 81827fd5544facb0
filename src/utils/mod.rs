pub mod jwt;
pub mod order_number;
pub mod password;
pub mod token_blocklist;

pub use jwt::*;
pub use order_number::{format_order_number, generate_random_suffix};
pub use password::*;
pub use token_blocklist::TokenBlocklist;
