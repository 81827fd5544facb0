pub mod cart;
pub mod common;
pub mod order;
pub mod pagination;
pub mod product;
pub mod user;
pub mod webhook;

pub use cart::*;
pub use common::*;
pub use order::*;
pub use pagination::*;
pub use product::*;
pub use user::*;
pub use webhook::*;
