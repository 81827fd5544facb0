use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddProductToCartRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCartQuantityRequest {
    /// 0 表示删除该购物车条目
    pub new_quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItemResponse {
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_image_url: String,
    pub product_price: i64,
    pub quantity: i32,
}
