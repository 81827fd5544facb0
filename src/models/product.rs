use crate::entities::product_entity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// 商品图片的公开地址
pub fn product_image_url(storage_base_url: &str, image_file_name: &str) -> String {
    format!(
        "{}/product/{}",
        storage_base_url.trim_end_matches('/'),
        image_file_name
    )
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductRequest {
    #[schema(example = "Kopi Susu 1L")]
    pub name: String,
    pub description: String,
    /// 价格(最小货币单位)
    #[schema(example = 45000)]
    pub price: i64,
    #[schema(example = "product_1718000000000.png")]
    pub image_file_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub image_url: String,
}

impl ProductResponse {
    pub fn from_model(m: product_entity::Model, storage_base_url: &str) -> Self {
        Self {
            image_url: product_image_url(storage_base_url, &m.image_file_name),
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_image_url() {
        assert_eq!(
            product_image_url("http://localhost:3000/storage/", "a.png"),
            "http://localhost:3000/storage/product/a.png"
        );
        assert_eq!(product_image_url("", "a.png"), "/product/a.png");
    }
}
