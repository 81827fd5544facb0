use crate::entities::{OrderStatus, order_entity, order_item_entity};
use crate::models::product_image_url;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderProductRequest {
    pub id: Uuid,
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub products: Vec<OrderProductRequest>,
    #[schema(example = "Budi Santoso")]
    pub full_name: String,
    #[schema(example = "Jl. Merdeka No. 1, Jakarta")]
    pub address: String,
    #[schema(example = "081234567890")]
    pub phone_number: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderResponse {
    pub id: Uuid,
    pub number: String,
    pub total: i64,
    pub invoice_url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub product_id: Uuid,
    pub product_name: String,
    pub product_image_url: String,
    pub product_price: i64,
    pub quantity: i32,
}

impl OrderItemResponse {
    pub fn from_model(m: order_item_entity::Model, storage_base_url: &str) -> Self {
        Self {
            product_image_url: product_image_url(storage_base_url, &m.product_image_file_name),
            product_id: m.product_id,
            product_name: m.product_name,
            product_price: m.product_price,
            quantity: m.quantity,
        }
    }
}

/// 订单列表条目，status_code 为有效状态
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderListItem {
    pub id: Uuid,
    pub number: String,
    pub user_full_name: String,
    pub status_code: OrderStatus,
    pub total: i64,
    pub invoice_url: Option<String>,
    pub expired_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

impl OrderListItem {
    pub fn new(
        order: order_entity::Model,
        items: Vec<OrderItemResponse>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            status_code: order.effective_status(now),
            id: order.id,
            number: order.number,
            user_full_name: order.user_full_name,
            total: order.total,
            invoice_url: order.xendit_invoice_url,
            expired_at: order.expired_at,
            created_at: order.created_at,
            items,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderDetailResponse {
    pub id: Uuid,
    pub number: String,
    pub user_id: Uuid,
    pub user_full_name: String,
    pub address: String,
    pub phone_number: String,
    pub notes: Option<String>,
    pub status_code: OrderStatus,
    pub total: i64,
    pub expired_at: DateTime<Utc>,
    pub invoice_url: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_channel: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

impl OrderDetailResponse {
    pub fn new(
        order: order_entity::Model,
        items: Vec<OrderItemResponse>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            status_code: order.effective_status(now),
            id: order.id,
            number: order.number,
            user_id: order.user_id,
            user_full_name: order.user_full_name,
            address: order.address,
            phone_number: order.phone_number,
            notes: order.notes,
            total: order.total,
            expired_at: order.expired_at,
            invoice_url: order.xendit_invoice_url,
            paid_at: order.xendit_paid_at,
            payment_channel: order.xendit_payment_channel,
            payment_method: order.xendit_payment_method,
            created_at: order.created_at,
            items,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}
