use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "shipping")]
    Shipping,
    #[sea_orm(string_value = "done")]
    Done,
    /// 只在读取时推导，从不写入
    #[sea_orm(string_value = "expired")]
    Expired,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Unpaid => write!(f, "unpaid"),
            OrderStatus::Paid => write!(f, "paid"),
            OrderStatus::Shipping => write!(f, "shipping"),
            OrderStatus::Done => write!(f, "done"),
            OrderStatus::Expired => write!(f, "expired"),
            OrderStatus::Canceled => write!(f, "canceled"),
        }
    }
}

/// 订单的有效状态：未支付且已过期的订单视为 Expired。
///
/// 所有订单读取路径（管理员列表、用户列表、详情）都必须经过这里。
pub fn effective_status(
    stored: OrderStatus,
    expired_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> OrderStatus {
    if stored == OrderStatus::Unpaid && now > expired_at {
        OrderStatus::Expired
    } else {
        stored
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub number: String,
    pub user_id: Uuid,
    pub order_status_code: OrderStatus,
    pub user_full_name: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub phone_number: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub total: i64,
    pub expired_at: DateTime<Utc>,
    pub xendit_invoice_id: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub xendit_invoice_url: Option<String>,
    pub xendit_paid_at: Option<DateTime<Utc>>,
    pub xendit_payment_channel: Option<String>,
    pub xendit_payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl Model {
    pub fn effective_status(&self, now: DateTime<Utc>) -> OrderStatus {
        effective_status(self.order_status_code, self.expired_at, now)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
