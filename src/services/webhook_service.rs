use crate::entities::{OrderStatus, order_entity as orders};
use crate::error::{AppError, AppResult};
use crate::models::XenditInvoiceCallback;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use uuid::Uuid;

pub const XENDIT_SYSTEM_USER: &str = "System Xendit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// 订单已标记为已支付
    Applied,
    /// 订单此前已支付，未做任何写入
    AlreadyPaid,
    /// 非支付成功的回调（如 EXPIRED），忽略
    Ignored,
}

#[derive(Clone)]
pub struct WebhookService {
    pool: DatabaseConnection,
}

impl WebhookService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 处理 Xendit 发票回调，可重复投递
    pub async fn receive_invoice(&self, callback: XenditInvoiceCallback) -> AppResult<WebhookOutcome> {
        let not_found = || {
            log::error!(
                "Xendit callback for unknown order: external_id={} invoice_id={:?}",
                callback.external_id,
                callback.id
            );
            AppError::NotFound(format!("Order {} not found", callback.external_id))
        };

        let order_id = Uuid::parse_str(callback.external_id.trim()).map_err(|_| not_found())?;
        let order = orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(not_found)?;

        if !callback.is_paid() {
            log::info!(
                "Ignoring Xendit callback with status {:?} for order {order_id}",
                callback.status
            );
            return Ok(WebhookOutcome::Ignored);
        }

        match order.order_status_code {
            OrderStatus::Paid | OrderStatus::Shipping | OrderStatus::Done => {
                log::info!("Duplicate Xendit callback for paid order {order_id}");
                return Ok(WebhookOutcome::AlreadyPaid);
            }
            OrderStatus::Canceled => {
                log::warn!("Payment received for canceled order {order_id}");
            }
            _ => {}
        }

        let now = Utc::now();
        let mut am = order.into_active_model();
        am.order_status_code = Set(OrderStatus::Paid);
        am.xendit_paid_at = Set(Some(now));
        am.xendit_payment_channel = Set(Some(callback.payment_channel.clone()));
        am.xendit_payment_method = Set(Some(callback.payment_method.clone()));
        am.updated_at = Set(Some(now));
        am.updated_by = Set(Some(XENDIT_SYSTEM_USER.to_string()));
        am.update(&self.pool).await?;

        log::info!(
            "Order {order_id} paid via {} / {}",
            callback.payment_method,
            callback.payment_channel
        );
        Ok(WebhookOutcome::Applied)
    }
}
