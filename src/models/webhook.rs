use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Xendit 发票回调 (invoice callback) 中本系统用到的字段
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct XenditInvoiceCallback {
    /// Xendit 发票 id
    #[serde(default)]
    pub id: Option<String>,
    /// 创建发票时传入的订单 id
    pub external_id: String,
    /// PAID / SETTLED / EXPIRED
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_channel: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl XenditInvoiceCallback {
    /// 缺省状态按已支付处理（Xendit 只在支付完成时回调）
    pub fn is_paid(&self) -> bool {
        match self.status.as_deref() {
            None => true,
            Some(s) => s.eq_ignore_ascii_case("PAID") || s.eq_ignore_ascii_case("SETTLED"),
        }
    }
}
