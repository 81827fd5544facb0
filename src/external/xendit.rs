use crate::config::XenditConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceCustomer {
    pub given_names: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceItem {
    pub name: String,
    pub price: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateInvoiceRequest {
    /// 订单 id，回调时原样返回
    pub external_id: String,
    pub amount: i64,
    pub currency: String,
    pub customer: InvoiceCustomer,
    pub success_redirect_url: String,
    pub items: Vec<InvoiceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub invoice_url: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

/// 支付网关：为订单创建托管发票
#[async_trait]
pub trait InvoiceGateway: Send + Sync {
    async fn create_invoice(&self, request: CreateInvoiceRequest) -> AppResult<Invoice>;
}

#[derive(Clone)]
pub struct XenditService {
    client: Client,
    config: XenditConfig,
}

impl XenditService {
    pub fn new(config: XenditConfig) -> AppResult<Self> {
        if config.request_timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "xendit.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build Xendit client: {e}")))?;
        Ok(Self { client, config })
    }

    /// 校验回调请求头 x-callback-token
    pub fn verify_callback_token(&self, token: Option<&str>) -> AppResult<()> {
        let expected = self.config.callback_token.as_bytes();
        let Some(token) = token else {
            return Err(AppError::AuthError("Missing callback token".to_string()));
        };
        if expected.is_empty() || !constant_time_eq(token.as_bytes(), expected) {
            return Err(AppError::AuthError("Invalid callback token".to_string()));
        }
        Ok(())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[async_trait]
impl InvoiceGateway for XenditService {
    async fn create_invoice(&self, request: CreateInvoiceRequest) -> AppResult<Invoice> {
        let url = format!("{}/v2/invoices", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.secret_key, None::<&str>)
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            let invoice: Invoice = response.json().await?;
            log::info!(
                "Xendit invoice created: id={} external_id={}",
                invoice.id,
                request.external_id
            );
            Ok(invoice)
        } else {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Create invoice failed ({status}): {error_text}"
            )))
        }
    }
}
