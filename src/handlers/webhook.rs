use crate::external::XenditService;
use crate::models::{ApiResponse, XenditInvoiceCallback};
use crate::services::{WebhookOutcome, WebhookService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use log::warn;

pub const CALLBACK_TOKEN_HEADER: &str = "x-callback-token";

/// Xendit 发票回调
///
/// 通过 x-callback-token 请求头校验来源；未知订单返回 404 以便支付方告警与重试。
#[utoipa::path(
    post,
    path = "/webhook/xendit/invoice",
    tag = "webhook",
    request_body = XenditInvoiceCallback,
    params(("x-callback-token" = String, Header, description = "Xendit 回调令牌")),
    responses(
        (status = 200, description = "回调已处理"),
        (status = 401, description = "回调令牌无效"),
        (status = 404, description = "订单不存在")
    )
)]
pub async fn xendit_invoice_webhook(
    req: HttpRequest,
    xendit_service: web::Data<XenditService>,
    webhook_service: web::Data<WebhookService>,
    body: web::Json<XenditInvoiceCallback>,
) -> Result<HttpResponse> {
    let token = req
        .headers()
        .get(CALLBACK_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if let Err(e) = xendit_service.verify_callback_token(token) {
        warn!("Rejected Xendit callback for {}: {e}", body.external_id);
        return Ok(e.error_response());
    }

    match webhook_service.receive_invoice(body.into_inner()).await {
        Ok(WebhookOutcome::Applied) => Ok(ApiResponse::message_only("Order marked as paid")),
        Ok(WebhookOutcome::AlreadyPaid) => Ok(ApiResponse::message_only("Order already paid")),
        Ok(WebhookOutcome::Ignored) => Ok(ApiResponse::message_only("Callback ignored")),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn webhook_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/webhook")
            .route("/xendit/invoice", web::post().to(xendit_invoice_webhook)),
    );
}
