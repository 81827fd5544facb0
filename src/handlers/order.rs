use crate::middlewares::current_user;
use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "order",
    request_body = CreateOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "下单成功，返回支付链接", body = CreateOrderResponse),
        (status = 400, description = "请求参数错误或商品不存在"),
        (status = 502, description = "支付服务不可用")
    )
)]
pub async fn create_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match order_service.create_order(&user, body.into_inner()).await {
        Ok(order) => Ok(ApiResponse::ok_with_message(order, "Order created")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "order",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "我的订单"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_orders(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match order_service.list_orders(&user, &query).await {
        Ok(page) => Ok(ApiResponse::ok(page)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "order",
    params(("id" = Uuid, Path, description = "订单 id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "订单详情", body = OrderDetailResponse),
        (status = 404, description = "订单不存在")
    )
)]
pub async fn detail_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match order_service.detail_order(&user, path.into_inner()).await {
        Ok(order) => Ok(ApiResponse::ok(order)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    tag = "order",
    params(("id" = Uuid, Path, description = "订单 id")),
    request_body = UpdateOrderStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "状态已更新", body = IdResponse),
        (status = 400, description = "不允许的状态变更"),
        (status = 403, description = "需要管理员权限"),
        (status = 404, description = "订单不存在")
    )
)]
pub async fn update_order_status(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match order_service
        .update_order_status(&user, path.into_inner(), body.into_inner())
        .await
    {
        Ok(id) => Ok(ApiResponse::ok(id)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/orders",
    tag = "admin",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "全部订单"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn list_orders_admin(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match order_service.list_orders_admin(&user, &query).await {
        Ok(page) => Ok(ApiResponse::ok(page)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(create_order))
            .route("", web::get().to(list_orders))
            .route("/{id}", web::get().to(detail_order))
            .route("/{id}/status", web::put().to(update_order_status)),
    )
    .service(web::scope("/admin/orders").route("", web::get().to(list_orders_admin)));
}
