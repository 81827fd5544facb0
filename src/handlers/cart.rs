use crate::middlewares::current_user;
use crate::models::*;
use crate::services::CartService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v1/cart",
    tag = "cart",
    request_body = AddProductToCartRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "已加入购物车", body = IdResponse),
        (status = 404, description = "商品不存在")
    )
)]
pub async fn add_product_to_cart(
    cart_service: web::Data<CartService>,
    req: HttpRequest,
    body: web::Json<AddProductToCartRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match cart_service.add_product_to_cart(&user, body.into_inner()).await {
        Ok(id) => Ok(ApiResponse::ok(id)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/cart",
    tag = "cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "购物车", body = [CartItemResponse])
    )
)]
pub async fn list_cart(cart_service: web::Data<CartService>, req: HttpRequest) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match cart_service.list_cart(&user).await {
        Ok(items) => Ok(ApiResponse::ok(items)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/cart/{id}",
    tag = "cart",
    params(("id" = Uuid, Path, description = "购物车条目 id")),
    request_body = UpdateCartQuantityRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "已更新", body = IdResponse),
        (status = 404, description = "条目不存在")
    )
)]
pub async fn update_cart_quantity(
    cart_service: web::Data<CartService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCartQuantityRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match cart_service
        .update_cart_quantity(&user, path.into_inner(), body.into_inner())
        .await
    {
        Ok(id) => Ok(ApiResponse::ok(id)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/cart/{id}",
    tag = "cart",
    params(("id" = Uuid, Path, description = "购物车条目 id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "已删除", body = IdResponse),
        (status = 404, description = "条目不存在")
    )
)]
pub async fn delete_cart(
    cart_service: web::Data<CartService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match cart_service.delete_cart(&user, path.into_inner()).await {
        Ok(id) => Ok(ApiResponse::ok(id)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn cart_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cart")
            .route("", web::post().to(add_product_to_cart))
            .route("", web::get().to(list_cart))
            .route("/{id}", web::put().to(update_cart_quantity))
            .route("/{id}", web::delete().to(delete_cart)),
    );
}
