use crate::middlewares::current_user;
use crate::models::*;
use crate::services::ProductService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "product",
    params(PaginationParams),
    responses(
        (status = 200, description = "商品列表")
    )
)]
pub async fn list_products(
    product_service: web::Data<ProductService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match product_service.list_products(&query).await {
        Ok(page) => Ok(ApiResponse::ok(page)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/products/highlight",
    tag = "product",
    responses(
        (status = 200, description = "最新的三个商品", body = [ProductResponse])
    )
)]
pub async fn highlight_products(product_service: web::Data<ProductService>) -> Result<HttpResponse> {
    match product_service.highlight_products().await {
        Ok(items) => Ok(ApiResponse::ok(items)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "product",
    params(("id" = Uuid, Path, description = "商品 id")),
    responses(
        (status = 200, description = "商品详情", body = ProductResponse),
        (status = 404, description = "商品不存在")
    )
)]
pub async fn detail_product(
    product_service: web::Data<ProductService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match product_service.detail_product(path.into_inner()).await {
        Ok(product) => Ok(ApiResponse::ok(product)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/products",
    tag = "admin",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "商品列表"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn list_products_admin(
    product_service: web::Data<ProductService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match product_service.list_products_admin(&user, &query).await {
        Ok(page) => Ok(ApiResponse::ok(page)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/products",
    tag = "admin",
    request_body = ProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "创建成功", body = IdResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn create_product(
    product_service: web::Data<ProductService>,
    req: HttpRequest,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match product_service.create_product(&user, body.into_inner()).await {
        Ok(id) => Ok(ApiResponse::ok_with_message(id, "Product created")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/products/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "商品 id")),
    request_body = ProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "修改成功", body = IdResponse),
        (status = 403, description = "需要管理员权限"),
        (status = 404, description = "商品不存在")
    )
)]
pub async fn edit_product(
    product_service: web::Data<ProductService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match product_service
        .edit_product(&user, path.into_inner(), body.into_inner())
        .await
    {
        Ok(id) => Ok(ApiResponse::ok_with_message(id, "Product updated")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/products/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "商品 id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "删除成功", body = IdResponse),
        (status = 403, description = "需要管理员权限"),
        (status = 404, description = "商品不存在")
    )
)]
pub async fn delete_product(
    product_service: web::Data<ProductService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match product_service.delete_product(&user, path.into_inner()).await {
        Ok(id) => Ok(ApiResponse::ok_with_message(id, "Product deleted")),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn product_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("/highlight", web::get().to(highlight_products))
            .route("/{id}", web::get().to(detail_product)),
    )
    .service(
        web::scope("/admin/products")
            .route("", web::get().to(list_products_admin))
            .route("", web::post().to(create_product))
            .route("/{id}", web::put().to(edit_product))
            .route("/{id}", web::delete().to(delete_product)),
    );
}
