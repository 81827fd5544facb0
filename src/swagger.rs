use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{OrderStatus, UserRole};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::auth::change_password,
        handlers::auth::profile,
        handlers::product::list_products,
        handlers::product::highlight_products,
        handlers::product::detail_product,
        handlers::product::list_products_admin,
        handlers::product::create_product,
        handlers::product::edit_product,
        handlers::product::delete_product,
        handlers::cart::add_product_to_cart,
        handlers::cart::list_cart,
        handlers::cart::update_cart_quantity,
        handlers::cart::delete_cart,
        handlers::order::create_order,
        handlers::order::list_orders,
        handlers::order::detail_order,
        handlers::order::update_order_status,
        handlers::order::list_orders_admin,
        handlers::webhook::xendit_invoice_webhook,
    ),
    components(
        schemas(
            UserRole,
            OrderStatus,
            RegisterRequest,
            LoginRequest,
            LogoutRequest,
            ChangePasswordRequest,
            UserResponse,
            AuthResponse,
            ProductRequest,
            ProductResponse,
            AddProductToCartRequest,
            UpdateCartQuantityRequest,
            CartItemResponse,
            OrderProductRequest,
            CreateOrderRequest,
            CreateOrderResponse,
            OrderItemResponse,
            OrderListItem,
            OrderDetailResponse,
            UpdateOrderStatusRequest,
            XenditInvoiceCallback,
            PaginationParams,
            PaginationInfo,
            IdResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "product", description = "Product catalog API"),
        (name = "cart", description = "Shopping cart API"),
        (name = "order", description = "Order API"),
        (name = "admin", description = "Back office API"),
        (name = "webhook", description = "Payment provider callbacks"),
    ),
    info(
        title = "Storefront Backend API",
        version = "1.0.0",
        description = "Storefront Backend REST API documentation"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
