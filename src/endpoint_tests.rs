//! HTTP 层测试：中间件 + 路由 + 服务，数据库为内存 SQLite

use crate::config::XenditConfig;
use crate::entities::{OrderStatus, UserRole, order_entity as orders, product_entity as products};
use crate::external::XenditService;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use crate::models::AuthUser;
use crate::services::test_support::*;
use crate::services::{AuthService, ProductService, WebhookService};
use crate::utils::{JwtService, TokenBlocklist, TokenSubject};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use serde_json::json;
use uuid::Uuid;

/// 中间件拒绝时 actix 返回 Err，这里统一换算成状态码
macro_rules! status_of {
    ($app:expr, $req:expr) => {
        match test::try_call_service($app, $req).await {
            Ok(res) => res.status(),
            Err(e) => e.error_response().status(),
        }
    };
}

fn jwt() -> JwtService {
    JwtService::new("endpoint-test-secret", 3600, 7200)
}

fn access_token(user: &AuthUser) -> String {
    jwt()
        .generate_access_token(&TokenSubject {
            user_id: user.id,
            full_name: &user.full_name,
            email: &user.email,
            role: user.role,
        })
        .unwrap()
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn logged_out_token_is_rejected() {
    let _ = env_logger::try_init();
    let db = setup_db().await;
    let user = insert_user(&db, "c@example.com", UserRole::Customer).await;
    let blocklist = TokenBlocklist::new();
    let auth_service = AuthService::new(db.clone(), jwt(), blocklist.clone());

    let app = test::init_service(
        App::new()
            .wrap(AuthMiddleware::new(jwt(), blocklist.clone()))
            .app_data(web::Data::new(auth_service))
            .service(web::scope("/api/v1").configure(handlers::auth_config)),
    )
    .await;
    let token = access_token(&user);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/profile")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(status_of!(&app, req), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(status_of!(&app, req), StatusCode::OK);
    assert!(blocklist.is_blocked(&token));

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/profile")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(status_of!(&app, req), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn missing_token_is_unauthorized() {
    let db = setup_db().await;
    let blocklist = TokenBlocklist::new();
    let app = test::init_service(
        App::new()
            .wrap(AuthMiddleware::new(jwt(), blocklist.clone()))
            .app_data(web::Data::new(AuthService::new(db, jwt(), blocklist)))
            .service(web::scope("/api/v1").configure(handlers::auth_config)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/profile")
        .to_request();
    assert_eq!(status_of!(&app, req), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/profile")
        .insert_header(bearer("not-a-jwt"))
        .to_request();
    assert_eq!(status_of!(&app, req), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn customer_cannot_call_admin_endpoint() {
    let db = setup_db().await;
    let customer = insert_user(&db, "c@example.com", UserRole::Customer).await;
    let admin = insert_user(&db, "admin@example.com", UserRole::Admin).await;
    let blocklist = TokenBlocklist::new();

    let app = test::init_service(
        App::new()
            .wrap(AuthMiddleware::new(jwt(), blocklist))
            .app_data(web::Data::new(ProductService::new(db.clone(), String::new())))
            .service(web::scope("/api/v1").configure(handlers::product_config)),
    )
    .await;
    let body = json!({
        "name": "Kopi",
        "description": "Kopi susu",
        "price": 45000,
        "image_file_name": "kopi.png"
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/products")
        .insert_header(bearer(&access_token(&customer)))
        .set_json(&body)
        .to_request();
    assert_eq!(status_of!(&app, req), StatusCode::FORBIDDEN);
    assert_eq!(products::Entity::find().count(&db).await.unwrap(), 0);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/products")
        .insert_header(bearer(&access_token(&admin)))
        .set_json(&body)
        .to_request();
    assert_eq!(status_of!(&app, req), StatusCode::OK);
    assert_eq!(products::Entity::find().count(&db).await.unwrap(), 1);

    // 商品列表公开
    let req = test::TestRequest::get().uri("/api/v1/products").to_request();
    assert_eq!(status_of!(&app, req), StatusCode::OK);
}

async fn insert_order(db: &DatabaseConnection, user: &AuthUser) -> orders::Model {
    orders::ActiveModel {
        id: Set(Uuid::new_v4()),
        number: Set("INV/20250101/RK/123456781".to_string()),
        user_id: Set(user.id),
        order_status_code: Set(OrderStatus::Unpaid),
        user_full_name: Set(user.full_name.clone()),
        address: Set("addr".to_string()),
        phone_number: Set("0812".to_string()),
        notes: Set(None),
        total: Set(2500),
        expired_at: Set(Utc::now() + Duration::hours(24)),
        xendit_invoice_id: Set(Some("inv-1".to_string())),
        xendit_invoice_url: Set(Some("https://checkout.xendit.co/web/inv-1".to_string())),
        xendit_paid_at: Set(None),
        xendit_payment_channel: Set(None),
        xendit_payment_method: Set(None),
        created_at: Set(Utc::now()),
        created_by: Set(user.full_name.clone()),
        updated_at: Set(None),
        updated_by: Set(None),
    }
    .insert(db)
    .await
    .unwrap()
}

#[actix_web::test]
async fn webhook_requires_callback_token() {
    let db = setup_db().await;
    let user = insert_user(&db, "c@example.com", UserRole::Customer).await;
    let order = insert_order(&db, &user).await;
    let xendit = XenditService::new(XenditConfig {
        callback_token: "cb-secret".to_string(),
        ..Default::default()
    })
    .unwrap();

    let app = test::init_service(
        App::new()
            .wrap(AuthMiddleware::new(jwt(), TokenBlocklist::new()))
            .app_data(web::Data::new(xendit))
            .app_data(web::Data::new(WebhookService::new(db.clone())))
            .configure(handlers::webhook_config),
    )
    .await;
    let payload = json!({
        "id": "inv-1",
        "external_id": order.id.to_string(),
        "status": "PAID",
        "payment_channel": "BCA",
        "payment_method": "BANK_TRANSFER"
    });

    let req = test::TestRequest::post()
        .uri("/webhook/xendit/invoice")
        .insert_header(("x-callback-token", "wrong"))
        .set_json(&payload)
        .to_request();
    assert_eq!(status_of!(&app, req), StatusCode::UNAUTHORIZED);
    let unchanged = orders::Entity::find_by_id(order.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged, order);

    let req = test::TestRequest::post()
        .uri("/webhook/xendit/invoice")
        .insert_header(("x-callback-token", "cb-secret"))
        .set_json(&payload)
        .to_request();
    assert_eq!(status_of!(&app, req), StatusCode::OK);
    let paid = orders::Entity::find_by_id(order.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(paid.order_status_code, OrderStatus::Paid);

    let req = test::TestRequest::post()
        .uri("/webhook/xendit/invoice")
        .insert_header(("x-callback-token", "cb-secret"))
        .set_json(json!({
            "external_id": Uuid::new_v4().to_string(),
            "status": "PAID",
            "payment_channel": "BCA",
            "payment_method": "BANK_TRANSFER"
        }))
        .to_request();
    assert_eq!(status_of!(&app, req), StatusCode::NOT_FOUND);
}
