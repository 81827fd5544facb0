use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use storefront_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{InvoiceGateway, XenditService},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::{JwtService, TokenBlocklist},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    if config.xendit.secret_key.is_empty() || config.xendit.callback_token.is_empty() {
        log::warn!("Xendit secret key or callback token is not configured");
    }

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );
    let blocklist = TokenBlocklist::new();

    let xendit_service =
        XenditService::new(config.xendit.clone()).expect("Failed to initialize Xendit client");
    let invoice_gateway: Arc<dyn InvoiceGateway> = Arc::new(xendit_service.clone());

    let storage_base_url = config.storage.public_base_url.clone();
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone(), blocklist.clone());
    let product_service = ProductService::new(pool.clone(), storage_base_url.clone());
    let cart_service = CartService::new(pool.clone(), storage_base_url.clone());
    let order_service = OrderService::new(
        pool.clone(),
        product_service.clone(),
        invoice_gateway,
        config.order.clone(),
        config.xendit.clone(),
        storage_base_url,
    );
    let webhook_service = WebhookService::new(pool.clone());

    tasks::spawn_all(blocklist.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let frontend_origin = config.order.frontend_base_url.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone(), blocklist.clone()))
            .wrap(create_cors(&frontend_origin))
            .wrap(Logger::default())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(product_service.clone()))
            .app_data(web::Data::new(cart_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(webhook_service.clone()))
            .app_data(web::Data::new(xendit_service.clone()))
            .configure(swagger_config)
            .configure(handlers::webhook_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::product_config)
                    .configure(handlers::cart_config)
                    .configure(handlers::order_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
