use actix_cors::Cors;

/// 配置了前端地址时只允许该来源，否则放开（本地开发）
pub fn create_cors(frontend_origin: &str) -> Cors {
    let cors = if frontend_origin.is_empty() {
        Cors::default().allowed_origin_fn(|_, _req_head| true)
    } else {
        Cors::default().allowed_origin(frontend_origin.trim_end_matches('/'))
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
