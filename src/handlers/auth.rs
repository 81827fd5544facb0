use crate::error::AppError;
use crate::middlewares::{bearer_token, current_user};
use crate::models::*;
use crate::services::AuthService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "注册成功", body = UserResponse),
        (status = 400, description = "请求参数错误"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    match auth_service.register(request.into_inner()).await {
        Ok(user) => Ok(ApiResponse::ok_with_message(user, "Registered")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = AuthResponse),
        (status = 401, description = "认证失败"),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(response) => Ok(ApiResponse::ok(response)),
        Err(e) => Ok(e.error_response()),
    }
}

/// 刷新令牌放在 Authorization: Bearer 头中
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "刷新令牌成功", body = AuthResponse),
        (status = 401, description = "无效的刷新令牌")
    )
)]
pub async fn refresh(auth_service: web::Data<AuthService>, req: HttpRequest) -> Result<HttpResponse> {
    let Some(token) = bearer_token(&req) else {
        return Ok(AppError::AuthError("Missing refresh token".to_string()).error_response());
    };

    match auth_service.refresh_token(token).await {
        Ok(response) => Ok(ApiResponse::ok(response)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    request_body = LogoutRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "登出成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn logout(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    request: Option<web::Json<LogoutRequest>>,
) -> Result<HttpResponse> {
    let Some(token) = bearer_token(&req) else {
        return Ok(AppError::AuthError("Missing access token".to_string()).error_response());
    };
    let request = request.map(|r| r.into_inner()).unwrap_or_default();

    match auth_service.logout(token, request) {
        Ok(()) => Ok(ApiResponse::message_only("Logged out")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "auth",
    request_body = ChangePasswordRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "密码修改成功"),
        (status = 400, description = "旧密码错误或新密码不合法"),
        (status = 401, description = "未授权")
    )
)]
pub async fn change_password(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    request: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match auth_service
        .change_password(&user, request.into_inner())
        .await
    {
        Ok(()) => Ok(ApiResponse::message_only("Password changed")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/profile",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "当前用户", body = UserResponse),
        (status = 401, description = "未授权")
    )
)]
pub async fn profile(auth_service: web::Data<AuthService>, req: HttpRequest) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match auth_service.profile(&user).await {
        Ok(response) => Ok(ApiResponse::ok(response)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh))
            .route("/logout", web::post().to(logout))
            .route("/change-password", web::post().to(change_password))
            .route("/profile", web::get().to(profile)),
    );
}
