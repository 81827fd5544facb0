use crate::error::{AppError, AppResult};
use crate::models::AuthUser;
use crate::utils::{JwtService, TokenBlocklist};
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

// 公开路径配置
struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
    // 仅 GET 公开
    public_get_prefixes: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec![
                "/swagger-ui",
                "/api/v1/auth/register",
                "/api/v1/auth/login",
                "/api/v1/auth/refresh",
            ],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/", "/webhook/"],
            public_get_prefixes: vec!["/api/v1/products"],
        }
    }

    fn is_public(&self, method: &Method, path: &str) -> bool {
        if self.exact_paths.contains(&path) {
            return true;
        }
        if self.prefix_paths.iter().any(|&prefix| path.starts_with(prefix)) {
            return true;
        }
        *method == Method::GET
            && self
                .public_get_prefixes
                .iter()
                .any(|&prefix| path.starts_with(prefix))
    }
}

/// Bearer 令牌（不含前缀）
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
    blocklist: TokenBlocklist,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService, blocklist: TokenBlocklist) -> Self {
        Self {
            jwt_service,
            blocklist,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            blocklist: self.blocklist.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    blocklist: TokenBlocklist,
    public_paths: PublicPaths,
}

impl<S> AuthMiddlewareService<S> {
    fn authenticate(&self, req: &ServiceRequest) -> AppResult<AuthUser> {
        let token = bearer_token(req.request())
            .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))?;

        if self.blocklist.is_blocked(token) {
            return Err(AppError::AuthError("Token has been revoked".to_string()));
        }

        let claims = self
            .jwt_service
            .verify_access_token(token)
            .map_err(|_| AppError::AuthError("Invalid access token".to_string()))?;
        AuthUser::try_from(claims)
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS
            || self.public_paths.is_public(req.method(), req.path())
        {
            return Box::pin(self.service.call(req));
        }

        match self.authenticate(&req) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                Box::pin(self.service.call(req))
            }
            Err(error) => {
                log::debug!("Rejected {} {}: {error}", req.method(), req.path());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

/// 从请求扩展中取出当前用户
pub fn current_user(req: &HttpRequest) -> AppResult<AuthUser> {
    req.extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
}
