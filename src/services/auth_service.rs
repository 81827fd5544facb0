use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use std::sync::LazyLock;
use uuid::Uuid;

static EMAIL_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .map_err(|e| log::error!("Invalid email regex: {e}"))
        .ok()
});

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    blocklist: TokenBlocklist,
}

fn validate_email(email: &str) -> AppResult<()> {
    let re = EMAIL_REGEX
        .as_ref()
        .ok_or_else(|| AppError::InternalError("Email regex unavailable".to_string()))?;
    if !re.is_match(email) {
        return Err(AppError::ValidationError("Invalid email format".to_string()));
    }
    Ok(())
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService, blocklist: TokenBlocklist) -> Self {
        Self {
            pool,
            jwt_service,
            blocklist,
        }
    }

    fn issue_tokens(&self, user: users::Model) -> AppResult<AuthResponse> {
        let subject = TokenSubject {
            user_id: user.id,
            full_name: &user.full_name,
            email: &user.email,
            role: user.role_code,
        };
        let access_token = self.jwt_service.generate_access_token(&subject)?;
        let refresh_token = self.jwt_service.generate_refresh_token(&subject)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<UserResponse> {
        let full_name = request.full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::ValidationError("Full name is required".to_string()));
        }
        let email = request.email.trim().to_lowercase();
        validate_email(&email)?;
        validate_password(&request.password)?;
        if request.password != request.password_confirmation {
            return Err(AppError::ValidationError(
                "Password confirmation does not match".to_string(),
            ));
        }

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::ValidationError("Email is already registered".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(full_name.to_string()),
            email: Set(email),
            password_hash: Set(password_hash),
            role_code: Set(UserRole::Customer),
            created_at: Set(Utc::now()),
            created_by: Set(Some(full_name.to_string())),
            updated_at: Set(None),
            updated_by: Set(None),
        }
        .insert(&self.pool)
        .await?;

        log::info!("User registered: id={}", user.id);
        Ok(UserResponse::from(user))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = request.email.trim().to_lowercase();
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::ValidationError("Email is not registered".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }

        self.issue_tokens(user)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        if self.blocklist.is_blocked(refresh_token) {
            return Err(AppError::AuthError("Token has been revoked".to_string()));
        }
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user = users::Entity::find_by_id(claims.user_id()?)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        self.issue_tokens(user)
    }

    /// 令牌加入黑名单直到其自身过期
    pub fn logout(&self, access_token: &str, request: LogoutRequest) -> AppResult<()> {
        let claims = self.jwt_service.verify_access_token(access_token)?;
        self.blocklist.mark(access_token, claims.expires_at());

        if let Some(refresh_token) = request.refresh_token.as_deref()
            && let Ok(refresh_claims) = self.jwt_service.verify_refresh_token(refresh_token)
        {
            self.blocklist.mark(refresh_token, refresh_claims.expires_at());
        }

        log::info!("User logged out: id={}", claims.sub);
        Ok(())
    }

    pub async fn change_password(
        &self,
        user: &AuthUser,
        request: ChangePasswordRequest,
    ) -> AppResult<()> {
        let model = users::Entity::find_by_id(user.id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !verify_password(&request.old_password, &model.password_hash)? {
            return Err(AppError::ValidationError(
                "Old password is incorrect".to_string(),
            ));
        }
        validate_password(&request.new_password)?;
        if request.new_password != request.new_password_confirmation {
            return Err(AppError::ValidationError(
                "Password confirmation does not match".to_string(),
            ));
        }

        let password_hash = hash_password(&request.new_password)?;
        let mut am = model.into_active_model();
        am.password_hash = Set(password_hash);
        am.updated_at = Set(Some(Utc::now()));
        am.updated_by = Set(Some(user.full_name.clone()));
        am.update(&self.pool).await?;

        log::info!("Password changed: id={}", user.id);
        Ok(())
    }

    pub async fn profile(&self, user: &AuthUser) -> AppResult<UserResponse> {
        let model = users::Entity::find_by_id(user.id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(UserResponse::from(model))
    }
}
