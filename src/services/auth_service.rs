use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User};
use crate::repository::UserRepository;
use crate::utils::{hash_password, verify_password, JwtManager};

#[derive(Clone)]
pub struct AuthService {
    user_repository: Arc<UserRepository>,
    jwt_manager: Arc<JwtManager>,
}

impl AuthService {
    pub fn new(user_repository: Arc<UserRepository>, jwt_manager: Arc<JwtManager>) -> Self {
        Self {
            user_repository,
            jwt_manager,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let email = request.email.trim().to_lowercase();

        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .user_repository
            .create(&email, request.name.as_deref(), &password_hash)
            .await?;

        self.issue_tokens(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = request.email.trim().to_lowercase();

        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        self.issue_tokens(user)
    }

    /// Exchange a valid refresh token for a fresh token pair.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_manager.verify_refresh_token(refresh_token)?;

        let user = self
            .user_repository
            .find_by_id(claims.user_id())
            .await?
            .ok_or(AppError::InvalidToken)?;

        self.issue_tokens(user)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> AppResult<User> {
        self.user_repository
            .update_name(user_id, request.name.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    fn issue_tokens(&self, user: User) -> AppResult<AuthResponse> {
        let access_token = self.jwt_manager.generate_access_token(user.id, &user.email)?;
        let refresh_token = self
            .jwt_manager
            .generate_refresh_token(user.id, &user.email)?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt_manager.get_expiry_hours() * 3600,
            user,
        })
    }
}
